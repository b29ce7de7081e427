//! Client secret and cached token files, in the provider's JSON layouts.

use crate::sheets::SheetsError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SheetsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SheetsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SheetsError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

/// OAuth client registration downloaded from the provider console.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ClientSecret {
    pub fn load(path: &Path) -> Result<Self, SheetsError> {
        let file: ClientSecretFile = read_json(path)?;
        file.installed
            .or(file.web)
            .ok_or(SheetsError::MissingClientSection)
    }
}

/// Token endpoint response for both code exchange and refresh.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Cached credentials (`token.json`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl AuthorizedUser {
    /// Fresh credentials from a completed consent.
    pub fn from_consent(
        secret: &ClientSecret,
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Self {
        let mut user = Self {
            token: None,
            refresh_token: None,
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes: vec![READONLY_SCOPE.to_string()],
            expiry: None,
        };
        user.apply(response, now);
        user
    }

    pub fn load(path: &Path) -> Result<Self, SheetsError> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), SheetsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SheetsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SheetsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Has an access token that is not about to expire. No expiry means it does not expire.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_none() {
            return false;
        }
        match self.expiry {
            Some(expiry) => now < expiry - Duration::seconds(EXPIRY_SKEW_SECS),
            None => true,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Whether the cached grant includes `scope`. Files without scopes are trusted.
    pub fn covers(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|s| s == scope)
    }

    /// Take the new access token. A refresh response usually omits the refresh token;
    /// keep the old one then.
    pub fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        self.expiry = response.expires_in.map(|secs| now + Duration::seconds(secs));
        if let Some(refresh) = response.refresh_token {
            self.refresh_token = Some(refresh);
        }
        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }
}
