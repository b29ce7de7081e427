//! Sheets v4 client: one authenticated session, read-only range queries.

use crate::models::Row;
use crate::sheets::oauth::{refresh_token, run_installed_flow};
use crate::sheets::token::{AuthorizedUser, ClientSecret, READONLY_SCOPE};
use crate::sheets::{SheetSource, SheetsError, CLIENT_SECRET_FILE, TOKEN_FILE};
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Cells as text. Formatted values arrive as strings already; anything else is stringified.
pub fn rows_from_values(values: Vec<Vec<Value>>) -> Vec<Row> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

struct Session {
    spreadsheet_id: String,
    access_token: String,
}

/// Builds a blocking HTTP client per call. Only call it from a blocking thread.
pub struct GoogleSheetsClient {
    api_base: String,
    session: Option<Session>,
    last_alert: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new() -> Self {
        Self::with_api_base(SHEETS_API_BASE)
    }

    /// Client against another Sheets-compatible endpoint.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            session: None,
            last_alert: None,
        }
    }

    fn http(&self) -> Result<Client, SheetsError> {
        Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Cached token if still valid, else refresh, else consent. Persists any new token.
    fn authenticate(&self, credentials_dir: &Path) -> Result<String, SheetsError> {
        let http = self.http()?;
        let token_path = credentials_dir.join(TOKEN_FILE);
        let now = Utc::now();

        let cached = if token_path.exists() {
            match AuthorizedUser::load(&token_path) {
                Ok(user) if user.covers(READONLY_SCOPE) => Some(user),
                Ok(_) => {
                    log::info!("Cached token lacks the spreadsheet scope; asking for consent again");
                    None
                }
                Err(e) => {
                    log::warn!("Ignoring cached token: {}", e);
                    None
                }
            }
        } else {
            None
        };

        if let Some(user) = &cached {
            if user.is_valid_at(now) {
                if let Some(token) = &user.token {
                    log::debug!("Using cached token from {}", token_path.display());
                    return Ok(token.clone());
                }
            }
        }

        let user = match cached.filter(AuthorizedUser::can_refresh) {
            Some(mut user) => {
                log::info!("Refreshing expired spreadsheet token");
                let refresh = user.refresh_token.clone().unwrap_or_default();
                match refresh_token(
                    &http,
                    &user.token_uri,
                    &user.client_id,
                    &user.client_secret,
                    &refresh,
                ) {
                    Ok(response) => {
                        user.apply(response, now);
                        user
                    }
                    Err(e) => {
                        log::warn!("Token refresh failed ({}); asking for consent again", e);
                        self.consent(&http, credentials_dir)?
                    }
                }
            }
            None => self.consent(&http, credentials_dir)?,
        };

        user.save(&token_path)?;
        log::info!("Saved spreadsheet token to {}", token_path.display());
        user.token.ok_or(SheetsError::NotAuthenticated)
    }

    fn consent(
        &self,
        http: &Client,
        credentials_dir: &Path,
    ) -> Result<AuthorizedUser, SheetsError> {
        let secret = ClientSecret::load(&credentials_dir.join(CLIENT_SECRET_FILE))?;
        let response = run_installed_flow(http, &secret)?;
        Ok(AuthorizedUser::from_consent(&secret, response, Utc::now()))
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
        let invalid = |reason: String| SheetsError::InvalidUrl {
            url: self.api_base.clone(),
            reason,
        };
        let mut url = Url::parse(&self.api_base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }

    fn fetch(&self, range: &str) -> Result<Vec<Row>, SheetsError> {
        let session = self.session.as_ref().ok_or(SheetsError::NotAuthenticated)?;
        let url = self.values_url(&session.spreadsheet_id, range)?;
        let response = self.http()?.get(url).bearer_auth(&session.access_token).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::Status {
                endpoint: "spreadsheet values",
                status,
                body: response.text().unwrap_or_default(),
            });
        }
        let body: ValueRange = response.json()?;
        Ok(rows_from_values(body.values))
    }

    fn alert(&mut self, context: &str, error: &SheetsError) {
        log::error!("{}: {}", context, error);
        self.last_alert = Some(format!("{}: {}", context, error));
    }
}

impl Default for GoogleSheetsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetSource for GoogleSheetsClient {
    fn initialise(&mut self, spreadsheet_id: &str, credentials_dir: &Path) {
        self.session = None;
        match self.authenticate(credentials_dir) {
            Ok(access_token) => {
                self.session = Some(Session {
                    spreadsheet_id: spreadsheet_id.to_string(),
                    access_token,
                });
                self.last_alert = None;
            }
            Err(e) => self.alert("Spreadsheet authentication failed", &e),
        }
    }

    fn query(&mut self, range: &str) -> Option<Vec<Row>> {
        match self.fetch(range) {
            Ok(rows) if rows.is_empty() => None,
            Ok(rows) => Some(rows),
            Err(e) => {
                self.alert("Spreadsheet query failed", &e);
                None
            }
        }
    }

    fn last_alert(&self) -> Option<&str> {
        self.last_alert.as_deref()
    }
}
