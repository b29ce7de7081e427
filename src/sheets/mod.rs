//! Read-only spreadsheet access behind an OAuth installed-app flow.
//!
//! `SheetSource` is the seam the controller talks to. Implementations never return errors
//! to the caller: failures are logged, kept as an alert, and show up as "no data".

mod client;
mod oauth;
mod token;

use crate::models::Row;
use std::path::{Path, PathBuf};

pub use client::{rows_from_values, GoogleSheetsClient, SHEETS_API_BASE};
pub use oauth::{consent_url, parse_redirect, Redirect};
pub use token::{AuthorizedUser, ClientSecret, TokenResponse, READONLY_SCOPE};

/// Name of the client secret file inside the credentials directory.
pub const CLIENT_SECRET_FILE: &str = "credentials.json";
/// Name of the cached token file inside the credentials directory.
pub const TOKEN_FILE: &str = "token.json";

/// A spreadsheet that can be opened and queried by range.
pub trait SheetSource {
    /// Open a session for `spreadsheet_id`, authenticating with the files in `credentials_dir`.
    /// On failure the source is left unauthenticated and `last_alert` explains why.
    fn initialise(&mut self, spreadsheet_id: &str, credentials_dir: &Path);

    /// Rows for `range` (e.g. `Sheet1!A2:G`), or None on an empty range or any failure.
    fn query(&mut self, range: &str) -> Option<Vec<Row>>;

    /// Most recent failure, cleared by the next successful `initialise`.
    fn last_alert(&self) -> Option<&str>;
}

/// Errors inside the spreadsheet adapter. They stop at the `SheetSource` boundary.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("client secret file has no \"installed\" or \"web\" section")]
    MissingClientSection,
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("consent listener failed: {0}")]
    Listener(std::io::Error),
    #[error("no consent received within {0} seconds")]
    ConsentTimeout(u64),
    #[error("consent was denied: {0}")]
    ConsentDenied(String),
    #[error("consent redirect did not carry an authorization code")]
    MissingCode,
    #[error("consent redirect state did not match the request")]
    StateMismatch,
    #[error("not authenticated; update the spreadsheet details first")]
    NotAuthenticated,
}
