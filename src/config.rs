//! Process configuration from the environment (and `.env`, loaded by the binary).
//!
//! - `HOST`, `PORT`: listen address, default `127.0.0.1:8080`. The panel exposes handles and
//!   local paths, so set `HOST=0.0.0.0` only on a trusted network (e.g. a separate streaming PC).
//! - `GUESSWHO_SPREADSHEET_ID`, `GUESSWHO_CREDENTIALS_DIR`, `GUESSWHO_DATA_RANGE`,
//!   `GUESSWHO_STREAM_DIR`: prefill for the operator fields.
//! - `GUESSWHO_AUTOLOAD`: `1`/`true` loads the roster once at startup.

use crate::logic::LoadForm;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub prefill: LoadForm,
    pub autoload: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefill: LoadForm::default(),
            autoload: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let field = |key: &str| lookup(key).unwrap_or_default();
        Self {
            host: lookup("HOST").unwrap_or_else(default_host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            prefill: LoadForm {
                spreadsheet_id: field("GUESSWHO_SPREADSHEET_ID"),
                credentials_dir: field("GUESSWHO_CREDENTIALS_DIR"),
                data_range: field("GUESSWHO_DATA_RANGE"),
                stream_dir: field("GUESSWHO_STREAM_DIR"),
            },
            autoload: lookup("GUESSWHO_AUTOLOAD")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), AppConfig::default());
    }

    #[test]
    fn listens_on_loopback_unless_host_is_set() {
        assert_eq!(config(&[]).host, "127.0.0.1");
        assert_eq!(config(&[("HOST", "0.0.0.0")]).host, "0.0.0.0");
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "eighty")]).port, 8080);
        assert_eq!(config(&[("PORT", "9000")]).port, 9000);
    }

    #[test]
    fn prefill_and_autoload() {
        let c = config(&[
            ("GUESSWHO_SPREADSHEET_ID", "1Wv7"),
            ("GUESSWHO_DATA_RANGE", "Form responses 1!A2:G"),
            ("GUESSWHO_AUTOLOAD", "True"),
        ]);
        assert_eq!(c.prefill.spreadsheet_id, "1Wv7");
        assert_eq!(c.prefill.data_range, "Form responses 1!A2:G");
        assert_eq!(c.prefill.credentials_dir, "");
        assert!(c.autoload);
    }
}
