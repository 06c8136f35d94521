//! # Configuration Management
//!
//! Loads optional settings from a `tidetable.toml` file: default datum and
//! time zone for the CLI, the HTTP timeout, and an endpoint override for
//! testing against a local server. A missing or invalid file is never an
//! error; defaults apply and a warning is logged.

use crate::request::BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration loaded from tidetable.toml.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default request parameters applied when the CLI flags are omitted.
    pub defaults: DefaultsConfig,
    /// HTTP transport settings.
    pub http: HttpConfig,
}

/// Defaults for optional request parameters.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Datum name; parsed case-insensitively, unknown values fall back
    /// to MLLW like everywhere else.
    pub datum: String,
    /// Time zone selector: "gmt" or "lst".
    pub time_zone: String,
}

/// HTTP transport settings.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Endpoint override, mainly for pointing tests at a local server.
    pub base_url: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            datum: "MLLW".to_string(),
            time_zone: "gmt".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 30,
            base_url: BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from tidetable.toml in the working directory.
    /// Falls back to defaults if the file is missing or invalid.
    pub fn load() -> Self {
        Self::load_from_path("tidetable.toml")
    }

    /// Load configuration from the given path, falling back to defaults on
    /// any failure.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(
                        path = %path.as_ref().display(),
                        error = %err,
                        "invalid config file, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    path = %path.as_ref().display(),
                    "no config file found, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_targets_production_endpoint() {
        let config = Config::default();
        assert_eq!(config.defaults.datum, "MLLW");
        assert_eq!(config.defaults.time_zone, "gmt");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.base_url, BASE_URL);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from_path("/nonexistent/tidetable.toml");
        assert_eq!(config.defaults.datum, "MLLW");
    }

    #[test]
    fn garbled_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml = = =").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_unspecified_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\ndatum = \"MSL\"").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.defaults.datum, "MSL");
        assert_eq!(config.defaults.time_zone, "gmt");
        assert_eq!(config.http.base_url, BASE_URL);
    }
}
