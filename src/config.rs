//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_APP_NAME: &str = "FitWithJack";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const STORE_DIR: &str = ".fitbook";
const STORE_FILE: &str = "session.json";
const FALLBACK_STORE_FILE: &str = ".fitbook-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub app_name: String,
    pub timeouts: Timeouts,
    pub store_path: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `FITBOOK_API_BASE_URL`: default `http://localhost:8080`
    /// - `FITBOOK_APP_NAME`: default `FitWithJack`
    /// - `FITBOOK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FITBOOK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FITBOOK_STORE_PATH`: default `$HOME/.fitbook/session.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the base URL is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the base URL is set but empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("FITBOOK_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        if api_base_url.is_empty() {
            return Err(ConfigError::Parse("FITBOOK_API_BASE_URL must not be empty".into()));
        }

        let app_name = lookup("FITBOOK_APP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned());

        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("FITBOOK_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("FITBOOK_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let store_path = lookup("FITBOOK_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_store_path(lookup("HOME")), PathBuf::from);

        Ok(Self { api_base_url, app_name, timeouts, store_path })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            app_name: DEFAULT_APP_NAME.to_owned(),
            timeouts: Timeouts::default(),
            store_path: PathBuf::from(FALLBACK_STORE_FILE),
        }
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn default_store_path(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.trim().is_empty()) {
        Some(home) => PathBuf::from(home).join(STORE_DIR).join(STORE_FILE),
        None => PathBuf::from(FALLBACK_STORE_FILE),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
