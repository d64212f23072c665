//! Client configuration: API base URL and session file location.
//!
//! Loaded from `EYECLINIC_*` environment variables. The CLI layers `clap`
//! flags over this; the browser build bakes the base URL in at compile time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const API_URL_VAR: &str = "EYECLINIC_API_URL";
pub const SESSION_FILE_VAR: &str = "EYECLINIC_SESSION_FILE";
pub const INSECURE_HTTP_VAR: &str = "EYECLINIC_INSECURE_HTTP";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api url must start with http:// or https://: {0}")]
    InvalidScheme(String),
    #[error("refusing plain http to non-local host {0}; set EYECLINIC_INSECURE_HTTP=1 to allow")]
    InsecureHttp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub allow_insecure_http: bool,
}

impl ClientConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the API URL is malformed or insecure.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let allow_insecure_http = lookup(INSECURE_HTTP_VAR).as_deref().and_then(parse_bool).unwrap_or(false);
        let api_base_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let session_file = lookup(SESSION_FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(default_session_file, PathBuf::from);

        Ok(Self {
            api_base_url: validate_api_url(&api_base_url, allow_insecure_http)?,
            session_file,
            allow_insecure_http,
        })
    }
}

/// Parse the usual boolean spellings (`1/0`, `true/false`, `yes/no`, `on/off`).
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Check the scheme and strip trailing slashes.
///
/// # Errors
///
/// [`ConfigError::InvalidScheme`] for non-HTTP URLs and
/// [`ConfigError::InsecureHttp`] for plain HTTP to a non-loopback host
/// unless `allow_insecure` is set.
pub fn validate_api_url(url: &str, allow_insecure: bool) -> Result<String, ConfigError> {
    let url = url.trim().trim_end_matches('/');
    if let Some(rest) = url.strip_prefix("http://") {
        let host = if rest.starts_with("[::1]") {
            "[::1]"
        } else {
            rest.split(['/', ':']).next().unwrap_or_default()
        };
        let local = matches!(host, "localhost" | "127.0.0.1" | "[::1]");
        if !local && !allow_insecure {
            return Err(ConfigError::InsecureHttp(host.to_owned()));
        }
        return Ok(url.to_owned());
    }
    if url.starts_with("https://") {
        return Ok(url.to_owned());
    }
    Err(ConfigError::InvalidScheme(url.to_owned()))
}

/// `$HOME/.eyeclinic/session.json`, or the temp dir when `HOME` is unset.
#[must_use]
pub fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join(".eyeclinic")
        .join("session.json")
}
