//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECRU_API_URL` - Base URL of the REST resource store
//!   (e.g., `http://localhost:5000`)
//!
//! ## Optional
//! - `ECRU_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ECRU_SESSION_FILE` - Path of the persisted session token
//!   (default: `.ecru-session.json`)
//! - `ECRU_POLL_INTERVAL_SECS` - Admin dashboard refresh interval
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_SESSION_FILE: &str = ".ecru-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the remote resource store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the REST resource store.
    pub api_url: Url,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Where the storefront persists the logged-in user id between runs.
    pub session_file: PathBuf,
    /// How often the admin dashboard refreshes.
    pub poll_interval: Duration,
}

impl StoreConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `ECRU_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = required_var("ECRU_API_URL")?;
        let api_url = parse_url("ECRU_API_URL", &api_url)?;

        let request_timeout = Duration::from_secs(secs_var(
            "ECRU_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let poll_interval = Duration::from_secs(secs_var(
            "ECRU_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let session_file = std::env::var("ECRU_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            api_url,
            request_timeout,
            session_file,
            poll_interval,
        })
    }

    /// Configuration with defaults for a given endpoint (tests, seeding).
    #[must_use]
    pub fn for_endpoint(api_url: Url) -> Self {
        Self {
            api_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

fn secs_var(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_valid() {
        assert!(parse_url("TEST", "http://localhost:5000").is_ok());
    }

    #[test]
    fn test_parse_url_invalid() {
        let result = parse_url("TEST", "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_for_endpoint_defaults() {
        let config = StoreConfig::for_endpoint("http://localhost:5000".parse().expect("url"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.session_file, PathBuf::from(".ecru-session.json"));
    }
}
