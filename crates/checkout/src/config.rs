//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRINTFORGE_API_BASE_URL` - Base URL of the quote service
//!   (e.g. `https://api.printforge.example`)
//!
//! ## Optional
//! - `PRINTFORGE_HTTP_TIMEOUT_SECS` - HTTP request timeout in seconds
//!   (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default HTTP timeout, in seconds. Large uploads over slow links need
/// headroom; the quote service itself answers in a few seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout workflow configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the quote service, without a trailing endpoint path.
    pub api_base_url: Url,
    /// Timeout applied to every request.
    pub http_timeout: Duration,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("PRINTFORGE_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRINTFORGE_API_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout_secs = get_env_or_default(
            "PRINTFORGE_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("PRINTFORGE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration for a known base URL, with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = base_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidEnvVar("PRINTFORGE_API_BASE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
