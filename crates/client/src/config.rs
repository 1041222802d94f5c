//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FURIMA_API_URL` - Base URL of the marketplace API
//!   (e.g., `http://localhost:9000`)

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Marketplace client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the marketplace API.
    pub base_url: Url,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `FURIMA_API_URL` is missing or not a
    /// valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("FURIMA_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("FURIMA_API_URL".to_owned()))?;

        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("FURIMA_API_URL".to_owned(), e.to_string()))?;

        Ok(Self { base_url })
    }

    /// Build a configuration directly from a base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }
}
