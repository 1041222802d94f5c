//! CLI command implementations.

pub mod auth;
pub mod browse;
pub mod listing;
pub mod trade;

use secrecy::SecretString;
use thiserror::Error;

use furima_client::{ApiError, ClientConfig, ConfigError, ListingError, MarketClient, PurchaseError};
use furima_core::{Credential, UserId};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable holds an unusable value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// Command arguments don't add up.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Client configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Marketplace API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Listing flow failed.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// Purchase flow failed.
    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    /// Reading a local file (the item image) failed.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
}

/// Build the API client from the environment.
pub(crate) fn client() -> Result<MarketClient, CliError> {
    dotenvy::dotenv().ok();
    Ok(MarketClient::new(&ClientConfig::from_env()?))
}

/// Load the bearer credential from `FURIMA_USER_ID` / `FURIMA_TOKEN`.
pub(crate) fn credential() -> Result<Credential, CliError> {
    dotenvy::dotenv().ok();

    let user_id = std::env::var("FURIMA_USER_ID")
        .map_err(|_| CliError::MissingEnvVar("FURIMA_USER_ID"))?
        .parse::<i64>()
        .map_err(|e| CliError::InvalidEnvVar("FURIMA_USER_ID", e.to_string()))?;

    let token =
        std::env::var("FURIMA_TOKEN").map_err(|_| CliError::MissingEnvVar("FURIMA_TOKEN"))?;

    Ok(Credential::new(
        UserId::new(user_id),
        SecretString::from(token),
    ))
}
