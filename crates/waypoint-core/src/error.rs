//! Error types for waypoint.

use thiserror::Error;

/// Result type alias using waypoint's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for waypoint operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Record store operation failed (wraps sqlx::Error)
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Upstream provider fetch failed (network error or non-2xx)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Resource not found (e.g. geocode returned no results)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(e.to_string())
    }
}
