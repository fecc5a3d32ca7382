//! Data source error types

use thiserror::Error;

/// Errors that can occur when fetching meter data
///
/// Only the live backend fails; the simulated source always succeeds.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Meter backend unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

/// Result type alias for data source operations
pub type SourceResult<T> = Result<T, SourceError>;
