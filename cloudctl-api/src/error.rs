//! Error types for the API client.

use thiserror::Error;

/// Result alias used throughout the client.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by [`crate::ApiClient`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The bearer token was rejected (HTTP 401). Never retried.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request did not complete within the configured timeout.
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Connection failures and other transport-level errors.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected type.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot address API endpoints.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether this error means the credential was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status code carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
