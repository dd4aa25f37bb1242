//! Wavefront client error types.

use thiserror::Error;

/// Result type for Wavefront operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Broad classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing before any request was made.
    Validation,
    /// Building or executing the request failed.
    Transport,
    /// The response body did not have the expected shape.
    Decode,
}

/// Errors that can occur during Wavefront operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is not set.
    #[error("{0}")]
    Validation(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Wavefront answered with a non-success status.
    #[error("Wavefront returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse a request or response body.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::RequestFailed(_) | Self::InvalidRequest(_) | Self::Status { .. } => {
                ErrorKind::Transport
            }
            Self::Decode(_) => ErrorKind::Decode,
        }
    }
}
