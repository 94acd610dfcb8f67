//! Error types returned by the client.

use reqwest::StatusCode;
use std::error::Error;
use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client could not be constructed (e.g. missing credential).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation was called with parameters the API cannot honour.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced a well-formed HTTP response.
    #[error("Transport error: {0}")]
    Transport(Box<dyn Error + Send + Sync>),

    /// The rate limit was still exhausted after the permitted retries.
    #[error("Rate limit exhausted. Resets at epoch {reset_epoch}")]
    RateLimitExhausted { reset_epoch: i64 },

    /// A non-2xx response that is not a recoverable rate limit.
    #[error("API error: {status}: {message}")]
    PermissionOrClient { status: StatusCode, message: String },

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to decode file content: {0}")]
    ContentDecode(#[from] base64::DecodeError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

impl ClientError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::PermissionOrClient { status, .. } => Some(*status),
            ClientError::RateLimitExhausted { .. } => Some(StatusCode::FORBIDDEN),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
