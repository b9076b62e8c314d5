//! Error types for tandem-fetch.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

impl FetchError {
    /// Returns `true` for the cancellation outcome, which is not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => FetchError::Transport(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
