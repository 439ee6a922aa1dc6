use std::time::Duration;

use thiserror::Error;

/// Failure of a single synthesis attempt
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The deadline passed before the response status line and headers arrived
    #[error("timed out after {0:?} awaiting response headers")]
    HeaderTimeout(Duration),

    /// Connection, protocol or body-read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The dispatch was torn down before this request was issued
    #[error("request cancelled before it was sent")]
    Cancelled,
}

impl FetchError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Only a header timeout is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::HeaderTimeout(_))
    }

    /// HTTP status for [`FetchError::Service`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}
