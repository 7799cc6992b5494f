//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the exam service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with its login page instead of data.
    #[error("response from {endpoint} was the login page (make sure cookies are fresh)")]
    LoginRequired { endpoint: String },

    /// The XSRF header was missing or stale.
    #[error("response from {endpoint} was a CSRF error")]
    Csrf { endpoint: String },

    /// The API returned an error status.
    #[error("API error (HTTP {status}) from {endpoint}: response body '{body}'")]
    Api {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON.
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// A question payload the service would reject.
    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    /// The HTTP client could not be configured.
    #[error("failed to set up HTTP client: {0}")]
    Setup(String),
}

impl ClientError {
    /// Returns `true` if refreshing the session cookies would help.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            ClientError::LoginRequired { .. } | ClientError::Csrf { .. }
        )
    }

    /// Returns the HTTP status, if the service answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
