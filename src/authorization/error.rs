use std::time::Duration;

use thiserror::Error;

/// Failures of a single outbound HTTP call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Why a transfer was not approved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The decision service answered and the answer was not an approval
    #[error("Authorization denied: {0}")]
    Denied(String),

    /// No usable answer could be obtained, even after retries
    #[error("Authorization service unavailable: {0}")]
    Unavailable(String),
}

impl From<TransportError> for AuthorizationError {
    fn from(error: TransportError) -> Self {
        Self::Unavailable(error.to_string())
    }
}
