use thiserror::Error;

/// Failures delivering a completion event
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Queue closed")]
    Closed,
}
