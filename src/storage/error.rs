use thiserror::Error;

use crate::domain::DomainError;

/// Storage-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found")]
    NotFound,

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
}
