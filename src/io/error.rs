use std::io;
use thiserror::Error;

use crate::domain::ValidationErrors;
use crate::storage::StorageError;

/// IO-level errors for seeding and request decoding
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV async parsing error: {0}")]
    CsvAsync(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid account record: {0}")]
    InvalidAccount(ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn error_display_formats_correctly() {
        let errors =
            ValidationErrors::from(ValidationError::new("role", "unknown account role 'ADMIN'"));
        assert_eq!(
            IoError::InvalidAccount(errors).to_string(),
            "Invalid account record: role: unknown account role 'ADMIN'"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let wrapped = IoError::from(io_err);

        match wrapped {
            IoError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn storage_error_conversion() {
        match IoError::from(StorageError::NotFound) {
            IoError::Storage(StorageError::NotFound) => {}
            _ => panic!("Expected Storage error variant"),
        }
    }
}
