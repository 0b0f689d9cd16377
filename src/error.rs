//! Error types for clouddrive.

use thiserror::Error;

use crate::account::{AccountError, ValidationError};

/// Common error type for clouddrive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Key-value store error.
    ///
    /// Raised by store backends when an entry cannot be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Account operation failed.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for clouddrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = DriveError::Storage("lock poisoned".to_string());
        assert_eq!(err.to_string(), "storage error: lock poisoned");
    }

    #[test]
    fn test_account_error_conversion() {
        let err: DriveError = AccountError::EmailTaken.into();
        assert!(matches!(err, DriveError::Account(AccountError::EmailTaken)));
        assert!(err.to_string().starts_with("account error"));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: DriveError = ValidationError::NameEmpty.into();
        assert_eq!(err.to_string(), "validation error: name cannot be empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = DriveError::NotFound("folder".to_string());
        assert_eq!(err.to_string(), "folder not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DriveError = io_err.into();
        assert!(matches!(err, DriveError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DriveError = json_err.into();
        assert!(matches!(err, DriveError::Serialization(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(DriveError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
