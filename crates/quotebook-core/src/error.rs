//! Error types for quotebook-core

use thiserror::Error;

use crate::storage::StorageError;

/// Result type alias using quotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotebook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manually entered quote was rejected
    #[error("Please enter both a quote and a category.")]
    Validation,

    /// Imported payload is not a JSON array of quotes
    #[error("Invalid quotes file: {0}")]
    Format(String),

    /// Collection index out of bounds
    #[error("No quote at position {index} (collection has {len})")]
    Index { index: usize, len: usize },

    /// Remote source could not be reached or returned an error status
    #[error("Network error: {0}")]
    Network(String),

    /// Remote payload could not be decoded
    #[error("Unexpected response from remote: {0}")]
    Parse(String),

    /// A sync was requested while another one is still running
    #[error("A sync is already in progress")]
    SyncInProgress,

    /// Conflict id is not pending (already resolved or never raised)
    #[error("Conflict not found: {0}")]
    ConflictNotFound(String),

    /// Key-value storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl Error {
    /// Whether this error came from talking to the remote source
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_user_facing() {
        assert_eq!(
            Error::Validation.to_string(),
            "Please enter both a quote and a category."
        );
    }

    #[test]
    fn test_index_error_display() {
        let err = Error::Index { index: 4, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_is_remote() {
        assert!(Error::Network("down".into()).is_remote());
        assert!(Error::Parse("bad".into()).is_remote());
        assert!(!Error::Validation.is_remote());
    }
}
