//! Storage errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errno for "no space left on device"
const ENOSPC: i32 = 28;

/// A key-value store operation failed
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot create store directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not be moved over the value
    #[error("cannot move {temp:?} into place: {source}")]
    Replace {
        temp: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Keys are limited to `[A-Za-z0-9_-]`
    #[error("'{0}' is not a valid storage key")]
    InvalidKey(String),
}

impl StorageError {
    /// What the user can do about it, when the cause is on their side
    pub fn hint(&self) -> Option<&'static str> {
        let source = self.io_source()?;
        if source.kind() == io::ErrorKind::PermissionDenied {
            Some("check permissions on data_dir and session_dir, or point them somewhere writable")
        } else if source.raw_os_error() == Some(ENOSPC) {
            Some("the disk is full; free some space and try again")
        } else {
            None
        }
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            StorageError::CreateDir { source, .. }
            | StorageError::Read { source, .. }
            | StorageError::Write { source, .. }
            | StorageError::Replace { source, .. } => Some(source),
            StorageError::InvalidKey(_) => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
