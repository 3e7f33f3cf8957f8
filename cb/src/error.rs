//! Contact book error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;

/// A field that must be non-empty after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Phone,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

/// Errors from contact book operations
///
/// None of these are fatal. A failed operation leaves the in-memory
/// sequence exactly as it was before the call.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Contact {0} cannot be empty")]
    Validation(RequiredField),

    #[error("No contact at position {position} (book has {len})")]
    OutOfRange { position: usize, len: usize },

    #[error("Storage error for {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
}

impl BookError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: impl Into<StorageError>) -> Self {
        Self::Storage {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Check if this error came from the storage layer
    pub fn is_storage(&self) -> bool {
        matches!(self, BookError::Storage { .. })
    }
}

/// Underlying cause of a storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt contact file: {0}")]
    Decode(#[from] CodecError),
}

/// Result of a contact book operation
pub type BookResult<T> = Result<T, BookError>;
