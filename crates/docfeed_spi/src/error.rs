//! Error types for the document interface.

use std::io;
use thiserror::Error;

/// Result type for document operations.
pub type SpiResult<T> = Result<T, SpiError>;

/// Errors raised by a document source while its properties are read.
#[derive(Debug, Error)]
pub enum SpiError {
    /// The repository backing the document could not be accessed.
    #[error("repository access failed: {message}")]
    RepositoryAccess {
        /// Description of the failure.
        message: String,
    },

    /// The document itself is unusable, but other documents may be fine.
    #[error("repository document error: {message}")]
    RepositoryDocument {
        /// Description of the failure.
        message: String,
    },

    /// A value could not be coerced to the requested type.
    #[error("invalid value: expected {expected}, got {actual:?}")]
    InvalidValue {
        /// The requested type.
        expected: &'static str,
        /// The textual form of the offending value.
        actual: String,
    },

    /// I/O error while reading a content stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SpiError {
    /// Creates a repository access error.
    pub fn repository_access(message: impl Into<String>) -> Self {
        Self::RepositoryAccess {
            message: message.into(),
        }
    }

    /// Creates a repository document error.
    pub fn repository_document(message: impl Into<String>) -> Self {
        Self::RepositoryDocument {
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::InvalidValue {
            expected,
            actual: actual.into(),
        }
    }
}
