//! Error types for the feed encoder.

use docfeed_spi::SpiError;
use std::io;
use thiserror::Error;

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The whole feed is unusable and must be abandoned.
    Fatal,
    /// Only the current document failed; skip it and continue the batch.
    Document,
}

/// Errors that can occur while building a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document source failed while a property was read.
    #[error("repository error: {0}")]
    Repository(#[from] SpiError),

    /// The document asked for a content encoding the index does not accept.
    #[error("unsupported content encoding: {encoding}")]
    UnsupportedEncoding {
        /// The encoding requested by the document.
        encoding: String,
    },

    /// Reading or encoding document content failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The feed prolog could not be written.
    #[error("failed to write feed prolog: {message}")]
    Prolog {
        /// Description of the failure.
        message: String,
    },

    /// The feed epilog could not be written.
    #[error("failed to write feed epilog: {message}")]
    Epilog {
        /// Description of the failure.
        message: String,
    },

    /// The feed was already closed.
    #[error("feed is closed")]
    Closed,

    /// Attempted to truncate the feed beyond its current size.
    #[error("cannot truncate feed to {requested} bytes, current size is {current}")]
    InvalidTruncate {
        /// Requested size.
        requested: usize,
        /// Current size.
        current: usize,
    },

    /// The feed configuration is unusable.
    #[error("invalid feed configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl FeedError {
    /// Creates an unsupported encoding error.
    pub fn unsupported_encoding(encoding: impl Into<String>) -> Self {
        Self::UnsupportedEncoding {
            encoding: encoding.into(),
        }
    }

    /// Creates a prolog error.
    pub fn prolog(message: impl Into<String>) -> Self {
        Self::Prolog {
            message: message.into(),
        }
    }

    /// Creates an epilog error.
    pub fn epilog(message: impl Into<String>) -> Self {
        Self::Epilog {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Classifies this error as fatal or document-level.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(_) | Self::UnsupportedEncoding { .. } | Self::Io(_) => {
                ErrorKind::Document
            }
            Self::Prolog { .. }
            | Self::Epilog { .. }
            | Self::Closed
            | Self::InvalidTruncate { .. }
            | Self::InvalidConfig { .. } => ErrorKind::Fatal,
        }
    }

    /// Returns true if the batch can continue without the failed document.
    pub fn is_document_level(&self) -> bool {
        self.kind() == ErrorKind::Document
    }
}
