//! Error types for the index and its succinct building blocks.

use thiserror::Error;

/// Errors raised by bit vectors, wavelet matrices, the BWT and the FM-Index.
#[derive(Debug, Error)]
pub enum Error {
    /// An index or position argument is outside the valid bound.
    #[error("{op}: range error (index {index}, bound {bound})")]
    Range {
        op: &'static str,
        index: usize,
        bound: usize,
    },

    /// An argument was rejected before any state changed.
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// The operation is not valid in the current lifecycle state.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// Serialized data is structurally inconsistent.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An I/O error occurred during serialization or deserialization.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn range(op: &'static str, index: usize, bound: usize) -> Self {
        Error::Range { op, index, bound }
    }

    pub(crate) fn invalid_arg(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        Error::InvalidFormat(message.into())
    }

    /// True for [`Error::Range`].
    pub fn is_range(&self) -> bool {
        matches!(self, Error::Range { .. })
    }

    /// True for [`Error::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}

/// A specialized Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;
