//! Error types for byte cursor operations.

use std::fmt;

/// Result type for byte cursor operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    OutOfBounds {
        /// Cursor position at which the read started.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available from `offset`.
        available: usize,
    },

    /// Attempted to move the cursor beyond the end of the buffer.
    SeekOutOfBounds {
        /// Requested cursor position.
        target: usize,
        /// Length of the buffer.
        len: usize,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                offset,
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes at offset {offset} but only {available} bytes available"
                )
            }
            Self::SeekOutOfBounds { target, len } => {
                write!(f, "cannot seek to offset {target} in a {len} byte buffer")
            }
        }
    }
}

impl std::error::Error for ByteError {}
