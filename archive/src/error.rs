//! Error types for archive directory operations.

use std::fmt;

use bytestream::ByteError;
use schema::SchemaError;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while reading a PAK or WAD directory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveError {
    /// Header or directory records could not be decoded.
    Schema(SchemaError),

    /// A header field holds a value no directory can have.
    InvalidHeader { field: &'static str, value: i64 },

    /// An entry's data range lies outside the archive buffer.
    EntryOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        len: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific archive limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    EntryCount,
    EntryBytes,
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "directory decode error: {e}"),
            Self::InvalidHeader { field, value } => {
                write!(f, "invalid header field {field}: {value}")
            }
            Self::EntryOutOfBounds {
                name,
                offset,
                size,
                len,
            } => {
                write!(
                    f,
                    "entry '{name}' spans {offset}..{} but the archive is {len} bytes",
                    u64::from(*offset) + u64::from(*size)
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EntryCount => "entry count",
            Self::EntryBytes => "entry bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for ArchiveError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<ByteError> for ArchiveError {
    fn from(err: ByteError) -> Self {
        Self::Schema(SchemaError::Read(err))
    }
}
