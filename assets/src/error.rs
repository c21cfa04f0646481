//! Error types for content decoding.

use std::fmt;

use archive::ArchiveError;
use bytestream::ByteError;
use schema::SchemaError;

/// Result type for content decoding.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised while decoding or expanding BSP, MDL, SPR, PAL and LMP data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssetError {
    /// A record could not be decoded; carries the read position on overrun.
    Schema(SchemaError),

    /// A container entry could not be sliced.
    Archive(ArchiveError),

    /// The file does not start with the expected identifier.
    InvalidMagic {
        expected: &'static str,
        found: String,
    },

    /// The format version is not the one this decoder reads.
    UnsupportedVersion { expected: i32, found: i32 },

    /// The entry is compressed and cannot be interpreted.
    UnsupportedCompression { name: String, compression: u8 },

    /// The buffer has the wrong length for a fixed-size format.
    SizeMismatch { expected: usize, actual: usize },

    /// An index points outside the table it refers to.
    InvalidReference {
        what: &'static str,
        index: i64,
        count: usize,
    },

    /// A count or dimension read from the file is negative or overflows.
    InvalidCount { what: &'static str, value: i64 },

    /// An image has fewer pixels than its dimensions require.
    PixelCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// No texture was decoded at this directory index.
    MissingTexture { index: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific content limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    LumpElements,
    Skins,
    Frames,
    Vertices,
    Triangles,
    ImagePixels,
    SpriteFrames,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "decode error: {e}"),
            Self::Archive(e) => write!(f, "archive error: {e}"),
            Self::InvalidMagic { expected, found } => {
                write!(f, "invalid magic {found:?}, expected {expected:?}")
            }
            Self::UnsupportedVersion { expected, found } => {
                write!(f, "unsupported version {found}, expected {expected}")
            }
            Self::UnsupportedCompression { name, compression } => {
                write!(
                    f,
                    "entry '{name}' uses compression {compression}, which is not supported"
                )
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected} bytes, got {actual}")
            }
            Self::InvalidReference { what, index, count } => {
                write!(f, "{what} index {index} out of range for {count} entries")
            }
            Self::InvalidCount { what, value } => write!(f, "invalid {what}: {value}"),
            Self::PixelCountMismatch {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "image '{name}' needs {expected} pixels but only {actual} are present"
                )
            }
            Self::MissingTexture { index } => write!(f, "no texture at index {index}"),
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
            Self::LumpElements => "lump elements",
            Self::Skins => "skin count",
            Self::Frames => "frame count",
            Self::Vertices => "vertex count",
            Self::Triangles => "triangle count",
            Self::ImagePixels => "image pixels",
            Self::SpriteFrames => "sprite frame count",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Archive(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for AssetError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<ByteError> for AssetError {
    fn from(err: ByteError) -> Self {
        Self::Schema(SchemaError::Read(err))
    }
}

impl From<ArchiveError> for AssetError {
    fn from(err: ArchiveError) -> Self {
        Self::Archive(err)
    }
}

/// Fails if `actual` exceeds `limit`.
pub(crate) fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> AssetResult<()> {
    if actual > limit {
        return Err(AssetError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

/// Converts a signed header count into a size.
pub(crate) fn count(what: &'static str, value: i32) -> AssetResult<usize> {
    usize::try_from(value).map_err(|_| AssetError::InvalidCount {
        what,
        value: i64::from(value),
    })
}
