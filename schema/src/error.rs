//! Schema validation and decoding errors.

use std::fmt;

use bytestream::ByteError;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building a schema or decoding records with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The underlying buffer ran out.
    Read(ByteError),

    /// Two fields in one schema share a name.
    DuplicateField { name: String },

    /// An array length names a field declared at or after the array.
    ForwardReference { field: String, reference: String },

    /// An array length names a field that does not exist.
    UnknownLengthField { field: String, reference: String },

    /// A record accessor asked for a field the record does not have.
    MissingField { name: String },

    /// A field holds a different type than the one requested.
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An array length resolved to a negative or overflowing count.
    InvalidLength { field: String, value: i64 },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read error: {e}"),
            Self::DuplicateField { name } => write!(f, "duplicate field '{name}'"),
            Self::ForwardReference { field, reference } => {
                write!(
                    f,
                    "length of '{field}' references '{reference}', which is not declared before it"
                )
            }
            Self::UnknownLengthField { field, reference } => {
                write!(f, "length of '{field}' references unknown field '{reference}'")
            }
            Self::MissingField { name } => write!(f, "record has no field '{name}'"),
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "field '{name}' is {found}, expected {expected}"),
            Self::InvalidLength { field, value } => {
                write!(f, "invalid array length {value} from field '{field}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ByteError> for SchemaError {
    fn from(err: ByteError) -> Self {
        Self::Read(err)
    }
}
