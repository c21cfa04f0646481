//! Field type definitions.

use std::borrow::Cow;

use crate::Schema;

/// Fixed-width scalar types, always read in the reader's byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    I8,
    I16,
    I32,
    U8,
    U16,
    U32,
    F32,
    F64,
}

impl Primitive {
    /// Width of the scalar in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Returns `true` for the integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// How many elements an array field holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthSpec {
    /// A count fixed by the layout.
    Literal(usize),
    /// The value of an integer field decoded earlier in the same record.
    FieldRef(Cow<'static, str>),
    /// The product of two integer fields decoded earlier in the same record.
    FieldProduct(Cow<'static, str>, Cow<'static, str>),
}

impl LengthSpec {
    /// Shorthand for [`LengthSpec::FieldRef`].
    #[must_use]
    pub fn field(name: impl Into<Cow<'static, str>>) -> Self {
        Self::FieldRef(name.into())
    }

    /// Shorthand for [`LengthSpec::FieldProduct`].
    #[must_use]
    pub fn product(a: impl Into<Cow<'static, str>>, b: impl Into<Cow<'static, str>>) -> Self {
        Self::FieldProduct(a.into(), b.into())
    }

    /// Names of the fields this length depends on.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let (a, b) = match self {
            Self::Literal(_) => (None, None),
            Self::FieldRef(name) => (Some(name.as_ref()), None),
            Self::FieldProduct(a, b) => (Some(a.as_ref()), Some(b.as_ref())),
        };
        a.into_iter().chain(b)
    }
}

/// The type of one schema field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    Primitive(Primitive),
    /// NUL-padded string occupying exactly this many bytes.
    FixedString(usize),
    /// NUL-terminated string.
    CString,
    Nested(Schema),
    Array {
        element: Box<FieldType>,
        length: LengthSpec,
    },
    /// Bytes that are skipped and not stored in the record.
    Padding(usize),
}

impl FieldType {
    /// Creates an array type.
    #[must_use]
    pub fn array(element: FieldType, length: LengthSpec) -> Self {
        Self::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Smallest number of bytes one value of this type can occupy.
    ///
    /// Arrays whose length depends on other fields count as empty.
    #[must_use]
    pub fn min_size(&self) -> usize {
        match self {
            Self::Primitive(p) => p.size(),
            Self::FixedString(n) | Self::Padding(n) => *n,
            Self::CString => 1,
            Self::Nested(schema) => schema.min_size(),
            Self::Array { element, length } => match length {
                LengthSpec::Literal(n) => element.min_size().saturating_mul(*n),
                LengthSpec::FieldRef(_) | LengthSpec::FieldProduct(..) => 0,
            },
        }
    }

    /// Short human-readable name of the type.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::FixedString(_) => "fixed string",
            Self::CString => "cstring",
            Self::Nested(_) => "record",
            Self::Array { .. } => "array",
            Self::Padding(_) => "padding",
        }
    }
}

impl From<Primitive> for FieldType {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

/// A named field within a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: Cow<'static, str>,
    pub ty: FieldType,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}
