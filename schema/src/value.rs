//! Decoded values and records.

use std::borrow::Cow;

use crate::error::{SchemaError, SchemaResult};

/// One decoded field value.
///
/// Byte arrays borrow from the source buffer; everything else is owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(&'a [u8]),
    Record(Record<'a>),
    Array(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// Returns the value as a signed integer, for any integer variant.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::I32(v) => Some(i64::from(v)),
            Self::U8(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::F32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record<'a>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Record(_) => "record",
            Self::Array(_) => "array",
        }
    }
}

/// Fields decoded from one schema instance, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record<'a> {
    fields: Vec<(Cow<'static, str>, Value<'a>)>,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $label:literal) => {
        $(#[$doc])*
        pub fn $name(&self, name: &str) -> SchemaResult<$ty> {
            match self.require(name)? {
                Value::$variant(v) => Ok(*v),
                other => Err(mismatch(name, $label, other)),
            }
        }
    };
}

impl<'a> Record<'a> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field. Names are expected to be unique; schemas guarantee it.
    pub fn push(&mut self, name: Cow<'static, str>, value: Value<'a>) {
        self.fields.push((name, value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'a>)> {
        self.fields.iter().map(|(name, value)| (name.as_ref(), value))
    }

    fn require(&self, name: &str) -> SchemaResult<&Value<'a>> {
        self.get(name).ok_or_else(|| SchemaError::MissingField {
            name: name.to_string(),
        })
    }

    /// Reads any integer field, widened to `i64`.
    pub fn int(&self, name: &str) -> SchemaResult<i64> {
        let value = self.require(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "integer", value))
    }

    typed_getter!(i8, I8, i8, "i8");
    typed_getter!(i16, I16, i16, "i16");
    typed_getter!(
        /// Reads an `i32` field.
        i32, I32, i32, "i32"
    );
    typed_getter!(u8, U8, u8, "u8");
    typed_getter!(u16, U16, u16, "u16");
    typed_getter!(u32, U32, u32, "u32");
    typed_getter!(
        /// Reads an `f32` field.
        f32, F32, f32, "f32"
    );
    typed_getter!(f64, F64, f64, "f64");

    pub fn str(&self, name: &str) -> SchemaResult<&str> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    /// Reads a `u8` array field as a view into the source buffer.
    pub fn bytes(&self, name: &str) -> SchemaResult<&'a [u8]> {
        let value = self.require(name)?;
        value.as_bytes().ok_or_else(|| mismatch(name, "bytes", value))
    }

    pub fn record(&self, name: &str) -> SchemaResult<&Record<'a>> {
        let value = self.require(name)?;
        value.as_record().ok_or_else(|| mismatch(name, "record", value))
    }

    pub fn array(&self, name: &str) -> SchemaResult<&[Value<'a>]> {
        let value = self.require(name)?;
        value.as_array().ok_or_else(|| mismatch(name, "array", value))
    }

    /// Reads an array of `f32` values.
    pub fn f32_array(&self, name: &str) -> SchemaResult<Vec<f32>> {
        self.array(name)?
            .iter()
            .map(|v| v.as_f32().ok_or_else(|| mismatch(name, "f32", v)))
            .collect()
    }

    /// Reads an array of three `f32` values.
    pub fn vec3(&self, name: &str) -> SchemaResult<[f32; 3]> {
        match self.f32_array(name)?.as_slice() {
            &[x, y, z] => Ok([x, y, z]),
            _ => Err(SchemaError::TypeMismatch {
                name: name.to_string(),
                expected: "f32 x3",
                found: "array",
            }),
        }
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value<'_>) -> SchemaError {
    SchemaError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::I8(v) => serializer.serialize_i8(*v),
            Self::I16(v) => serializer.serialize_i16(*v),
            Self::I32(v) => serializer.serialize_i32(*v),
            Self::U8(v) => serializer.serialize_u8(*v),
            Self::U16(v) => serializer.serialize_u16(*v),
            Self::U32(v) => serializer.serialize_u32(*v),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_bytes(b),
            Self::Record(r) => serde::Serialize::serialize(r, serializer),
            Self::Array(items) => serializer.collect_seq(items),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
