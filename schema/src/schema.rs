//! Schema definitions and validation.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{SchemaError, SchemaResult};
use crate::{Field, FieldType, LengthSpec, Primitive};

/// An ordered list of named fields describing one record layout.
///
/// A schema can only be constructed through validation, so every length
/// reference points at an integer field declared earlier in the same schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Field>", into = "Vec<Field>")
)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema from fields after validation.
    pub fn new(fields: Vec<Field>) -> SchemaResult<Self> {
        validate(&fields)?;
        Ok(Self { fields })
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Smallest number of bytes one record can occupy.
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.ty.min_size()))
    }

    /// Exact encoded size, if no field has a data-dependent length.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(fixed_size_of(&f.ty)?))
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = SchemaError;

    fn try_from(fields: Vec<Field>) -> SchemaResult<Self> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

fn fixed_size_of(ty: &FieldType) -> Option<usize> {
    match ty {
        FieldType::Primitive(p) => Some(p.size()),
        FieldType::FixedString(n) | FieldType::Padding(n) => Some(*n),
        FieldType::CString => None,
        FieldType::Nested(schema) => schema.fixed_size(),
        FieldType::Array { element, length } => match length {
            LengthSpec::Literal(n) => fixed_size_of(element)?.checked_mul(*n),
            LengthSpec::FieldRef(_) | LengthSpec::FieldProduct(..) => None,
        },
    }
}

/// Builder for `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Adds a field of any type.
    #[must_use]
    pub fn field(mut self, name: impl Into<Cow<'static, str>>, ty: impl Into<FieldType>) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    #[must_use]
    pub fn i8(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::I8)
    }

    #[must_use]
    pub fn i16(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::I16)
    }

    #[must_use]
    pub fn i32(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::I32)
    }

    #[must_use]
    pub fn u8(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::U8)
    }

    #[must_use]
    pub fn u16(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::U16)
    }

    #[must_use]
    pub fn u32(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::U32)
    }

    #[must_use]
    pub fn f32(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::F32)
    }

    #[must_use]
    pub fn f64(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, Primitive::F64)
    }

    #[must_use]
    pub fn fixed_string(self, name: impl Into<Cow<'static, str>>, len: usize) -> Self {
        self.field(name, FieldType::FixedString(len))
    }

    #[must_use]
    pub fn cstring(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.field(name, FieldType::CString)
    }

    #[must_use]
    pub fn nested(self, name: impl Into<Cow<'static, str>>, schema: Schema) -> Self {
        self.field(name, FieldType::Nested(schema))
    }

    #[must_use]
    pub fn array(
        self,
        name: impl Into<Cow<'static, str>>,
        element: impl Into<FieldType>,
        length: LengthSpec,
    ) -> Self {
        self.field(name, FieldType::array(element.into(), length))
    }

    /// Skips `len` bytes. Padding is named after its position and never
    /// appears in decoded records.
    #[must_use]
    pub fn padding(self, len: usize) -> Self {
        let name = format!("_pad{}", self.fields.len());
        self.field(name, FieldType::Padding(len))
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.fields)
    }
}

/// A schema defined once per process and shared by every decode call.
///
/// ```
/// use schema::{Schema, SchemaCell, SchemaResult};
///
/// fn header() -> SchemaResult<Schema> {
///     Schema::builder().fixed_string("magic", 4).i32("version").build()
/// }
///
/// static HEADER: SchemaCell = SchemaCell::new(header);
///
/// assert_eq!(HEADER.get().unwrap().len(), 2);
/// ```
#[derive(Debug)]
pub struct SchemaCell {
    cell: OnceLock<SchemaResult<Schema>>,
    init: fn() -> SchemaResult<Schema>,
}

impl SchemaCell {
    #[must_use]
    pub const fn new(init: fn() -> SchemaResult<Schema>) -> Self {
        Self {
            cell: OnceLock::new(),
            init,
        }
    }

    /// Returns the schema, building it on first access.
    pub fn get(&self) -> SchemaResult<&Schema> {
        self.cell.get_or_init(self.init).as_ref().map_err(Clone::clone)
    }
}

fn validate(fields: &[Field]) -> SchemaResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (index, field) in fields.iter().enumerate() {
        if let FieldType::Array { .. } = field.ty {
            validate_lengths(&field.name, &field.ty, fields, index)?;
        }
        if !seen.insert(field.name.as_ref()) {
            return Err(SchemaError::DuplicateField {
                name: field.name.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_lengths(name: &str, ty: &FieldType, fields: &[Field], index: usize) -> SchemaResult<()> {
    let FieldType::Array { element, length } = ty else {
        return Ok(());
    };
    for reference in length.references() {
        match fields.iter().position(|f| f.name == reference) {
            Some(pos) if pos < index => {
                let target = &fields[pos].ty;
                let is_integer = matches!(target, FieldType::Primitive(p) if p.is_integer());
                if !is_integer {
                    return Err(SchemaError::TypeMismatch {
                        name: reference.to_string(),
                        expected: "integer",
                        found: target.kind_name(),
                    });
                }
            }
            Some(_) => {
                return Err(SchemaError::ForwardReference {
                    field: name.to_string(),
                    reference: reference.to_string(),
                });
            }
            None => {
                return Err(SchemaError::UnknownLengthField {
                    field: name.to_string(),
                    reference: reference.to_string(),
                });
            }
        }
    }
    // Element lengths resolve against the same enclosing record.
    validate_lengths(name, element, fields, index)
}
