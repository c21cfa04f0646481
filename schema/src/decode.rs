//! Schema interpreter.
//!
//! Decoding is a single forward pass: fields are read in declaration order and
//! array lengths resolve against the part of the record decoded so far.

use bytestream::{ByteError, ByteReader};

use crate::error::{SchemaError, SchemaResult};
use crate::{FieldType, LengthSpec, Primitive, Record, Schema, Value};

/// Decodes one record at the reader's current position.
pub fn decode<'a>(schema: &Schema, reader: &mut ByteReader<'a>) -> SchemaResult<Record<'a>> {
    let mut record = Record::with_capacity(schema.len());
    for field in schema.fields() {
        if let FieldType::Padding(len) = field.ty {
            reader.skip(len)?;
            continue;
        }
        let value = decode_value(&field.ty, &record, reader)?;
        record.push(field.name.clone(), value);
    }
    Ok(record)
}

/// Decodes `count` consecutive records.
pub fn decode_many<'a>(
    schema: &Schema,
    reader: &mut ByteReader<'a>,
    count: usize,
) -> SchemaResult<Vec<Record<'a>>> {
    ensure_room(reader, count, schema.min_size().max(1))?;
    let mut records = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        records.push(decode(schema, reader)?);
    }
    Ok(records)
}

fn decode_value<'a>(
    ty: &FieldType,
    partial: &Record<'a>,
    reader: &mut ByteReader<'a>,
) -> SchemaResult<Value<'a>> {
    Ok(match ty {
        FieldType::Primitive(p) => read_primitive(*p, reader)?,
        FieldType::FixedString(len) => Value::Str(reader.read_fixed_string(*len)?),
        FieldType::CString => Value::Str(reader.read_cstring()?),
        FieldType::Nested(schema) => Value::Record(decode(schema, reader)?),
        // Only reachable as an array element; the raw bytes are kept.
        FieldType::Padding(len) => Value::Bytes(reader.read_bytes(*len)?),
        FieldType::Array { element, length } => {
            let count = resolve_length(length, partial)?;
            // Zero-width elements still cost a byte each once the count comes from input.
            let floor = usize::from(!matches!(length, LengthSpec::Literal(_)));
            ensure_room(reader, count, element.min_size().max(floor))?;
            if let FieldType::Primitive(Primitive::U8) = **element {
                Value::Bytes(reader.read_bytes(count)?)
            } else {
                let mut items = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    items.push(decode_value(element, partial, reader)?);
                }
                Value::Array(items)
            }
        }
    })
}

fn read_primitive<'a>(primitive: Primitive, reader: &mut ByteReader<'a>) -> SchemaResult<Value<'a>> {
    Ok(match primitive {
        Primitive::I8 => Value::I8(reader.read_i8()?),
        Primitive::I16 => Value::I16(reader.read_i16()?),
        Primitive::I32 => Value::I32(reader.read_i32()?),
        Primitive::U8 => Value::U8(reader.read_u8()?),
        Primitive::U16 => Value::U16(reader.read_u16()?),
        Primitive::U32 => Value::U32(reader.read_u32()?),
        Primitive::F32 => Value::F32(reader.read_f32()?),
        Primitive::F64 => Value::F64(reader.read_f64()?),
    })
}

fn resolve_length(length: &LengthSpec, partial: &Record<'_>) -> SchemaResult<usize> {
    match length {
        LengthSpec::Literal(n) => Ok(*n),
        LengthSpec::FieldRef(name) => count_from(name, partial.int(name)?),
        LengthSpec::FieldProduct(a, b) => {
            let a_val = count_from(a, partial.int(a)?)?;
            let b_val = count_from(b, partial.int(b)?)?;
            a_val
                .checked_mul(b_val)
                .ok_or_else(|| SchemaError::InvalidLength {
                    field: format!("{a}*{b}"),
                    value: i64::MAX,
                })
        }
    }
}

fn count_from(name: &str, value: i64) -> SchemaResult<usize> {
    usize::try_from(value).map_err(|_| SchemaError::InvalidLength {
        field: name.to_string(),
        value,
    })
}

/// Fails before allocating if `count` elements cannot possibly fit.
fn ensure_room(reader: &ByteReader<'_>, count: usize, element_size: usize) -> SchemaResult<()> {
    let needed = count.saturating_mul(element_size);
    let available = reader.remaining();
    if needed > available {
        return Err(SchemaError::Read(ByteError::OutOfBounds {
            offset: reader.position(),
            requested: needed,
            available,
        }));
    }
    Ok(())
}
