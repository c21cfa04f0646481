//! Deterministic schema hashing.

use blake3::Hasher;

use crate::{FieldType, LengthSpec, Primitive, Schema};

/// Computes a deterministic fingerprint of a schema's layout.
///
/// Field names, order, types and length rules all contribute.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_schema(&mut hasher, schema);
    let hash = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(out)
}

fn write_schema(hasher: &mut Hasher, schema: &Schema) {
    write_len(hasher, schema.len());
    for field in schema.fields() {
        write_str(hasher, &field.name);
        write_type(hasher, &field.ty);
    }
}

fn write_type(hasher: &mut Hasher, ty: &FieldType) {
    match ty {
        FieldType::Primitive(p) => {
            write_u8(hasher, 0);
            write_u8(hasher, primitive_tag(*p));
        }
        FieldType::FixedString(len) => {
            write_u8(hasher, 1);
            write_len(hasher, *len);
        }
        FieldType::CString => {
            write_u8(hasher, 2);
        }
        FieldType::Nested(schema) => {
            write_u8(hasher, 3);
            write_schema(hasher, schema);
        }
        FieldType::Array { element, length } => {
            write_u8(hasher, 4);
            write_type(hasher, element);
            write_length(hasher, length);
        }
        FieldType::Padding(len) => {
            write_u8(hasher, 5);
            write_len(hasher, *len);
        }
    }
}

fn write_length(hasher: &mut Hasher, length: &LengthSpec) {
    match length {
        LengthSpec::Literal(n) => {
            write_u8(hasher, 0);
            write_len(hasher, *n);
        }
        LengthSpec::FieldRef(name) => {
            write_u8(hasher, 1);
            write_str(hasher, name);
        }
        LengthSpec::FieldProduct(a, b) => {
            write_u8(hasher, 2);
            write_str(hasher, a);
            write_str(hasher, b);
        }
    }
}

const fn primitive_tag(p: Primitive) -> u8 {
    match p {
        Primitive::I8 => 0,
        Primitive::I16 => 1,
        Primitive::I32 => 2,
        Primitive::U8 => 3,
        Primitive::U16 => 4,
        Primitive::U32 => 5,
        Primitive::F32 => 6,
        Primitive::F64 => 7,
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_len(hasher: &mut Hasher, value: usize) {
    hasher.update(&(value as u64).to_le_bytes());
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}
