//! Declarative binary record layouts and the interpreter that decodes them.
//!
//! This crate describes how a fixed binary struct is laid out and turns bytes
//! into plain records:
//! - Schema model: ordered named fields of primitive, string, nested and array types
//! - Array lengths that are literals or computed from earlier fields
//! - A single-pass interpreter over a [`bytestream::ByteReader`]
//! - Deterministic schema hashing
//!
//! # Design Principles
//!
//! - **Schemas are data** - No closures; length rules are inspectable variants.
//! - **Fail fast** - Forward and unknown length references are rejected at build time.
//! - **Zero-copy bytes** - `u8` arrays decode to views into the source buffer.
//!
//! # Example
//!
//! ```
//! use bytestream::ByteReader;
//! use schema::{decode, LengthSpec, Primitive, Schema};
//!
//! let picture = Schema::builder()
//!     .i32("width")
//!     .i32("height")
//!     .array("pixels", Primitive::U8, LengthSpec::product("width", "height"))
//!     .build()
//!     .unwrap();
//!
//! let bytes = [2, 0, 0, 0, 1, 0, 0, 0, 7, 8];
//! let record = decode(&picture, &mut ByteReader::new(&bytes)).unwrap();
//! assert_eq!(record.bytes("pixels").unwrap(), &[7, 8]);
//! ```

mod decode;
mod error;
mod field;
mod hash;
mod schema;
mod value;

pub use decode::{decode, decode_many};
pub use error::{SchemaError, SchemaResult};
pub use field::{Field, FieldType, LengthSpec, Primitive};
pub use hash::schema_hash;
pub use schema::{Schema, SchemaBuilder, SchemaCell};
pub use value::{Record, Value};
