//! Positioned byte cursor primitives for Quake asset decoding.
//!
//! This crate provides [`ByteReader`] for bounds-checked reads out of a
//! borrowed buffer, and [`ByteWriter`] for assembling test fixtures.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Every read is bounds-checked and never panics.
//! - **No domain knowledge** - This crate knows nothing about lumps, skins, or directories.
//! - **Zero-copy** - Byte runs are returned as views into the source buffer.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_fixed_string("PACK", 4);
//! writer.write_i32(12);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_fixed_string(4).unwrap(), "PACK");
//! assert_eq!(reader.read_i32().unwrap(), 12);
//! assert!(reader.is_at_end());
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ByteError, ByteResult};
pub use reader::{ByteReader, Endian};
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let bytes = ByteWriter::new().finish();
        let reader = ByteReader::new(&bytes);
        assert!(reader.is_empty());
        assert!(reader.is_at_end());
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);
        writer.write_i16(-300);
        writer.write_u32(0xDEAD_BEEF);
        writer.write_f32(0.25);
        writer.write_cstring("maps/e1m1.bsp");
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_i16().unwrap(), -300);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_f32().unwrap(), 0.25);
        assert_eq!(reader.read_cstring().unwrap(), "maps/e1m1.bsp");
        assert!(reader.is_at_end());
    }
}
