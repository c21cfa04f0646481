//! Positioned byte reader with bounded operations.

use crate::error::{ByteError, ByteResult};

/// Byte order used for multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Least significant byte first. Every Quake format uses this.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// A cursor over an immutable byte buffer.
///
/// All read operations are bounds-checked and return errors on failure.
/// Every read advances the cursor by the width of the type read; a failed
/// read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

macro_rules! read_number {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $width:literal) => {
        $(#[$doc])*
        pub fn $name(&mut self) -> ByteResult<$ty> {
            let bytes = self.read_array::<{ $width }>()?;
            Ok(match self.endian {
                Endian::Little => <$ty>::from_le_bytes(bytes),
                Endian::Big => <$ty>::from_be_bytes(bytes),
            })
        }
    };
}

impl<'a> ByteReader<'a> {
    /// Creates a little-endian reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            endian: Endian::Little,
        }
    }

    /// Creates a little-endian reader positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> ByteResult<Self> {
        let mut reader = Self::new(data);
        reader.seek(offset)?;
        Ok(reader)
    }

    /// Returns a copy of this reader using the given byte order.
    #[must_use]
    pub const fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Returns the byte order used for multi-byte reads.
    #[must_use]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Returns the whole underlying buffer.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the length of the underlying buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes between the cursor and the end of the buffer.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking to exactly the end of the buffer is allowed.
    pub fn seek(&mut self, offset: usize) -> ByteResult<()> {
        if offset > self.data.len() {
            return Err(ByteError::SeekOutOfBounds {
                target: offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Advances the cursor by `count` bytes without reading them.
    pub fn skip(&mut self, count: usize) -> ByteResult<()> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }

    read_number!(
        /// Reads a signed 8-bit integer.
        read_i8, i8, 1
    );
    read_number!(
        /// Reads an unsigned 8-bit integer.
        read_u8, u8, 1
    );
    read_number!(
        /// Reads a signed 16-bit integer.
        read_i16, i16, 2
    );
    read_number!(
        /// Reads an unsigned 16-bit integer.
        read_u16, u16, 2
    );
    read_number!(
        /// Reads a signed 32-bit integer.
        read_i32, i32, 4
    );
    read_number!(
        /// Reads an unsigned 32-bit integer.
        read_u32, u32, 4
    );
    read_number!(
        /// Reads a 32-bit IEEE float.
        read_f32, f32, 4
    );
    read_number!(
        /// Reads a 64-bit IEEE float.
        read_f64, f64, 8
    );

    /// Reads `len` raw bytes as a view into the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a NUL-padded string occupying exactly `len` bytes.
    ///
    /// The string ends at the first NUL; the bytes after it are skipped, so the
    /// cursor always advances by `len`. Bytes map to characters one-to-one
    /// (Latin-1), which keeps non-UTF-8 garbage after a name readable.
    pub fn read_fixed_string(&mut self, len: usize) -> ByteResult<String> {
        let bytes = self.read_bytes(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(latin1(&bytes[..end]))
    }

    /// Reads a NUL-terminated string.
    ///
    /// Stops at the first NUL (consumed) or at the end of the buffer.
    pub fn read_cstring(&mut self) -> ByteResult<String> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                let value = latin1(&rest[..end]);
                self.pos += end + 1;
                Ok(value)
            }
            None => {
                let value = latin1(rest);
                self.pos += rest.len();
                Ok(value)
            }
        }
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn ensure(&self, len: usize) -> ByteResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(ByteError::OutOfBounds {
                offset: self.pos,
                requested: len,
                available,
            });
        }
        Ok(())
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
