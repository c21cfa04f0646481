//! PAK archives.
//!
//! A 12-byte header (`"PACK"`, directory offset, directory size) points at a
//! directory of 64-byte records, each a 56-byte NUL-padded path followed by
//! the data offset and size.

use std::fmt;

use bytestream::ByteReader;
use schema::{decode, decode_many, Schema, SchemaCell, SchemaResult};

use crate::entry::{check_count, entry_slice, header_count};
use crate::error::ArchiveResult;
use crate::{DirectoryEntry, Limits};

/// Expected magic.
pub const PAK_MAGIC: &str = "PACK";

/// Size of one directory record in bytes.
pub const PAK_ENTRY_SIZE: usize = 64;

static HEADER: SchemaCell = SchemaCell::new(header_layout);
static ENTRY: SchemaCell = SchemaCell::new(entry_layout);

fn header_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("magic", 4)
        .i32("dir_offset")
        .i32("dir_size")
        .build()
}

fn entry_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("path", 56)
        .u32("offset")
        .u32("size")
        .build()
}

/// Layout of the PAK header.
pub fn header_schema() -> SchemaResult<&'static Schema> {
    HEADER.get()
}

/// Layout of one PAK directory record.
pub fn entry_schema() -> SchemaResult<&'static Schema> {
    ENTRY.get()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakHeader {
    pub magic: String,
    pub dir_offset: u32,
    pub dir_size: u32,
}

/// One file stored in a PAK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry {
    pub path: String,
    pub offset: u32,
    pub size: u32,
}

impl DirectoryEntry for PakEntry {
    fn name(&self) -> &str {
        &self.path
    }

    fn offset(&self) -> u32 {
        self.offset
    }

    fn size(&self) -> u32 {
        self.size
    }
}

/// A decoded PAK directory borrowing the archive buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pak<'a> {
    data: &'a [u8],
    header: PakHeader,
    entries: Vec<PakEntry>,
    limits: Limits,
}

impl<'a> Pak<'a> {
    /// Decodes the header and directory with default limits.
    pub fn parse(data: &'a [u8]) -> ArchiveResult<Self> {
        Self::parse_with_limits(data, &Limits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &Limits) -> ArchiveResult<Self> {
        let mut reader = ByteReader::new(data);
        let raw = decode(header_schema()?, &mut reader)?;

        let magic = raw.str("magic")?.to_string();
        if magic != PAK_MAGIC {
            tracing::warn!("PAK magic is {:?}, expected {:?}", magic, PAK_MAGIC);
        }
        let dir_offset = header_count("dir_offset", raw.i32("dir_offset")?)?;
        let dir_size = header_count("dir_size", raw.i32("dir_size")?)?;
        if dir_size % PAK_ENTRY_SIZE != 0 {
            tracing::warn!(
                "PAK directory size {} is not a multiple of {}; trailing bytes ignored",
                dir_size,
                PAK_ENTRY_SIZE
            );
        }

        let count = dir_size / PAK_ENTRY_SIZE;
        check_count(count, limits)?;

        reader.seek(dir_offset)?;
        let entries = decode_many(entry_schema()?, &mut reader, count)?
            .iter()
            .map(|record| {
                Ok(PakEntry {
                    path: record.str("path")?.to_string(),
                    offset: record.u32("offset")?,
                    size: record.u32("size")?,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        tracing::debug!("decoded PAK directory with {} entries", entries.len());

        Ok(Self {
            data,
            header: PakHeader {
                magic,
                dir_offset: dir_offset as u32,
                dir_size: dir_size as u32,
            },
            entries,
            limits: limits.clone(),
        })
    }

    #[must_use]
    pub const fn header(&self) -> &PakHeader {
        &self.header
    }

    /// Entries in directory order.
    #[must_use]
    pub fn entries(&self) -> &[PakEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry whose path matches exactly.
    #[must_use]
    pub fn find_entry_by_path(&self, path: &str) -> Option<&PakEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Returns the entry's bytes as a view into the archive buffer.
    pub fn entry_data(&self, entry: &PakEntry) -> ArchiveResult<&'a [u8]> {
        entry_slice(self.data, entry, &self.limits)
    }

    /// Returns `true` if every entry lies within the archive buffer.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.in_bounds(self.data.len()))
    }

    /// One line per entry, `index: path`, with offset and size when verbose.
    #[must_use]
    pub fn listing(&self, verbose: bool) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("{i}: {}", entry.path));
            if verbose {
                out.push_str(&format!(" (offset={}, size={})", entry.offset, entry.size));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Pak<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAK: {} ({} entries)", self.header.magic, self.entries.len())
    }
}
