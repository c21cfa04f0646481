//! WAD2 texture libraries.
//!
//! The 12-byte header holds the magic, the entry count and the directory
//! offset. Each 32-byte directory record describes one lump.

use std::fmt;

use bytestream::ByteReader;
use schema::{decode, decode_many, Schema, SchemaCell, SchemaResult};

use crate::entry::{check_count, entry_slice, header_count};
use crate::error::ArchiveResult;
use crate::{DirectoryEntry, Limits};

/// Magic used by Quake WAD files.
pub const WAD_MAGIC: &str = "WAD2";

/// Size of one directory record in bytes.
pub const WAD_ENTRY_SIZE: usize = 32;

static HEADER: SchemaCell = SchemaCell::new(header_layout);
static ENTRY: SchemaCell = SchemaCell::new(entry_layout);

fn header_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("magic", 4)
        .i32("dir_entries")
        .i32("dir_offset")
        .build()
}

fn entry_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .u32("offset")
        .u32("dsize")
        .u32("size")
        .u8("type")
        .u8("compression")
        .padding(2)
        .fixed_string("name", 16)
        .build()
}

/// Layout of the WAD header.
pub fn header_schema() -> SchemaResult<&'static Schema> {
    HEADER.get()
}

/// Layout of one WAD directory record.
pub fn entry_schema() -> SchemaResult<&'static Schema> {
    ENTRY.get()
}

/// Lump type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadEntryKind {
    /// `'@'`: a 768-byte palette.
    Palette,
    /// `'B'`: a status-bar picture with an 8-byte size header.
    Status,
    /// `'D'`: a mip-mapped texture.
    MipTex,
    /// `'E'`: the console picture.
    Console,
    Other(u8),
}

impl WadEntryKind {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'@' => Self::Palette,
            b'B' => Self::Status,
            b'D' => Self::MipTex,
            b'E' => Self::Console,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Palette => b'@',
            Self::Status => b'B',
            Self::MipTex => b'D',
            Self::Console => b'E',
            Self::Other(byte) => byte,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(self.as_byte())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadHeader {
    pub magic: String,
    pub dir_entries: u32,
    pub dir_offset: u32,
}

/// One lump stored in a WAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadEntry {
    pub offset: u32,
    /// Decompressed size.
    pub dsize: u32,
    /// Stored size.
    pub size: u32,
    pub kind: WadEntryKind,
    pub compression: u8,
    pub name: String,
}

impl WadEntry {
    /// Compressed lumps can be sliced but not interpreted.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.compression != 0
    }
}

impl DirectoryEntry for WadEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> u32 {
        self.offset
    }

    fn size(&self) -> u32 {
        self.size
    }
}

/// A decoded WAD directory borrowing the archive buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Wad<'a> {
    data: &'a [u8],
    header: WadHeader,
    entries: Vec<WadEntry>,
    limits: Limits,
}

impl<'a> Wad<'a> {
    /// Decodes the header and directory with default limits.
    pub fn parse(data: &'a [u8]) -> ArchiveResult<Self> {
        Self::parse_with_limits(data, &Limits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &Limits) -> ArchiveResult<Self> {
        let mut reader = ByteReader::new(data);
        let raw = decode(header_schema()?, &mut reader)?;

        let magic = raw.str("magic")?.to_string();
        if magic != WAD_MAGIC {
            tracing::warn!("WAD magic is {:?}, expected {:?}", magic, WAD_MAGIC);
        }
        let count = header_count("dir_entries", raw.i32("dir_entries")?)?;
        let dir_offset = header_count("dir_offset", raw.i32("dir_offset")?)?;
        check_count(count, limits)?;

        reader.seek(dir_offset)?;
        let entries = decode_many(entry_schema()?, &mut reader, count)?
            .iter()
            .map(|record| {
                Ok(WadEntry {
                    offset: record.u32("offset")?,
                    dsize: record.u32("dsize")?,
                    size: record.u32("size")?,
                    kind: WadEntryKind::from_byte(record.u8("type")?),
                    compression: record.u8("compression")?,
                    name: record.str("name")?.to_string(),
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        tracing::debug!("decoded WAD directory with {} entries", entries.len());

        Ok(Self {
            data,
            header: WadHeader {
                magic,
                dir_entries: count as u32,
                dir_offset: dir_offset as u32,
            },
            entries,
            limits: limits.clone(),
        })
    }

    #[must_use]
    pub const fn header(&self) -> &WadHeader {
        &self.header
    }

    /// Entries in directory order.
    #[must_use]
    pub fn entries(&self) -> &[WadEntry] {
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

    /// Returns the first entry whose name matches exactly (case-sensitive).
    #[must_use]
    pub fn find_entry_by_name(&self, name: &str) -> Option<&WadEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns the entry's stored bytes, compressed or not.
    pub fn entry_data(&self, entry: &WadEntry) -> ArchiveResult<&'a [u8]> {
        entry_slice(self.data, entry, &self.limits)
    }

    /// Returns `true` if every entry lies within the archive buffer.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.in_bounds(self.data.len()))
    }

    /// One line per entry, `index: name`, with the full record when verbose.
    #[must_use]
    pub fn listing(&self, verbose: bool) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("{i}: {}", entry.name));
            if verbose {
                out.push_str(&format!(
                    " (offset={}, dsize={}, size={}, type={}, compression={})",
                    entry.offset,
                    entry.dsize,
                    entry.size,
                    entry.kind.as_char(),
                    entry.compression
                ));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Wad<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WAD: {} ({} entries)", self.header.magic, self.entries.len())
    }
}
