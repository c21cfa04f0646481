//! Behavior shared by PAK and WAD directory entries.

use std::ops::Range;

use crate::error::{ArchiveError, ArchiveResult, LimitKind};
use crate::Limits;

/// A named byte range inside an archive buffer.
///
/// Names are not unique within a directory; lookups return the first match.
pub trait DirectoryEntry {
    /// Path (PAK) or lump name (WAD).
    fn name(&self) -> &str;

    /// Absolute offset of the entry data.
    fn offset(&self) -> u32;

    /// Stored size of the entry data in bytes.
    fn size(&self) -> u32;

    /// Byte range of the entry data, if it can be represented.
    fn range(&self) -> Option<Range<usize>> {
        let start = usize::try_from(self.offset()).ok()?;
        let end = start.checked_add(usize::try_from(self.size()).ok()?)?;
        Some(start..end)
    }

    /// Returns `true` if the entry data lies within a buffer of `len` bytes.
    fn in_bounds(&self, len: usize) -> bool {
        self.range().is_some_and(|r| r.end <= len)
    }
}

pub(crate) fn entry_slice<'a, E: DirectoryEntry>(
    data: &'a [u8],
    entry: &E,
    limits: &Limits,
) -> ArchiveResult<&'a [u8]> {
    let size = entry.size() as usize;
    if size > limits.max_entry_bytes {
        return Err(ArchiveError::LimitsExceeded {
            kind: LimitKind::EntryBytes,
            limit: limits.max_entry_bytes,
            actual: size,
        });
    }
    entry
        .range()
        .and_then(|range| data.get(range))
        .ok_or_else(|| ArchiveError::EntryOutOfBounds {
            name: entry.name().to_string(),
            offset: entry.offset(),
            size: entry.size(),
            len: data.len(),
        })
}

pub(crate) fn check_count(count: usize, limits: &Limits) -> ArchiveResult<()> {
    if count > limits.max_entries {
        return Err(ArchiveError::LimitsExceeded {
            kind: LimitKind::EntryCount,
            limit: limits.max_entries,
            actual: count,
        });
    }
    Ok(())
}

pub(crate) fn header_count(field: &'static str, value: i32) -> ArchiveResult<usize> {
    usize::try_from(value).map_err(|_| ArchiveError::InvalidHeader {
        field,
        value: i64::from(value),
    })
}
