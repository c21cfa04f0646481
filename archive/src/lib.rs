//! PAK and WAD container directories.
//!
//! This crate reads the two Quake container formats:
//! - PAK archives: a flat directory of paths into one buffer
//! - WAD2 libraries: named lumps tagged with a type byte
//!
//! Both decoders borrow the archive buffer and hand out entry data as views
//! into it. Entry contents are not interpreted here.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Directory sizes are checked against [`Limits`] before allocation.
//! - **Lenient headers, strict ranges** - A wrong magic only warns; out-of-range data is an error.
//! - **First match wins** - Names are not unique; lookups follow directory order.

mod entry;
mod error;
mod limits;
pub mod pak;
pub mod wad;

pub use entry::DirectoryEntry;
pub use error::{ArchiveError, ArchiveResult, LimitKind};
pub use limits::Limits;
pub use pak::{Pak, PakEntry, PakHeader};
pub use wad::{Wad, WadEntry, WadEntryKind, WadHeader};
