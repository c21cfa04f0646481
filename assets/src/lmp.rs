//! Raw lumps.
//!
//! An LMP has no structure of its own. Callers decide whether it is a picture
//! or text.

use std::fmt;

use archive::WadEntryKind;

use crate::error::AssetResult;
use crate::image::{image_from_lump, ImageData};

/// A named view of untyped bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lmp<'a> {
    name: String,
    data: &'a [u8],
}

impl<'a> Lmp<'a> {
    #[must_use]
    pub fn new(name: impl Into<String>, data: &'a [u8]) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Interprets the lump as a picture.
    pub fn as_image(&self) -> AssetResult<ImageData<'a>> {
        image_from_lump(&self.name, self.data, None)
    }

    /// Interprets the lump as a picture tagged with a WAD type.
    pub fn as_image_of_kind(&self, kind: WadEntryKind) -> AssetResult<ImageData<'a>> {
        image_from_lump(&self.name, self.data, Some(kind))
    }

    /// Interprets the lump as Latin-1 text, stopping at the first NUL.
    #[must_use]
    pub fn as_text(&self) -> String {
        self.data
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect()
    }
}

impl fmt::Display for Lmp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LMP: '{}' ({} bytes)", self.name, self.data.len())
    }
}
