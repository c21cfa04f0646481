//! Palette-indexed images and their expansion to RGBA.
//!
//! Images are extracted from raw lumps as views into the source buffer:
//! - headerless special cases (`CONCHARS`, `pop.lmp`, `colormap.lmp`)
//! - 768-byte palette files previewed as 16x16 RGB
//! - mip textures with a 40-byte header and four levels
//! - everything else with an 8-byte width/height header
//!
//! [`expand`] turns any of them into a flat RGBA buffer.

use archive::{WadEntry, WadEntryKind};
use bytestream::ByteReader;
use schema::{decode, LengthSpec, Primitive, Record, Schema, SchemaCell, SchemaResult};

use crate::error::{check_limit, AssetError, AssetResult, LimitKind};
use crate::pal::{Palette, PALETTE_SIZE};
use crate::AssetLimits;

/// Number of levels stored in a mip texture.
pub const MIP_LEVELS: usize = 4;

/// Size of the mip texture header in bytes.
pub const MIPTEX_HEADER_SIZE: usize = 40;

/// Palette index treated as transparent in the console font.
const CONCHARS_TRANSPARENT: u8 = 0;

/// Palette index treated as transparent everywhere else.
const DEFAULT_TRANSPARENT: u8 = 255;

static MIPTEX: SchemaCell = SchemaCell::new(miptex_layout);
static SIMPLE: SchemaCell = SchemaCell::new(simple_layout);

fn miptex_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("name", 16)
        .i32("width")
        .i32("height")
        .array("offsets", Primitive::I32, LengthSpec::Literal(MIP_LEVELS))
        .build()
}

fn simple_layout() -> SchemaResult<Schema> {
    Schema::builder().i32("width").i32("height").build()
}

/// Layout of a mip texture header, shared by WAD and BSP textures.
pub fn miptex_schema() -> SchemaResult<&'static Schema> {
    MIPTEX.get()
}

/// Layout of the 8-byte header in front of status-bar pictures.
pub fn simple_schema() -> SchemaResult<&'static Schema> {
    SIMPLE.get()
}

/// Headerless lumps recognised by file name.
const SPECIAL_CASES: [(&str, usize, usize); 3] = [
    ("CONCHARS", 128, 128),
    ("pop.lmp", 16, 16),
    ("colormap.lmp", 256, 64),
];

/// How pixels are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel, indexing a palette.
    Indexed,
    /// Three bytes per pixel, used to preview palette files.
    Rgb,
}

impl PixelFormat {
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed => 1,
            Self::Rgb => 3,
        }
    }
}

/// An image borrowed from its source buffer.
///
/// Mip textures carry one pixel view per level; every level holds at least
/// `(width >> k) * (height >> k)` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData<'a> {
    name: String,
    width: usize,
    height: usize,
    format: PixelFormat,
    mips: Vec<&'a [u8]>,
}

impl<'a> ImageData<'a> {
    /// Builds a single-level image, checking that enough pixels are present.
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        format: PixelFormat,
        pixels: &'a [u8],
    ) -> AssetResult<Self> {
        let name = name.into();
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
            .ok_or(AssetError::InvalidCount {
                what: "image size",
                value: i64::MAX,
            })?;
        if pixels.len() < expected {
            return Err(AssetError::PixelCountMismatch {
                name,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name,
            width,
            height,
            format,
            mips: vec![&pixels[..expected]],
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Base level pixels.
    #[must_use]
    pub fn pixels(&self) -> &'a [u8] {
        self.mips.first().copied().unwrap_or_default()
    }

    /// All stored levels, base first.
    #[must_use]
    pub fn mips(&self) -> &[&'a [u8]] {
        &self.mips
    }

    /// Mip textures are drawn without transparency.
    #[must_use]
    pub fn is_mipmapped(&self) -> bool {
        self.mips.len() > 1
    }

    /// Size of the level that [`expand`] would produce for `mip_level`.
    #[must_use]
    pub fn dimensions(&self, mip_level: Option<u8>) -> (usize, usize) {
        let (width, height, _) = self.select(mip_level);
        (width, height)
    }

    /// Levels 2 to 4 pick a smaller mip when present; anything else is the base.
    fn select(&self, mip_level: Option<u8>) -> (usize, usize, &'a [u8]) {
        if let Some(level @ 2..=4) = mip_level {
            let index = usize::from(level - 1);
            if let Some(pixels) = self.mips.get(index).copied() {
                return (self.width >> index, self.height >> index, pixels);
            }
        }
        (self.width, self.height, self.pixels())
    }

    fn transparent_index(&self) -> Option<u8> {
        if self.is_mipmapped() {
            None
        } else if self.name == "CONCHARS" {
            Some(CONCHARS_TRANSPARENT)
        } else {
            Some(DEFAULT_TRANSPARENT)
        }
    }
}

/// Converts an image to RGBA, four bytes per pixel.
///
/// Indexed pixels equal to the transparent index become `[0, 0, 0, 0]`. RGB
/// sources ignore the palette.
#[must_use]
pub fn expand(image: &ImageData<'_>, palette: &Palette, mip_level: Option<u8>) -> Vec<u8> {
    let (width, height, pixels) = image.select(mip_level);
    let count = width * height;
    let mut out = Vec::with_capacity(count * 4);

    match image.format {
        PixelFormat::Indexed => {
            let transparent = image.transparent_index();
            for &index in pixels.iter().take(count) {
                if Some(index) == transparent {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                } else {
                    let [r, g, b] = palette.color(index);
                    out.extend_from_slice(&[r, g, b, 255]);
                }
            }
        }
        PixelFormat::Rgb => {
            for rgb in pixels.chunks_exact(3).take(count) {
                out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
    }
    out
}

/// Extracts an image from raw lump bytes with default limits.
///
/// `name` is matched by its last path component against the headerless
/// special cases. `kind` is the WAD type tag when known.
pub fn image_from_lump<'a>(
    name: &str,
    bytes: &'a [u8],
    kind: Option<WadEntryKind>,
) -> AssetResult<ImageData<'a>> {
    image_from_lump_with_limits(name, bytes, kind, &AssetLimits::default())
}

pub fn image_from_lump_with_limits<'a>(
    name: &str,
    bytes: &'a [u8],
    kind: Option<WadEntryKind>,
    limits: &AssetLimits,
) -> AssetResult<ImageData<'a>> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let is_miptex = kind == Some(WadEntryKind::MipTex);

    if let Some(&(_, width, height)) = SPECIAL_CASES.iter().find(|(n, ..)| *n == file_name) {
        return ImageData::new(name, width, height, PixelFormat::Indexed, bytes);
    }
    if bytes.len() == PALETTE_SIZE && !is_miptex {
        return ImageData::new(name, 16, 16, PixelFormat::Rgb, bytes);
    }
    if is_miptex {
        return miptex_image_with_limits(name, bytes, limits);
    }

    let mut reader = ByteReader::new(bytes);
    let header = decode(simple_schema()?, &mut reader)?;
    let (width, height) = dimensions(&header, limits)?;
    ImageData::new(name, width, height, PixelFormat::Indexed, &bytes[reader.position()..])
}

/// Extracts an image from a WAD entry; compressed entries are refused.
pub fn image_from_wad_entry<'a>(entry: &WadEntry, bytes: &'a [u8]) -> AssetResult<ImageData<'a>> {
    if entry.is_compressed() {
        return Err(AssetError::UnsupportedCompression {
            name: entry.name.clone(),
            compression: entry.compression,
        });
    }
    image_from_lump(&entry.name, bytes, Some(entry.kind))
}

/// Reads a mip texture whose header starts at `bytes[0]`.
///
/// Level offsets are relative to the header. Level `k` holds
/// `(width >> k) * (height >> k)` pixels.
pub fn miptex_image<'a>(name: &str, bytes: &'a [u8]) -> AssetResult<ImageData<'a>> {
    miptex_image_with_limits(name, bytes, &AssetLimits::default())
}

pub(crate) fn miptex_image_with_limits<'a>(
    name: &str,
    bytes: &'a [u8],
    limits: &AssetLimits,
) -> AssetResult<ImageData<'a>> {
    let header = decode(miptex_schema()?, &mut ByteReader::new(bytes))?;
    let (width, height) = dimensions(&header, limits)?;

    let offsets = header.array("offsets")?;
    let mut mips = Vec::with_capacity(MIP_LEVELS);
    for (level, offset) in offsets.iter().enumerate() {
        let offset = offset.as_int().unwrap_or(-1);
        let offset = usize::try_from(offset).map_err(|_| AssetError::InvalidCount {
            what: "mip offset",
            value: offset,
        })?;
        let size = (width >> level) * (height >> level);
        mips.push(ByteReader::at(bytes, offset)?.read_bytes(size)?);
    }

    Ok(ImageData {
        name: name.to_string(),
        width,
        height,
        format: PixelFormat::Indexed,
        mips,
    })
}

/// Reads `width` and `height` from a header record and checks the pixel limit.
pub(crate) fn dimensions(header: &Record<'_>, limits: &AssetLimits) -> AssetResult<(usize, usize)> {
    image_size(header.i32("width")?, header.i32("height")?, limits)
}

pub(crate) fn image_size(width: i32, height: i32, limits: &AssetLimits) -> AssetResult<(usize, usize)> {
    let width = crate::error::count("image width", width)?;
    let height = crate::error::count("image height", height)?;
    let pixels = width.checked_mul(height).unwrap_or(usize::MAX);
    check_limit(LimitKind::ImagePixels, limits.max_image_pixels, pixels)?;
    Ok((width, height))
}
