//! Sprites.
//!
//! After the 36-byte header the body is a run of single pictures and picture
//! groups, each introduced by an `i32` flag, until the end of the buffer.
//! The header's frame count is informational only.

use std::fmt;

use bytestream::ByteReader;
use schema::{
    decode, FieldType, LengthSpec, Primitive, Record, Schema, SchemaCell, SchemaError, SchemaResult,
    Value,
};

use crate::error::{check_limit, AssetError, AssetResult, LimitKind};
use crate::image::{image_size, ImageData, PixelFormat};
use crate::AssetLimits;

/// Magic of sprite files.
pub const SPR_MAGIC: &str = "IDSP";

pub const SPR_HEADER_SIZE: usize = 36;

static HEADER: SchemaCell = SchemaCell::new(header_layout);
static PICTURE: SchemaCell = SchemaCell::new(picture_layout);
static GROUP: SchemaCell = SchemaCell::new(group_layout);

fn header_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("magic", 4)
        .i32("version")
        .i32("type")
        .f32("radius")
        .i32("max_width")
        .i32("max_height")
        .i32("num_frames")
        .f32("beam_length")
        .i32("sync_type")
        .build()
}

fn picture_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("offset_x")
        .i32("offset_y")
        .i32("width")
        .i32("height")
        .array("pixels", Primitive::U8, LengthSpec::product("width", "height"))
        .build()
}

fn group_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("num_frames")
        .array("times", Primitive::F32, LengthSpec::field("num_frames"))
        .array(
            "frames",
            FieldType::Nested(picture_layout()?),
            LengthSpec::field("num_frames"),
        )
        .build()
}

/// Layout of the sprite header.
pub fn header_schema() -> SchemaResult<&'static Schema> {
    HEADER.get()
}

/// Layout of one picture.
pub fn picture_schema() -> SchemaResult<&'static Schema> {
    PICTURE.get()
}

/// Layout of a picture group after its flag.
pub fn group_schema() -> SchemaResult<&'static Schema> {
    GROUP.get()
}

/// How the sprite faces the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    ParallelUpright,
    FacingUpright,
    Parallel,
    Oriented,
    ParallelOriented,
    Other(i32),
}

impl SpriteKind {
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::ParallelUpright,
            1 => Self::FacingUpright,
            2 => Self::Parallel,
            3 => Self::Oriented,
            4 => Self::ParallelOriented,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::ParallelUpright => 0,
            Self::FacingUpright => 1,
            Self::Parallel => 2,
            Self::Oriented => 3,
            Self::ParallelOriented => 4,
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprHeader {
    pub magic: String,
    pub version: i32,
    pub kind: SpriteKind,
    pub radius: f32,
    pub max_width: i32,
    pub max_height: i32,
    pub num_frames: i32,
    pub beam_length: f32,
    pub sync_type: i32,
}

/// One picture, pixels borrowed from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame<'a> {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: usize,
    pub height: usize,
    pub pixels: &'a [u8],
}

/// Pictures stored together in one group record.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteGroup {
    pub start: usize,
    pub count: usize,
    pub times: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spr<'a> {
    header: SprHeader,
    frames: Vec<SpriteFrame<'a>>,
    groups: Vec<SpriteGroup>,
}

impl<'a> Spr<'a> {
    /// Decodes a sprite with default limits.
    pub fn parse(data: &'a [u8]) -> AssetResult<Self> {
        Self::parse_with_limits(data, &AssetLimits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &AssetLimits) -> AssetResult<Self> {
        let mut reader = ByteReader::new(data);
        let magic = reader.read_fixed_string(4)?;
        if magic != SPR_MAGIC {
            return Err(AssetError::InvalidMagic {
                expected: SPR_MAGIC,
                found: magic,
            });
        }
        reader.seek(0)?;
        let raw = decode(header_schema()?, &mut reader)?;
        let header = SprHeader {
            magic,
            version: raw.i32("version")?,
            kind: SpriteKind::from_raw(raw.i32("type")?),
            radius: raw.f32("radius")?,
            max_width: raw.i32("max_width")?,
            max_height: raw.i32("max_height")?,
            num_frames: raw.i32("num_frames")?,
            beam_length: raw.f32("beam_length")?,
            sync_type: raw.i32("sync_type")?,
        };

        let mut frames = Vec::new();
        let mut groups = Vec::new();
        while !reader.is_at_end() {
            if reader.read_i32()? == 0 {
                let picture = decode(picture_schema()?, &mut reader)?;
                frames.push(read_picture(&picture, limits)?);
            } else {
                let group = decode(group_schema()?, &mut reader)?;
                let pictures = group.array("frames")?;
                let start = frames.len();
                check_limit(
                    LimitKind::SpriteFrames,
                    limits.max_sprite_frames,
                    start + pictures.len(),
                )?;
                for picture in pictures {
                    frames.push(read_picture(as_picture(picture)?, limits)?);
                }
                if pictures.len() > 1 {
                    groups.push(SpriteGroup {
                        start,
                        count: pictures.len(),
                        times: group.f32_array("times")?,
                    });
                }
            }
            check_limit(LimitKind::SpriteFrames, limits.max_sprite_frames, frames.len())?;
        }
        tracing::debug!(
            "decoded SPR with {} frames in {} groups",
            frames.len(),
            groups.len()
        );

        Ok(Self {
            header,
            frames,
            groups,
        })
    }

    #[must_use]
    pub const fn header(&self) -> &SprHeader {
        &self.header
    }

    /// All pictures, groups flattened.
    #[must_use]
    pub fn frames(&self) -> &[SpriteFrame<'a>] {
        &self.frames
    }

    /// Groups with more than one picture.
    #[must_use]
    pub fn groups(&self) -> &[SpriteGroup] {
        &self.groups
    }

    pub fn frame_image(&self, index: usize) -> AssetResult<ImageData<'a>> {
        let frame = self.frames.get(index).ok_or(AssetError::InvalidReference {
            what: "sprite frame",
            index: index as i64,
            count: self.frames.len(),
        })?;
        ImageData::new(
            format!("frame_{index}"),
            frame.width,
            frame.height,
            PixelFormat::Indexed,
            frame.pixels,
        )
    }
}

impl fmt::Display for Spr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPR: {} version {} ({} frames, {} groups)",
            self.header.magic,
            self.header.version,
            self.frames.len(),
            self.groups.len()
        )
    }
}

fn as_picture<'r, 'a>(value: &'r Value<'a>) -> AssetResult<&'r Record<'a>> {
    value.as_record().ok_or_else(|| {
        AssetError::Schema(SchemaError::TypeMismatch {
            name: "frames".to_string(),
            expected: "record",
            found: value.kind_name(),
        })
    })
}

fn read_picture<'a>(raw: &Record<'a>, limits: &AssetLimits) -> AssetResult<SpriteFrame<'a>> {
    let (width, height) = image_size(raw.i32("width")?, raw.i32("height")?, limits)?;
    Ok(SpriteFrame {
        offset_x: raw.i32("offset_x")?,
        offset_y: raw.i32("offset_y")?,
        width,
        height,
        pixels: raw.bytes("pixels")?,
    })
}
