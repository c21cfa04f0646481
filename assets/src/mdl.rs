//! Alias models.
//!
//! An MDL stores byte-quantised vertex positions for every animation frame
//! over a fixed triangle topology. Skins and frames may be grouped; groups
//! are flattened into sequential lists and recorded as `(start, count)`
//! ranges next to them.
//!
//! Animation is per-vertex morphing only: [`Mdl::blend_frames`] linearly
//! interpolates two expanded frames.

use std::fmt;
use std::sync::OnceLock;

use bytestream::ByteReader;
use schema::{decode, decode_many, LengthSpec, Primitive, Record, Schema, SchemaCell, SchemaResult};

use crate::error::{check_limit, count, AssetError, AssetResult, LimitKind};
use crate::image::{ImageData, PixelFormat};
use crate::types::Vec3;
use crate::AssetLimits;

/// Magic of alias models.
pub const MDL_MAGIC: &str = "IDPO";

/// Version written by the retail tools.
pub const MDL_VERSION: i32 = 6;

pub const MDL_HEADER_SIZE: usize = 84;

static HEADER: SchemaCell = SchemaCell::new(header_layout);
static SKIN_GROUP: SchemaCell = SchemaCell::new(skin_group_layout);
static SKIN_VERTEX: SchemaCell = SchemaCell::new(skin_vertex_layout);
static TRIANGLE: SchemaCell = SchemaCell::new(triangle_layout);
static FRAME: SchemaCell = SchemaCell::new(frame_layout);
static PACKED_VERTEX: SchemaCell = SchemaCell::new(packed_vertex_layout);
static FRAME_GROUP: SchemaCell = SchemaCell::new(frame_group_layout);

fn vec3_layout() -> SchemaResult<Schema> {
    Schema::builder().f32("x").f32("y").f32("z").build()
}

fn packed_vertex_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .array("position", Primitive::U8, LengthSpec::Literal(3))
        .u8("normal_index")
        .build()
}

fn header_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .fixed_string("magic", 4)
        .i32("version")
        .nested("scale", vec3_layout()?)
        .nested("origin", vec3_layout()?)
        .f32("radius")
        .nested("eye_position", vec3_layout()?)
        .i32("num_skins")
        .i32("skin_width")
        .i32("skin_height")
        .i32("num_verts")
        .i32("num_tris")
        .i32("num_frames")
        .i32("synch_type")
        .i32("flags")
        .f32("size")
        .build()
}

fn skin_group_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("count")
        .array("times", Primitive::F32, LengthSpec::field("count"))
        .build()
}

fn skin_vertex_layout() -> SchemaResult<Schema> {
    Schema::builder().i32("onseam").i32("s").i32("t").build()
}

fn triangle_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("front_facing")
        .array("vertices", Primitive::I32, LengthSpec::Literal(3))
        .build()
}

/// Frame header; the packed vertices follow it.
fn frame_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .nested("bbox_min", packed_vertex_layout()?)
        .nested("bbox_max", packed_vertex_layout()?)
        .fixed_string("name", 16)
        .build()
}

fn frame_group_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("count")
        .nested("bbox_min", packed_vertex_layout()?)
        .nested("bbox_max", packed_vertex_layout()?)
        .array("times", Primitive::F32, LengthSpec::field("count"))
        .build()
}

/// Layout of the MDL header.
pub fn header_schema() -> SchemaResult<&'static Schema> {
    HEADER.get()
}

/// Layout of a frame header.
pub fn frame_schema() -> SchemaResult<&'static Schema> {
    FRAME.get()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MdlHeader {
    pub magic: String,
    pub version: i32,
    pub scale: Vec3,
    pub origin: Vec3,
    pub radius: f32,
    pub eye_position: Vec3,
    pub num_skins: usize,
    pub skin_width: usize,
    pub skin_height: usize,
    pub num_verts: usize,
    pub num_tris: usize,
    /// Top-level frame entries; a group counts once.
    pub num_frames: usize,
    pub synch_type: i32,
    pub flags: i32,
    /// Average triangle size.
    pub size: f32,
}

/// A run of skins drawn in turn.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinGroup {
    pub start: usize,
    pub count: usize,
    pub times: Vec<f32>,
}

/// Texture coordinate source for one vertex, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinVertex {
    pub onseam: bool,
    pub s: i32,
    pub t: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub front_facing: bool,
    pub vertices: [usize; 3],
}

/// A byte-quantised position and a normal table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedVertex {
    pub position: [u8; 3],
    pub normal_index: u8,
}

impl PackedVertex {
    fn from_record(record: &Record<'_>) -> SchemaResult<Self> {
        let mut position = [0; 3];
        position.copy_from_slice(record.bytes("position")?);
        Ok(Self {
            position,
            normal_index: record.u8("normal_index")?,
        })
    }

    /// Model-space position.
    #[must_use]
    pub fn dequantize(self, scale: Vec3, origin: Vec3) -> [f32; 3] {
        let [x, y, z] = self.position;
        [
            f32::from(x) * scale.x + origin.x,
            f32::from(y) * scale.y + origin.y,
            f32::from(z) * scale.z + origin.z,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub bbox_min: PackedVertex,
    pub bbox_max: PackedVertex,
    pub vertices: Vec<PackedVertex>,
}

/// A run of frames stored under one group entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGroup {
    pub start: usize,
    pub count: usize,
    pub bbox_min: PackedVertex,
    pub bbox_max: PackedVertex,
    pub times: Vec<f32>,
}

/// Consecutive frames whose names share a prefix, e.g. `run1`..`run6`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub name: String,
    pub start: usize,
    pub count: usize,
}

/// A decoded alias model borrowing the file buffer for skin pixels.
#[derive(Debug, Clone)]
pub struct Mdl<'a> {
    header: MdlHeader,
    skins: Vec<&'a [u8]>,
    skin_groups: Vec<SkinGroup>,
    skin_vertices: Vec<SkinVertex>,
    triangles: Vec<Triangle>,
    frames: Vec<Frame>,
    frame_groups: Vec<FrameGroup>,
    animations: Vec<Animation>,
    uvs: OnceLock<Vec<f32>>,
    positions: Vec<OnceLock<Vec<f32>>>,
}

impl<'a> Mdl<'a> {
    /// Decodes a model with default limits.
    pub fn parse(data: &'a [u8]) -> AssetResult<Self> {
        Self::parse_with_limits(data, &AssetLimits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &AssetLimits) -> AssetResult<Self> {
        let mut reader = ByteReader::new(data);
        let magic = reader.read_fixed_string(4)?;
        if magic != MDL_MAGIC {
            return Err(AssetError::InvalidMagic {
                expected: MDL_MAGIC,
                found: magic,
            });
        }
        reader.seek(0)?;
        let header = read_header(&decode(header_schema()?, &mut reader)?)?;
        if header.version != MDL_VERSION {
            tracing::warn!(
                "MDL version is {}, expected {}",
                header.version,
                MDL_VERSION
            );
        }
        check_limit(LimitKind::Skins, limits.max_skins, header.num_skins)?;
        check_limit(LimitKind::Vertices, limits.max_vertices, header.num_verts)?;
        check_limit(LimitKind::Triangles, limits.max_triangles, header.num_tris)?;
        check_limit(LimitKind::Frames, limits.max_frames, header.num_frames)?;

        let (skins, skin_groups) = read_skins(&header, &mut reader, limits)?;

        let skin_vertices = decode_many(SKIN_VERTEX.get()?, &mut reader, header.num_verts)?
            .iter()
            .map(|r| {
                Ok(SkinVertex {
                    onseam: r.i32("onseam")? != 0,
                    s: r.i32("s")?,
                    t: r.i32("t")?,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        let triangles = decode_many(TRIANGLE.get()?, &mut reader, header.num_tris)?
            .iter()
            .map(|r| read_triangle(r, header.num_verts))
            .collect::<AssetResult<Vec<_>>>()?;

        let (frames, frame_groups) = read_frames(&header, &mut reader, limits)?;
        let animations = group_animations(&frames);
        tracing::debug!(
            "decoded MDL with {} skins, {} triangles, {} frames",
            skins.len(),
            triangles.len(),
            frames.len()
        );

        Ok(Self {
            positions: (0..frames.len()).map(|_| OnceLock::new()).collect(),
            header,
            skins,
            skin_groups,
            skin_vertices,
            triangles,
            frames,
            frame_groups,
            animations,
            uvs: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn header(&self) -> &MdlHeader {
        &self.header
    }

    /// Skin pixel views, groups flattened.
    #[must_use]
    pub fn skins(&self) -> &[&'a [u8]] {
        &self.skins
    }

    #[must_use]
    pub fn skin_groups(&self) -> &[SkinGroup] {
        &self.skin_groups
    }

    #[must_use]
    pub fn skin_vertices(&self) -> &[SkinVertex] {
        &self.skin_vertices
    }

    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Frames in file order, groups flattened.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn frame_groups(&self) -> &[FrameGroup] {
        &self.frame_groups
    }

    /// Frames stored outside any group.
    #[must_use]
    pub fn ungrouped_frame_count(&self) -> usize {
        self.frames.len() - self.frame_groups.iter().map(|g| g.count).sum::<usize>()
    }

    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// Returns the first clip with this base name.
    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Skin `index` as an indexed image.
    pub fn skin_image(&self, index: usize) -> AssetResult<ImageData<'a>> {
        let pixels = self.skins.get(index).copied().ok_or(AssetError::InvalidReference {
            what: "skin",
            index: index as i64,
            count: self.skins.len(),
        })?;
        ImageData::new(
            format!("skin_{index}"),
            self.header.skin_width,
            self.header.skin_height,
            PixelFormat::Indexed,
            pixels,
        )
    }

    /// Texture coordinates, six floats per triangle, computed on first call.
    pub fn uvs(&self) -> &[f32] {
        self.uvs.get_or_init(|| self.expand_uvs())
    }

    /// Positions of frame `index`, nine floats per triangle.
    #[must_use]
    pub fn frame_positions(&self, index: usize) -> Option<&[f32]> {
        let frame = self.frames.get(index)?;
        let cell = self.positions.get(index)?;
        Some(cell.get_or_init(|| self.expand_frame(frame)))
    }

    /// Positions at a fractional frame index.
    ///
    /// The whole part picks a frame (wrapping in both directions) and the
    /// fraction blends towards the next one, wrapping to frame 0 after the
    /// last. A model without frames yields an empty buffer.
    #[must_use]
    pub fn blend_frames(&self, position: f32) -> Vec<f32> {
        let len = self.frames.len();
        if len == 0 {
            return Vec::new();
        }
        let base = position.floor();
        let t = position - base;
        let current = (base as i64).rem_euclid(len as i64) as usize;
        let next = (current + 1) % len;
        match (self.frame_positions(current), self.frame_positions(next)) {
            (Some(a), Some(b)) => interpolate(a, b, t),
            _ => Vec::new(),
        }
    }

    fn expand_uvs(&self) -> Vec<f32> {
        let width = self.header.skin_width.max(1) as f32;
        let height = self.header.skin_height.max(1) as f32;
        let mut uvs = Vec::with_capacity(self.triangles.len() * 6);
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices;
            for index in [c, b, a] {
                let vertex = self.skin_vertices[index];
                let mut u = vertex.s as f32 / width;
                if !triangle.front_facing && vertex.onseam {
                    u += 0.5;
                }
                uvs.extend_from_slice(&[u, 1.0 - vertex.t as f32 / height]);
            }
        }
        uvs
    }

    fn expand_frame(&self, frame: &Frame) -> Vec<f32> {
        let mut positions = Vec::with_capacity(self.triangles.len() * 9);
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices;
            for index in [c, b, a] {
                let vertex = frame.vertices[index];
                positions.extend_from_slice(
                    &vertex.dequantize(self.header.scale, self.header.origin),
                );
            }
        }
        positions
    }
}

impl PartialEq for Mdl<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.skins == other.skins
            && self.skin_groups == other.skin_groups
            && self.skin_vertices == other.skin_vertices
            && self.triangles == other.triangles
            && self.frames == other.frames
            && self.frame_groups == other.frame_groups
    }
}

impl fmt::Display for Mdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MDL: {} version {} ({} skins, {} triangles, {} frames)",
            self.header.magic,
            self.header.version,
            self.skins.len(),
            self.triangles.len(),
            self.frames.len()
        )
    }
}

/// Linear blend of two equally long buffers; `t = 0` returns `a` exactly.
#[must_use]
pub fn interpolate(a: &[f32], b: &[f32], t: f32) -> Vec<f32> {
    a.iter().zip(b).map(|(&a, &b)| a + (b - a) * t).collect()
}

/// Splits a frame name into its base and trailing ASCII digits.
///
/// ```
/// assert_eq!(assets::mdl::split_frame_name("run12"), ("run", "12"));
/// assert_eq!(assets::mdl::split_frame_name("stand"), ("stand", ""));
/// ```
#[must_use]
pub fn split_frame_name(name: &str) -> (&str, &str) {
    let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
    name.split_at(base.len())
}

fn group_animations(frames: &[Frame]) -> Vec<Animation> {
    let mut animations: Vec<Animation> = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        let (base, _) = split_frame_name(&frame.name);
        match animations.last_mut() {
            Some(last) if last.name == base => last.count += 1,
            _ => animations.push(Animation {
                name: base.to_string(),
                start: index,
                count: 1,
            }),
        }
    }
    animations
}

fn read_header(raw: &Record<'_>) -> AssetResult<MdlHeader> {
    Ok(MdlHeader {
        magic: raw.str("magic")?.to_string(),
        version: raw.i32("version")?,
        scale: Vec3::from_field(raw, "scale")?,
        origin: Vec3::from_field(raw, "origin")?,
        radius: raw.f32("radius")?,
        eye_position: Vec3::from_field(raw, "eye_position")?,
        num_skins: count("num_skins", raw.i32("num_skins")?)?,
        skin_width: count("skin_width", raw.i32("skin_width")?)?,
        skin_height: count("skin_height", raw.i32("skin_height")?)?,
        num_verts: count("num_verts", raw.i32("num_verts")?)?,
        num_tris: count("num_tris", raw.i32("num_tris")?)?,
        num_frames: count("num_frames", raw.i32("num_frames")?)?,
        synch_type: raw.i32("synch_type")?,
        flags: raw.i32("flags")?,
        size: raw.f32("size")?,
    })
}

fn read_skins<'a>(
    header: &MdlHeader,
    reader: &mut ByteReader<'a>,
    limits: &AssetLimits,
) -> AssetResult<(Vec<&'a [u8]>, Vec<SkinGroup>)> {
    let skin_size = header
        .skin_width
        .checked_mul(header.skin_height)
        .unwrap_or(usize::MAX);
    check_limit(LimitKind::ImagePixels, limits.max_image_pixels, skin_size)?;
    let mut skins = Vec::with_capacity(header.num_skins.min(reader.remaining()));
    let mut groups = Vec::new();

    for _ in 0..header.num_skins {
        if reader.read_i32()? == 0 {
            skins.push(reader.read_bytes(skin_size)?);
            continue;
        }
        let raw = decode(SKIN_GROUP.get()?, reader)?;
        let group_size = count("skin group size", raw.i32("count")?)?;
        check_limit(LimitKind::Skins, limits.max_skins, skins.len() + group_size)?;
        let start = skins.len();
        for _ in 0..group_size {
            skins.push(reader.read_bytes(skin_size)?);
        }
        groups.push(SkinGroup {
            start,
            count: group_size,
            times: raw.f32_array("times")?,
        });
    }
    Ok((skins, groups))
}

fn read_triangle(raw: &Record<'_>, num_verts: usize) -> AssetResult<Triangle> {
    let mut vertices = [0; 3];
    for (slot, value) in vertices.iter_mut().zip(raw.array("vertices")?) {
        let index = value.as_int().unwrap_or(-1);
        *slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < num_verts)
            .ok_or(AssetError::InvalidReference {
                what: "vertex",
                index,
                count: num_verts,
            })?;
    }
    Ok(Triangle {
        front_facing: raw.i32("front_facing")? != 0,
        vertices,
    })
}

fn read_frames(
    header: &MdlHeader,
    reader: &mut ByteReader<'_>,
    limits: &AssetLimits,
) -> AssetResult<(Vec<Frame>, Vec<FrameGroup>)> {
    let mut frames = Vec::with_capacity(header.num_frames.min(reader.remaining()));
    let mut groups = Vec::new();

    for _ in 0..header.num_frames {
        if reader.read_i32()? == 0 {
            frames.push(read_frame(reader, header.num_verts)?);
            continue;
        }
        let raw = decode(FRAME_GROUP.get()?, reader)?;
        let group_size = count("frame group size", raw.i32("count")?)?;
        check_limit(LimitKind::Frames, limits.max_frames, frames.len() + group_size)?;
        let start = frames.len();
        for _ in 0..group_size {
            frames.push(read_frame(reader, header.num_verts)?);
        }
        groups.push(FrameGroup {
            start,
            count: group_size,
            bbox_min: PackedVertex::from_record(raw.record("bbox_min")?)?,
            bbox_max: PackedVertex::from_record(raw.record("bbox_max")?)?,
            times: raw.f32_array("times")?,
        });
    }
    Ok((frames, groups))
}

fn read_frame(reader: &mut ByteReader<'_>, num_verts: usize) -> AssetResult<Frame> {
    let raw = decode(frame_schema()?, reader)?;
    let vertices = decode_many(PACKED_VERTEX.get()?, reader, num_verts)?
        .iter()
        .map(PackedVertex::from_record)
        .collect::<SchemaResult<Vec<_>>>()?;
    Ok(Frame {
        name: raw.str("name")?.to_string(),
        bbox_min: PackedVertex::from_record(raw.record("bbox_min")?)?,
        bbox_max: PackedVertex::from_record(raw.record("bbox_max")?)?,
        vertices,
    })
}
