//! Version 29 BSP levels.
//!
//! The header is a version number followed by fifteen `(offset, size)` lump
//! descriptors. Vertices, edges, faces, texinfos, models, the edge list and
//! the miptex directory are decoded; every other lump stays available as raw
//! bytes through [`Bsp::lump`].
//!
//! Geometry is expanded per model into one flat triangle list per texture.
//! All indices are checked while parsing, so expansion cannot fail and is
//! computed once on first access.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use bytestream::ByteReader;
use schema::{decode, decode_many, LengthSpec, Primitive, Record, Schema, SchemaCell, SchemaResult};

use crate::error::{check_limit, count, AssetError, AssetResult, LimitKind};
use crate::image::{miptex_image_with_limits, miptex_schema, ImageData};
use crate::types::Vec3;
use crate::AssetLimits;

/// The only version this decoder reads.
pub const BSP_VERSION: i32 = 29;

/// Version plus fifteen lump descriptors.
pub const BSP_HEADER_SIZE: usize = 4 + LumpKind::ALL.len() * 8;

static HEADER: SchemaCell = SchemaCell::new(header_layout);
static VERTEX: SchemaCell = SchemaCell::new(vertex_layout);
static EDGE: SchemaCell = SchemaCell::new(edge_layout);
static LEDGE: SchemaCell = SchemaCell::new(ledge_layout);
static FACE: SchemaCell = SchemaCell::new(face_layout);
static TEXINFO: SchemaCell = SchemaCell::new(texinfo_layout);
static MODEL: SchemaCell = SchemaCell::new(model_layout);
static MIPTEX_DIRECTORY: SchemaCell = SchemaCell::new(miptex_directory_layout);

fn vec3_layout() -> SchemaResult<Schema> {
    Schema::builder().f32("x").f32("y").f32("z").build()
}

fn header_layout() -> SchemaResult<Schema> {
    let lump = Schema::builder().i32("offset").i32("size").build()?;
    LumpKind::ALL
        .iter()
        .fold(Schema::builder().i32("version"), |builder, kind| {
            builder.nested(kind.name(), lump.clone())
        })
        .build()
}

fn vertex_layout() -> SchemaResult<Schema> {
    vec3_layout()
}

fn edge_layout() -> SchemaResult<Schema> {
    Schema::builder().u16("v1").u16("v2").build()
}

/// Signed edge index; the sign picks the edge's direction.
fn ledge_layout() -> SchemaResult<Schema> {
    Schema::builder().i32("edge").build()
}

fn face_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .u16("plane_id")
        .u16("side")
        .i32("ledge_id")
        .u16("num_edges")
        .u16("texinfo_id")
        .u8("light_type")
        .u8("light_base")
        .array("light", Primitive::U8, LengthSpec::Literal(2))
        .i32("lightmap")
        .build()
}

fn texinfo_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .nested("vec_s", vec3_layout()?)
        .f32("dist_s")
        .nested("vec_t", vec3_layout()?)
        .f32("dist_t")
        .u32("tex_id")
        .u32("animated")
        .build()
}

fn model_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .nested("bbox_min", vec3_layout()?)
        .nested("bbox_max", vec3_layout()?)
        .nested("origin", vec3_layout()?)
        .array("node_ids", Primitive::I32, LengthSpec::Literal(4))
        .i32("num_leafs")
        .i32("face_id")
        .i32("num_faces")
        .build()
}

fn miptex_directory_layout() -> SchemaResult<Schema> {
    Schema::builder()
        .i32("num_miptex")
        .array("offsets", Primitive::I32, LengthSpec::field("num_miptex"))
        .build()
}

/// Layout of the BSP header.
pub fn header_schema() -> SchemaResult<&'static Schema> {
    HEADER.get()
}

/// Layout of one face record.
pub fn face_schema() -> SchemaResult<&'static Schema> {
    FACE.get()
}

/// Layout of one texinfo record.
pub fn texinfo_schema() -> SchemaResult<&'static Schema> {
    TEXINFO.get()
}

/// Layout of one model record.
pub fn model_schema() -> SchemaResult<&'static Schema> {
    MODEL.get()
}

/// The fifteen lumps, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LumpKind {
    Entities,
    Planes,
    Miptex,
    Vertices,
    Visilist,
    Nodes,
    Texinfo,
    Faces,
    Lightmaps,
    Clipnodes,
    Leaves,
    Lface,
    Edges,
    Ledges,
    Models,
}

impl LumpKind {
    pub const ALL: [Self; 15] = [
        Self::Entities,
        Self::Planes,
        Self::Miptex,
        Self::Vertices,
        Self::Visilist,
        Self::Nodes,
        Self::Texinfo,
        Self::Faces,
        Self::Lightmaps,
        Self::Clipnodes,
        Self::Leaves,
        Self::Lface,
        Self::Edges,
        Self::Ledges,
        Self::Models,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Planes => "planes",
            Self::Miptex => "miptex",
            Self::Vertices => "vertices",
            Self::Visilist => "visilist",
            Self::Nodes => "nodes",
            Self::Texinfo => "texinfo",
            Self::Faces => "faces",
            Self::Lightmaps => "lightmaps",
            Self::Clipnodes => "clipnodes",
            Self::Leaves => "leaves",
            Self::Lface => "lface",
            Self::Edges => "edges",
            Self::Ledges => "ledges",
            Self::Models => "models",
        }
    }

    /// Size of one element for the lumps decoded into tables.
    #[must_use]
    pub const fn element_size(self) -> Option<usize> {
        match self {
            Self::Vertices => Some(12),
            Self::Edges | Self::Ledges => Some(4),
            Self::Faces => Some(20),
            Self::Texinfo => Some(40),
            Self::Models => Some(64),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A region of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lump {
    pub offset: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BspHeader {
    pub version: i32,
    lumps: [Lump; 15],
}

impl BspHeader {
    #[must_use]
    pub const fn lump(&self, kind: LumpKind) -> Lump {
        self.lumps[kind.index()]
    }

    /// Elements in a table lump; partial trailing elements are dropped.
    #[must_use]
    pub fn element_count(&self, kind: LumpKind) -> usize {
        kind.element_size()
            .map_or(0, |size| self.lump(kind).size / size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub v1: u16,
    pub v2: u16,
}

/// Texture projection for a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexInfo {
    pub vec_s: Vec3,
    pub dist_s: f32,
    pub vec_t: Vec3,
    pub dist_t: f32,
    /// Index into the miptex directory.
    pub tex_id: u32,
    pub animated: u32,
}

impl TexInfo {
    /// Texture coordinates of `point` for a `width` x `height` texture, V flipped.
    #[must_use]
    pub fn uv(&self, point: Vec3, width: f32, height: f32) -> [f32; 2] {
        [
            (point.dot(self.vec_s) + self.dist_s) / width,
            -(point.dot(self.vec_t) + self.dist_t) / height,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub plane_id: u16,
    pub side: u16,
    /// First entry in the edge list.
    pub ledge_id: i32,
    pub num_edges: u16,
    pub texinfo_id: u16,
    pub light_type: u8,
    pub light_base: u8,
    pub light: [u8; 2],
    pub lightmap: i32,
}

impl Face {
    /// Triangles produced by fanning this face.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        (self.num_edges as usize).saturating_sub(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    pub bbox_min: Vec3,
    pub bbox_max: Vec3,
    pub origin: Vec3,
    pub node_ids: [i32; 4],
    pub num_leafs: i32,
    pub face_id: i32,
    pub num_faces: i32,
}

impl Model {
    /// Face indices owned by this model. Ranges are checked during parsing.
    #[must_use]
    pub fn face_range(&self) -> std::ops::Range<usize> {
        let start = usize::try_from(self.face_id).unwrap_or(0);
        let len = usize::try_from(self.num_faces).unwrap_or(0);
        start..start + len
    }
}

/// A decoded texture header in the miptex lump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiptexEntry {
    pub name: String,
    /// Absolute offset of the texture header in the file.
    pub offset: usize,
    pub width: usize,
    pub height: usize,
}

/// A directory slot that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    /// Offset as written in the directory, relative to the miptex lump.
    pub relative_offset: i64,
    pub reason: String,
}

/// Textures by directory index.
///
/// Unreadable slots stay in place as `None`, so `TexInfo::tex_id` keeps
/// pointing at the right texture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MiptexDirectory {
    slots: Vec<Option<MiptexEntry>>,
    skipped: Vec<SkippedEntry>,
}

impl MiptexDirectory {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MiptexEntry> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of slots, readable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Readable entries with their directory index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MiptexEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|entry| (i, entry)))
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Returns `true` if no slot was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, index: usize, relative_offset: i64, reason: String) {
        tracing::warn!(
            "BSP miptex entry {} at lump offset {} is unreadable: {}",
            index,
            relative_offset,
            reason
        );
        self.slots.push(None);
        self.skipped.push(SkippedEntry {
            index,
            relative_offset,
            reason,
        });
    }
}

/// Expanded triangles for the faces of one model sharing a texture.
///
/// `positions` holds nine floats per triangle and `uvs` six.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureGeometry {
    pub tex_id: u32,
    /// Face indices in scan order.
    pub face_ids: Vec<usize>,
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
}

impl TextureGeometry {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 9
    }
}

/// One entry per texture used by the model, by ascending texture id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelGeometry {
    pub groups: Vec<TextureGeometry>,
}

impl ModelGeometry {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(TextureGeometry::triangle_count).sum()
    }
}

/// A decoded BSP borrowing the file buffer.
#[derive(Debug, Clone)]
pub struct Bsp<'a> {
    data: &'a [u8],
    header: BspHeader,
    miptex: MiptexDirectory,
    vertices: Vec<Vec3>,
    edges: Vec<Edge>,
    ledges: Vec<i32>,
    faces: Vec<Face>,
    texinfos: Vec<TexInfo>,
    models: Vec<Model>,
    limits: AssetLimits,
    geometry: OnceLock<Vec<ModelGeometry>>,
}

impl<'a> Bsp<'a> {
    /// Decodes a BSP with default limits.
    pub fn parse(data: &'a [u8]) -> AssetResult<Self> {
        Self::parse_with_limits(data, &AssetLimits::default())
    }

    pub fn parse_with_limits(data: &'a [u8], limits: &AssetLimits) -> AssetResult<Self> {
        let version = ByteReader::new(data).read_i32()?;
        if version != BSP_VERSION {
            return Err(AssetError::UnsupportedVersion {
                expected: BSP_VERSION,
                found: version,
            });
        }
        let header = parse_header(data)?;

        let vertices = table(data, &header, LumpKind::Vertices, VERTEX.get()?, limits)?
            .iter()
            .map(Vec3::from_record)
            .collect::<SchemaResult<Vec<_>>>()?;
        let edges = table(data, &header, LumpKind::Edges, EDGE.get()?, limits)?
            .iter()
            .map(|r| {
                Ok(Edge {
                    v1: r.u16("v1")?,
                    v2: r.u16("v2")?,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        let faces = table(data, &header, LumpKind::Faces, face_schema()?, limits)?
            .iter()
            .map(read_face)
            .collect::<SchemaResult<Vec<_>>>()?;
        let texinfos = table(data, &header, LumpKind::Texinfo, texinfo_schema()?, limits)?
            .iter()
            .map(read_texinfo)
            .collect::<SchemaResult<Vec<_>>>()?;
        let models = table(data, &header, LumpKind::Models, model_schema()?, limits)?
            .iter()
            .map(read_model)
            .collect::<SchemaResult<Vec<_>>>()?;
        let ledges = table(data, &header, LumpKind::Ledges, LEDGE.get()?, limits)?
            .iter()
            .map(|r| r.i32("edge"))
            .collect::<SchemaResult<Vec<_>>>()?;
        let miptex = read_miptex_directory(data, &header, limits)?;

        let bsp = Self {
            data,
            header,
            miptex,
            vertices,
            edges,
            ledges,
            faces,
            texinfos,
            models,
            limits: limits.clone(),
            geometry: OnceLock::new(),
        };
        bsp.validate()?;
        tracing::debug!(
            "decoded BSP with {} vertices, {} faces, {} models, {} miptex",
            bsp.vertices.len(),
            bsp.faces.len(),
            bsp.models.len(),
            bsp.miptex.len()
        );
        Ok(bsp)
    }

    /// Checks every index the geometry expansion follows.
    fn validate(&self) -> AssetResult<()> {
        for edge in &self.edges {
            for v in [edge.v1, edge.v2] {
                reference("vertex", i64::from(v), self.vertices.len())?;
            }
        }
        for &ledge in &self.ledges {
            reference("edge", i64::from(ledge.unsigned_abs()), self.edges.len())?;
        }
        for face in &self.faces {
            reference("texinfo", i64::from(face.texinfo_id), self.texinfos.len())?;
            let end = i64::from(face.ledge_id) + i64::from(face.num_edges);
            if face.ledge_id < 0 {
                reference("edge list", i64::from(face.ledge_id), self.ledges.len())?;
            }
            if end > self.ledges.len() as i64 {
                reference("edge list", end - 1, self.ledges.len())?;
            }
        }
        for model in &self.models {
            if model.face_id < 0 || model.num_faces < 0 {
                return Err(AssetError::InvalidCount {
                    what: "model face range",
                    value: i64::from(model.face_id.min(model.num_faces)),
                });
            }
            let end = i64::from(model.face_id) + i64::from(model.num_faces);
            if end > self.faces.len() as i64 {
                reference("face", end - 1, self.faces.len())?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn header(&self) -> &BspHeader {
        &self.header
    }

    #[must_use]
    pub const fn miptex(&self) -> &MiptexDirectory {
        &self.miptex
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Signed edge references; negative entries walk the edge backwards.
    #[must_use]
    pub fn ledges(&self) -> &[i32] {
        &self.ledges
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[must_use]
    pub fn texinfos(&self) -> &[TexInfo] {
        &self.texinfos
    }

    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Raw bytes of any lump.
    pub fn lump(&self, kind: LumpKind) -> AssetResult<&'a [u8]> {
        lump_bytes(self.data, self.header.lump(kind))
    }

    /// The entities lump as text, up to its terminating NUL.
    pub fn entities(&self) -> AssetResult<String> {
        Ok(self
            .lump(LumpKind::Entities)?
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect())
    }

    /// Pixels of the texture at `index` in the miptex directory.
    pub fn miptex_image(&self, index: usize) -> AssetResult<ImageData<'a>> {
        let entry = self
            .miptex
            .get(index)
            .ok_or(AssetError::MissingTexture { index })?;
        let bytes = self
            .data
            .get(entry.offset..)
            .ok_or(AssetError::MissingTexture { index })?;
        miptex_image_with_limits(&entry.name, bytes, &self.limits)
    }

    /// Expanded geometry of every model, computed on first call.
    pub fn geometry(&self) -> &[ModelGeometry] {
        self.geometry
            .get_or_init(|| self.models.iter().map(|m| self.expand_model(m)).collect())
    }

    /// Face indices of `model` grouped by texture id, in scan order.
    #[must_use]
    pub fn faces_by_texture(&self, model: &Model) -> BTreeMap<u32, Vec<usize>> {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for face_id in model.face_range() {
            let face = &self.faces[face_id];
            let tex_id = self.texinfos[usize::from(face.texinfo_id)].tex_id;
            groups.entry(tex_id).or_default().push(face_id);
        }
        groups
    }

    /// Vertex indices around `face`, following the signed edge list.
    #[must_use]
    pub fn face_vertices(&self, face: &Face) -> Vec<usize> {
        let start = usize::try_from(face.ledge_id).unwrap_or(0);
        let end = start + usize::from(face.num_edges);
        self.ledges[start..end]
            .iter()
            .map(|&ledge| {
                let edge = self.edges[ledge.unsigned_abs() as usize];
                if ledge > 0 {
                    usize::from(edge.v1)
                } else {
                    usize::from(edge.v2)
                }
            })
            .collect()
    }

    fn expand_model(&self, model: &Model) -> ModelGeometry {
        let groups = self
            .faces_by_texture(model)
            .into_iter()
            .map(|(tex_id, face_ids)| self.expand_faces(tex_id, face_ids))
            .collect();
        ModelGeometry { groups }
    }

    fn expand_faces(&self, tex_id: u32, face_ids: Vec<usize>) -> TextureGeometry {
        let (width, height) = self
            .miptex
            .get(tex_id as usize)
            .map_or((1.0, 1.0), |t| (t.width.max(1) as f32, t.height.max(1) as f32));
        let triangles: usize = face_ids.iter().map(|&i| self.faces[i].triangle_count()).sum();
        let mut positions = Vec::with_capacity(triangles * 9);
        let mut uvs = Vec::with_capacity(triangles * 6);

        for &face_id in &face_ids {
            let face = &self.faces[face_id];
            let texinfo = &self.texinfos[usize::from(face.texinfo_id)];
            let loop_ = self.face_vertices(face);
            for i in 0..face.triangle_count() {
                // Reversed fan keeps normals facing out.
                for corner in [loop_[i + 2], loop_[i + 1], loop_[0]] {
                    let point = self.vertices[corner];
                    positions.extend_from_slice(&point.to_array());
                    uvs.extend_from_slice(&texinfo.uv(point, width, height));
                }
            }
        }

        TextureGeometry {
            tex_id,
            face_ids,
            positions,
            uvs,
        }
    }
}

impl PartialEq for Bsp<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
            && self.header == other.header
            && self.miptex == other.miptex
            && self.vertices == other.vertices
            && self.edges == other.edges
            && self.ledges == other.ledges
            && self.faces == other.faces
            && self.texinfos == other.texinfos
            && self.models == other.models
    }
}

impl fmt::Display for Bsp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BSP: version {} ({} models, {} miptex)",
            self.header.version,
            self.models.len(),
            self.miptex.len()
        )
    }
}

fn parse_header(data: &[u8]) -> AssetResult<BspHeader> {
    let raw = decode(header_schema()?, &mut ByteReader::new(data))?;
    let mut lumps = [Lump::default(); 15];
    for kind in LumpKind::ALL {
        let record = raw.record(kind.name())?;
        lumps[kind.index()] = Lump {
            offset: count("lump offset", record.i32("offset")?)?,
            size: count("lump size", record.i32("size")?)?,
        };
    }
    Ok(BspHeader {
        version: raw.i32("version")?,
        lumps,
    })
}

fn lump_bytes(data: &[u8], lump: Lump) -> AssetResult<&[u8]> {
    Ok(ByteReader::at(data, lump.offset)?.read_bytes(lump.size)?)
}

/// Decodes every whole element of a table lump.
fn table<'a>(
    data: &'a [u8],
    header: &BspHeader,
    kind: LumpKind,
    schema: &Schema,
    limits: &AssetLimits,
) -> AssetResult<Vec<Record<'a>>> {
    let bytes = checked_table(data, header, kind, limits)?;
    let count = header.element_count(kind);
    Ok(decode_many(schema, &mut ByteReader::new(bytes), count)?)
}

fn checked_table<'a>(
    data: &'a [u8],
    header: &BspHeader,
    kind: LumpKind,
    limits: &AssetLimits,
) -> AssetResult<&'a [u8]> {
    let lump = header.lump(kind);
    if let Some(size) = kind.element_size() {
        if lump.size % size != 0 {
            tracing::warn!(
                "BSP {} lump size {} is not a multiple of {}",
                kind,
                lump.size,
                size
            );
        }
    }
    check_limit(
        LimitKind::LumpElements,
        limits.max_lump_elements,
        header.element_count(kind),
    )?;
    lump_bytes(data, lump)
}

fn read_miptex_directory(
    data: &[u8],
    header: &BspHeader,
    limits: &AssetLimits,
) -> AssetResult<MiptexDirectory> {
    let lump = header.lump(LumpKind::Miptex);
    let mut directory = MiptexDirectory::default();
    if lump.size == 0 {
        return Ok(directory);
    }

    let mut reader = ByteReader::new(lump_bytes(data, lump)?);
    let num_miptex = count("num_miptex", reader.read_i32()?)?;
    check_limit(LimitKind::LumpElements, limits.max_lump_elements, num_miptex)?;
    reader.seek(0)?;
    let raw = decode(MIPTEX_DIRECTORY.get()?, &mut reader)?;

    for (index, value) in raw.array("offsets")?.iter().enumerate() {
        let relative = value.as_int().unwrap_or(-1);
        let Ok(relative) = usize::try_from(relative) else {
            directory.skip(index, relative, "no texture data".to_string());
            continue;
        };
        match read_miptex_entry(data, lump.offset.saturating_add(relative)) {
            Ok(entry) if entry.name.is_empty() => {
                directory.skip(index, relative as i64, "empty name".to_string());
            }
            Ok(entry) => directory.slots.push(Some(entry)),
            Err(err) => directory.skip(index, relative as i64, err.to_string()),
        }
    }
    Ok(directory)
}

fn read_miptex_entry(data: &[u8], offset: usize) -> AssetResult<MiptexEntry> {
    let raw = decode(miptex_schema()?, &mut ByteReader::at(data, offset)?)?;
    Ok(MiptexEntry {
        name: raw.str("name")?.trim().to_string(),
        offset,
        width: count("miptex width", raw.i32("width")?)?,
        height: count("miptex height", raw.i32("height")?)?,
    })
}

fn read_face(r: &Record<'_>) -> SchemaResult<Face> {
    let light = r.bytes("light")?;
    Ok(Face {
        plane_id: r.u16("plane_id")?,
        side: r.u16("side")?,
        ledge_id: r.i32("ledge_id")?,
        num_edges: r.u16("num_edges")?,
        texinfo_id: r.u16("texinfo_id")?,
        light_type: r.u8("light_type")?,
        light_base: r.u8("light_base")?,
        light: [light[0], light[1]],
        lightmap: r.i32("lightmap")?,
    })
}

fn read_texinfo(r: &Record<'_>) -> SchemaResult<TexInfo> {
    Ok(TexInfo {
        vec_s: Vec3::from_field(r, "vec_s")?,
        dist_s: r.f32("dist_s")?,
        vec_t: Vec3::from_field(r, "vec_t")?,
        dist_t: r.f32("dist_t")?,
        tex_id: r.u32("tex_id")?,
        animated: r.u32("animated")?,
    })
}

fn read_model(r: &Record<'_>) -> SchemaResult<Model> {
    let mut node_ids = [0; 4];
    for (slot, value) in node_ids.iter_mut().zip(r.array("node_ids")?) {
        *slot = value.as_int().map_or(0, |v| v as i32);
    }
    Ok(Model {
        bbox_min: Vec3::from_field(r, "bbox_min")?,
        bbox_max: Vec3::from_field(r, "bbox_max")?,
        origin: Vec3::from_field(r, "origin")?,
        node_ids,
        num_leafs: r.i32("num_leafs")?,
        face_id: r.i32("face_id")?,
        num_faces: r.i32("num_faces")?,
    })
}

fn reference(what: &'static str, index: i64, count: usize) -> AssetResult<()> {
    if index < 0 || index >= count as i64 {
        return Err(AssetError::InvalidReference { what, index, count });
    }
    Ok(())
}
