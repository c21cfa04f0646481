//! Little-endian fixture builders shared by the integration tests.

#![allow(dead_code)]

use bytestream::ByteWriter;

/// A texture slot in the BSP miptex lump.
#[derive(Debug, Clone)]
pub enum MiptexSlot {
    Texture { name: String, width: i32, height: i32 },
    /// Directory offset of -1.
    Missing,
}

impl MiptexSlot {
    pub fn texture(name: &str, width: i32, height: i32) -> Self {
        Self::Texture {
            name: name.to_string(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaceSpec {
    pub ledge_id: i32,
    pub num_edges: u16,
    pub texinfo_id: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct TexinfoSpec {
    pub vec_s: [f32; 3],
    pub dist_s: f32,
    pub vec_t: [f32; 3],
    pub dist_t: f32,
    pub tex_id: u32,
}

impl TexinfoSpec {
    /// Planar XY projection of texture `tex_id`.
    pub fn planar(tex_id: u32) -> Self {
        Self {
            vec_s: [1.0, 0.0, 0.0],
            dist_s: 0.0,
            vec_t: [0.0, 1.0, 0.0],
            dist_t: 0.0,
            tex_id,
        }
    }
}

/// Everything needed to lay out a version 29 BSP.
#[derive(Debug, Clone)]
pub struct BspFixture {
    pub version: i32,
    pub entities: String,
    pub miptex: Vec<MiptexSlot>,
    pub vertices: Vec<[f32; 3]>,
    pub edges: Vec<(u16, u16)>,
    pub ledges: Vec<i32>,
    pub faces: Vec<FaceSpec>,
    pub texinfos: Vec<TexinfoSpec>,
    /// `(face_id, num_faces)` per model.
    pub models: Vec<(i32, i32)>,
}

impl Default for BspFixture {
    fn default() -> Self {
        Self {
            version: 29,
            entities: "{\n\"classname\" \"worldspawn\"\n}\n".to_string(),
            miptex: Vec::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            ledges: Vec::new(),
            faces: Vec::new(),
            texinfos: Vec::new(),
            models: Vec::new(),
        }
    }
}

impl BspFixture {
    /// One convex `n`-gon using texture 0 of size 16x16.
    ///
    /// Edge 0 is unused, as in compiled maps; edge `i` runs from vertex
    /// `i - 1` to vertex `i % n`.
    pub fn polygon(n: u16) -> Self {
        let vertices = (0..n)
            .map(|i| {
                let angle = f32::from(i) * std::f32::consts::TAU / f32::from(n);
                [angle.cos() * 64.0, angle.sin() * 64.0, 0.0]
            })
            .collect();
        let mut edges = vec![(0, 0)];
        edges.extend((1..=n).map(|i| (i - 1, i % n)));
        Self {
            miptex: vec![MiptexSlot::texture("wall", 16, 16)],
            vertices,
            edges,
            ledges: (1..=i32::from(n)).collect(),
            faces: vec![FaceSpec {
                ledge_id: 0,
                num_edges: n,
                texinfo_id: 0,
            }],
            texinfos: vec![TexinfoSpec::planar(0)],
            models: vec![(0, 1)],
            ..Self::default()
        }
    }

    /// A right triangle with integer corners (0,0,0), (16,0,0), (0,16,0).
    pub fn triangle() -> Self {
        Self {
            vertices: vec![[0.0, 0.0, 0.0], [16.0, 0.0, 0.0], [0.0, 16.0, 0.0]],
            edges: vec![(0, 0), (0, 1), (1, 2), (0, 2)],
            ledges: vec![1, 2, -3],
            ..Self::polygon(3)
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_i32(self.version);
        w.write_zeros(15 * 8);

        let lumps: [Vec<u8>; 15] = [
            self.entities_lump(),
            Vec::new(),
            self.miptex_lump(),
            self.vertices_lump(),
            Vec::new(),
            Vec::new(),
            self.texinfo_lump(),
            self.faces_lump(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            self.edges_lump(),
            self.ledges_lump(),
            self.models_lump(),
        ];
        for (i, lump) in lumps.iter().enumerate() {
            let offset = w.position();
            w.write_bytes(lump);
            w.patch_i32_at(4 + i * 8, offset as i32);
            w.patch_i32_at(8 + i * 8, lump.len() as i32);
        }
        w.finish()
    }

    fn entities_lump(&self) -> Vec<u8> {
        let mut bytes = self.entities.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }

    fn miptex_lump(&self) -> Vec<u8> {
        if self.miptex.is_empty() {
            return Vec::new();
        }
        let mut records = ByteWriter::new();
        let mut offsets = Vec::new();
        let base = 4 + 4 * self.miptex.len();
        for (slot, miptex) in self.miptex.iter().enumerate() {
            let MiptexSlot::Texture {
                name,
                width,
                height,
            } = miptex
            else {
                offsets.push(-1);
                continue;
            };
            offsets.push((base + records.position()) as i32);
            let (w, h) = (*width as usize, *height as usize);
            records.write_fixed_string(name, 16);
            records.write_i32(*width);
            records.write_i32(*height);
            let mut level_offset = 40;
            for level in 0..4 {
                records.write_i32(level_offset as i32);
                level_offset += (w >> level) * (h >> level);
            }
            for level in 0..4 {
                records.write_bytes(&vec![slot as u8 + 1; (w >> level) * (h >> level)]);
            }
        }
        let mut w = ByteWriter::new();
        w.write_i32(self.miptex.len() as i32);
        for offset in offsets {
            w.write_i32(offset);
        }
        w.write_bytes(&records.finish());
        w.finish()
    }

    fn vertices_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for v in &self.vertices {
            write_vec3(&mut w, *v);
        }
        w.finish()
    }

    fn texinfo_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for t in &self.texinfos {
            write_vec3(&mut w, t.vec_s);
            w.write_f32(t.dist_s);
            write_vec3(&mut w, t.vec_t);
            w.write_f32(t.dist_t);
            w.write_u32(t.tex_id);
            w.write_u32(0);
        }
        w.finish()
    }

    fn faces_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for f in &self.faces {
            w.write_u16(0);
            w.write_u16(0);
            w.write_i32(f.ledge_id);
            w.write_u16(f.num_edges);
            w.write_u16(f.texinfo_id);
            w.write_u8(0);
            w.write_u8(0);
            w.write_bytes(&[0, 0]);
            w.write_i32(-1);
        }
        w.finish()
    }

    fn edges_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for (v1, v2) in &self.edges {
            w.write_u16(*v1);
            w.write_u16(*v2);
        }
        w.finish()
    }

    fn ledges_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for ledge in &self.ledges {
            w.write_i32(*ledge);
        }
        w.finish()
    }

    fn models_lump(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for (face_id, num_faces) in &self.models {
            write_vec3(&mut w, [-64.0; 3]);
            write_vec3(&mut w, [64.0; 3]);
            write_vec3(&mut w, [0.0; 3]);
            for node in [0, -1, -1, -1] {
                w.write_i32(node);
            }
            w.write_i32(1);
            w.write_i32(*face_id);
            w.write_i32(*num_faces);
        }
        w.finish()
    }
}

fn write_vec3(w: &mut ByteWriter, v: [f32; 3]) {
    for c in v {
        w.write_f32(c);
    }
}

#[derive(Debug, Clone)]
pub enum SkinEntry {
    /// One skin filled with this palette index.
    Single(u8),
    /// `count` skins filled with this palette index.
    Group(usize, u8),
}

#[derive(Debug, Clone)]
pub enum FrameEntry {
    Single(String, Vec<[u8; 3]>),
    Group(Vec<(String, Vec<[u8; 3]>)>),
}

impl FrameEntry {
    pub fn single(name: &str, vertices: &[[u8; 3]]) -> Self {
        Self::Single(name.to_string(), vertices.to_vec())
    }
}

/// Everything needed to lay out an alias model.
#[derive(Debug, Clone)]
pub struct MdlFixture {
    pub version: i32,
    pub scale: [f32; 3],
    pub origin: [f32; 3],
    pub skin_width: i32,
    pub skin_height: i32,
    pub skins: Vec<SkinEntry>,
    /// `(onseam, s, t)`.
    pub skin_vertices: Vec<(bool, i32, i32)>,
    /// `(front_facing, vertex indices)`.
    pub triangles: Vec<(bool, [i32; 3])>,
    pub frames: Vec<FrameEntry>,
}

impl MdlFixture {
    /// A single triangle with two frames: all zeros, then all tens.
    pub fn triangle() -> Self {
        Self {
            version: 6,
            scale: [1.0; 3],
            origin: [0.0; 3],
            skin_width: 8,
            skin_height: 4,
            skins: vec![SkinEntry::Single(3)],
            skin_vertices: vec![(false, 0, 0), (true, 4, 2), (false, 8, 4)],
            triangles: vec![(true, [0, 1, 2])],
            frames: vec![
                FrameEntry::single("stand1", &[[0, 0, 0]; 3]),
                FrameEntry::single("stand2", &[[10, 10, 10]; 3]),
            ],
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_fixed_string("IDPO", 4);
        w.write_i32(self.version);
        write_vec3(&mut w, self.scale);
        write_vec3(&mut w, self.origin);
        w.write_f32(32.0);
        write_vec3(&mut w, [0.0, 0.0, 22.0]);
        w.write_i32(self.skins.len() as i32);
        w.write_i32(self.skin_width);
        w.write_i32(self.skin_height);
        w.write_i32(self.skin_vertices.len() as i32);
        w.write_i32(self.triangles.len() as i32);
        w.write_i32(self.frames.len() as i32);
        w.write_i32(0);
        w.write_i32(0);
        w.write_f32(4.0);

        let skin_size = (self.skin_width * self.skin_height) as usize;
        for skin in &self.skins {
            match skin {
                SkinEntry::Single(fill) => {
                    w.write_i32(0);
                    w.write_bytes(&vec![*fill; skin_size]);
                }
                SkinEntry::Group(count, fill) => {
                    w.write_i32(1);
                    w.write_i32(*count as i32);
                    for i in 0..*count {
                        w.write_f32(0.1 * (i + 1) as f32);
                    }
                    for _ in 0..*count {
                        w.write_bytes(&vec![*fill; skin_size]);
                    }
                }
            }
        }

        for (onseam, s, t) in &self.skin_vertices {
            w.write_i32(i32::from(*onseam));
            w.write_i32(*s);
            w.write_i32(*t);
        }
        for (front_facing, vertices) in &self.triangles {
            w.write_i32(i32::from(*front_facing));
            for v in vertices {
                w.write_i32(*v);
            }
        }

        for frame in &self.frames {
            match frame {
                FrameEntry::Single(name, vertices) => {
                    w.write_i32(0);
                    write_frame(&mut w, name, vertices);
                }
                FrameEntry::Group(frames) => {
                    w.write_i32(1);
                    w.write_i32(frames.len() as i32);
                    w.write_bytes(&[0, 0, 0, 0]);
                    w.write_bytes(&[255, 255, 255, 0]);
                    for i in 0..frames.len() {
                        w.write_f32(0.1 * (i + 1) as f32);
                    }
                    for (name, vertices) in frames {
                        write_frame(&mut w, name, vertices);
                    }
                }
            }
        }
        w.finish()
    }
}

fn write_frame(w: &mut ByteWriter, name: &str, vertices: &[[u8; 3]]) {
    w.write_bytes(&[0, 0, 0, 0]);
    w.write_bytes(&[255, 255, 255, 0]);
    w.write_fixed_string(name, 16);
    for (normal, [x, y, z]) in vertices.iter().enumerate() {
        w.write_bytes(&[*x, *y, *z, normal as u8]);
    }
}

#[derive(Debug, Clone)]
pub enum SpriteEntry {
    /// `(width, height, fill)`.
    Single(i32, i32, u8),
    Group(Vec<(i32, i32, u8)>),
}

pub fn spr(entries: &[SpriteEntry]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("IDSP", 4);
    w.write_i32(1);
    w.write_i32(2);
    w.write_f32(16.0);
    w.write_i32(8);
    w.write_i32(8);
    w.write_i32(entries.len() as i32);
    w.write_f32(0.0);
    w.write_i32(0);
    for entry in entries {
        match entry {
            SpriteEntry::Single(width, height, fill) => {
                w.write_i32(0);
                write_picture(&mut w, *width, *height, *fill);
            }
            SpriteEntry::Group(pictures) => {
                w.write_i32(1);
                w.write_i32(pictures.len() as i32);
                for i in 0..pictures.len() {
                    w.write_f32(0.1 * (i + 1) as f32);
                }
                for (width, height, fill) in pictures {
                    write_picture(&mut w, *width, *height, *fill);
                }
            }
        }
    }
    w.finish()
}

fn write_picture(w: &mut ByteWriter, width: i32, height: i32, fill: u8) {
    w.write_i32(-width / 2);
    w.write_i32(height / 2);
    w.write_i32(width);
    w.write_i32(height);
    w.write_bytes(&vec![fill; (width * height) as usize]);
}

/// A WAD2 file holding `(name, type, data)` lumps.
pub fn wad(lumps: &[(&str, u8, &[u8])]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("WAD2", 4);
    w.write_i32(lumps.len() as i32);
    w.write_i32(0);
    let mut offsets = Vec::new();
    for (_, _, data) in lumps {
        offsets.push(w.position());
        w.write_bytes(data);
    }
    let dir = w.position();
    for ((name, kind, data), offset) in lumps.iter().zip(offsets) {
        w.write_u32(offset as u32);
        w.write_u32(data.len() as u32);
        w.write_u32(data.len() as u32);
        w.write_u8(*kind);
        w.write_u8(0);
        w.write_zeros(2);
        w.write_fixed_string(name, 16);
    }
    w.patch_i32_at(8, dir as i32);
    w.finish()
}

/// A PAK file holding `(path, data)` files.
pub fn pak(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string("PACK", 4);
    w.write_i32(0);
    w.write_i32((files.len() * 64) as i32);
    let mut offsets = Vec::new();
    for (_, data) in files {
        offsets.push(w.position());
        w.write_bytes(data);
    }
    let dir = w.position();
    for ((path, data), offset) in files.iter().zip(offsets) {
        w.write_fixed_string(path, 56);
        w.write_u32(offset as u32);
        w.write_u32(data.len() as u32);
    }
    w.patch_i32_at(4, dir as i32);
    w.finish()
}

/// A standalone mip texture, levels filled with 1, 2, 3 and 4.
pub fn miptex(name: &str, width: usize, height: usize) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_fixed_string(name, 16);
    w.write_i32(width as i32);
    w.write_i32(height as i32);
    let mut offset = 40;
    for level in 0..4 {
        w.write_i32(offset as i32);
        offset += (width >> level) * (height >> level);
    }
    for level in 0..4u8 {
        let size = (width >> level) * (height >> level);
        w.write_bytes(&vec![level + 1; size]);
    }
    w.finish()
}
