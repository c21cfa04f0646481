//! Inspection and extraction tools for Quake asset files.
//!
//! This crate backs the `qwt-tools` binary:
//!
//! - Resolve nested paths such as `id1/pak0.pak|gfx.wad|CONCHARS`
//! - Summarize, list and dump any supported file as text or JSON
//! - Expand images to PNG and geometry to Wavefront OBJ
//!
//! # Design Principles
//!
//! - **One dispatch point** - The format is resolved once into a [`FileKind`].
//! - **Borrow, don't copy** - Nested entries are views into the outer file buffer.
//! - **Human-readable output** - Reports are plain text by default and JSON on request.

use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use archive::{DirectoryEntry, Pak, Wad, WadEntry, WadEntryKind};
use assets::{
    expand, image_from_lump, image_from_wad_entry, Bsp, ImageData, Lmp, Mdl, Palette, Spr,
};
use bytestream::ByteReader;
use glob::Pattern;
use schema::Schema;
use serde::Serialize;

/// Separates nested components in a path.
pub const PATH_SEPARATOR: char = '|';

/// Names accepted by [`named_schema`].
pub const SCHEMA_NAMES: &[&str] = &[
    "pak-header",
    "pak-entry",
    "wad-header",
    "wad-entry",
    "bsp-header",
    "bsp-face",
    "bsp-texinfo",
    "bsp-model",
    "mdl-header",
    "mdl-frame",
    "spr-header",
    "spr-picture",
    "spr-group",
    "miptex",
    "picture",
];

/// File format, resolved from the last path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pak,
    Wad,
    Bsp,
    Mdl,
    Spr,
    Pal,
    /// Untyped lump, including every WAD entry.
    Lmp,
    /// Anything else; only raw extraction applies.
    Other,
}

impl FileKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let file = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
        let Some((_, extension)) = file.rsplit_once('.') else {
            return Self::Other;
        };
        match extension.to_ascii_lowercase().as_str() {
            "pak" => Self::Pak,
            "wad" => Self::Wad,
            "bsp" => Self::Bsp,
            "mdl" => Self::Mdl,
            "spr" => Self::Spr,
            "pal" => Self::Pal,
            "lmp" => Self::Lmp,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Pak | Self::Wad)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pak => "pak",
            Self::Wad => "wad",
            Self::Bsp => "bsp",
            Self::Mdl => "mdl",
            Self::Spr => "spr",
            Self::Pal => "pal",
            Self::Lmp => "lmp",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits `outer.pak|inner.wad|LUMP` into the file path and the nested names.
#[must_use]
pub fn split_path(path: &str) -> (&str, Vec<&str>) {
    let mut parts = path.split(PATH_SEPARATOR);
    let file = parts.next().unwrap_or_default();
    (file, parts.filter(|part| !part.is_empty()).collect())
}

/// A file or nested entry, borrowed from the outermost buffer.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub name: String,
    pub kind: FileKind,
    pub bytes: &'a [u8],
    /// Directory record when the content is a WAD lump.
    pub wad_entry: Option<WadEntry>,
}

impl<'a> Resolved<'a> {
    #[must_use]
    pub fn new(name: &str, bytes: &'a [u8]) -> Self {
        Self {
            name: name.to_string(),
            kind: FileKind::from_name(name),
            bytes,
            wad_entry: None,
        }
    }

    /// Opens the entry `name` of a PAK or WAD. The first match wins.
    pub fn open(&self, name: &str) -> Result<Self> {
        match self.kind {
            FileKind::Pak => {
                let pak =
                    Pak::parse(self.bytes).with_context(|| format!("parse {}", self.name))?;
                let entry = pak
                    .find_entry_by_path(name)
                    .ok_or_else(|| anyhow!("no entry '{name}' in {}", self.name))?;
                let bytes = pak
                    .entry_data(entry)
                    .with_context(|| format!("read {}", entry.path))?;
                Ok(Self::new(&entry.path, bytes))
            }
            FileKind::Wad => {
                let wad =
                    Wad::parse(self.bytes).with_context(|| format!("parse {}", self.name))?;
                let entry = wad
                    .find_entry_by_name(name)
                    .ok_or_else(|| anyhow!("no lump '{name}' in {}", self.name))?;
                let bytes = wad
                    .entry_data(entry)
                    .with_context(|| format!("read {}", entry.name))?;
                Ok(Self {
                    name: entry.name.clone(),
                    kind: FileKind::Lmp,
                    bytes,
                    wad_entry: Some(entry.clone()),
                })
            }
            other => bail!("{} is a {other} file, not a container", self.name),
        }
    }

    /// WAD type tag of this entry, if it came from a WAD.
    #[must_use]
    pub fn wad_kind(&self) -> Option<WadEntryKind> {
        self.wad_entry.as_ref().map(|entry| entry.kind)
    }
}

/// Follows `inner` names from the file `name` holding `data`.
pub fn resolve<'a>(name: &str, data: &'a [u8], inner: &[&str]) -> Result<Resolved<'a>> {
    let mut current = Resolved::new(name, data);
    for part in inner {
        current = current.open(part)?;
    }
    tracing::debug!(
        "resolved {} as {} ({} bytes)",
        current.name,
        current.kind,
        current.bytes.len()
    );
    Ok(current)
}

/// One-line summary of a file.
pub fn summary(file: &Resolved<'_>) -> Result<String> {
    let line = match file.kind {
        FileKind::Pak => Pak::parse(file.bytes)?.to_string(),
        FileKind::Wad => Wad::parse(file.bytes)?.to_string(),
        FileKind::Bsp => Bsp::parse(file.bytes)?.to_string(),
        FileKind::Mdl => Mdl::parse(file.bytes)?.to_string(),
        FileKind::Spr => Spr::parse(file.bytes)?.to_string(),
        FileKind::Pal => Palette::parse(file.bytes)?.to_string(),
        FileKind::Lmp => Lmp::new(file.name.as_str(), file.bytes).to_string(),
        FileKind::Other => format!("{}: {} bytes", file.name, file.bytes.len()),
    };
    Ok(line)
}

/// One line per entry, optionally filtered by name.
///
/// PAK and WAD list their directories, BSP its textures, MDL its frames,
/// SPR its pictures and PAL its colors.
pub fn listing(file: &Resolved<'_>, verbose: bool, pattern: Option<&Pattern>) -> Result<String> {
    let keep = |name: &str| pattern.map_or(true, |p| p.matches(name));
    let mut out = String::new();
    match file.kind {
        FileKind::Pak => {
            let pak = Pak::parse(file.bytes)?;
            let listing = pak.listing(verbose);
            for (line, entry) in listing.lines().zip(pak.entries()) {
                if keep(entry.name()) {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        FileKind::Wad => {
            let wad = Wad::parse(file.bytes)?;
            let listing = wad.listing(verbose);
            for (line, entry) in listing.lines().zip(wad.entries()) {
                if keep(entry.name()) {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        FileKind::Bsp => {
            let bsp = Bsp::parse(file.bytes)?;
            for (i, entry) in bsp.miptex().iter().filter(|(_, e)| keep(&e.name)) {
                out.push_str(&format!("{i}: {}", entry.name));
                if verbose {
                    out.push_str(&format!(
                        " ({}x{}, offset={})",
                        entry.width, entry.height, entry.offset
                    ));
                }
                out.push('\n');
            }
            for skipped in bsp.miptex().skipped() {
                out.push_str(&format!("{}: <skipped: {}>\n", skipped.index, skipped.reason));
            }
        }
        FileKind::Mdl => {
            let mdl = Mdl::parse(file.bytes)?;
            for (i, frame) in mdl.frames().iter().enumerate() {
                if keep(&frame.name) {
                    out.push_str(&format!("{i}: {}\n", frame.name));
                }
            }
            if verbose {
                for animation in mdl.animations() {
                    out.push_str(&format!(
                        "animation {}: frames {}..{}\n",
                        animation.name,
                        animation.start,
                        animation.start + animation.count
                    ));
                }
            }
        }
        FileKind::Spr => {
            let spr = Spr::parse(file.bytes)?;
            for (i, frame) in spr.frames().iter().enumerate() {
                if keep(&format!("frame_{i}")) {
                    out.push_str(&format!("{i}: {}x{}", frame.width, frame.height));
                    if verbose {
                        out.push_str(&format!(" at ({}, {})", frame.offset_x, frame.offset_y));
                    }
                    out.push('\n');
                }
            }
        }
        FileKind::Pal => out = Palette::parse(file.bytes)?.listing(),
        FileKind::Lmp | FileKind::Other => bail!("{} has no entries to list", file.name),
    }
    Ok(out)
}

/// JSON report written by `dump`.
#[derive(Debug, Serialize)]
pub struct DumpReport {
    pub name: String,
    pub kind: FileKind,
    pub size: usize,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl EntryReport {
    fn named(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            offset: None,
            size: None,
            detail: None,
        }
    }
}

/// Decodes the header with its schema and collects per-entry details.
pub fn dump(file: &Resolved<'_>) -> Result<DumpReport> {
    let header = match header_schema_for(file)? {
        Some(layout) => {
            let record = schema::decode(layout, &mut ByteReader::new(file.bytes))
                .with_context(|| format!("decode {} header", file.kind))?;
            Some(serde_json::to_value(&record).context("serialize header")?)
        }
        None => None,
    };

    let mut entries = Vec::new();
    match file.kind {
        FileKind::Pak => {
            for (i, entry) in Pak::parse(file.bytes)?.entries().iter().enumerate() {
                entries.push(EntryReport {
                    offset: Some(u64::from(entry.offset)),
                    size: Some(u64::from(entry.size)),
                    ..EntryReport::named(i, entry.path.as_str())
                });
            }
        }
        FileKind::Wad => {
            for (i, entry) in Wad::parse(file.bytes)?.entries().iter().enumerate() {
                entries.push(EntryReport {
                    offset: Some(u64::from(entry.offset)),
                    size: Some(u64::from(entry.size)),
                    detail: Some(format!(
                        "type={} compression={}",
                        entry.kind.as_char(),
                        entry.compression
                    )),
                    ..EntryReport::named(i, entry.name.as_str())
                });
            }
        }
        FileKind::Bsp => {
            for (i, entry) in Bsp::parse(file.bytes)?.miptex().iter() {
                entries.push(EntryReport {
                    offset: Some(entry.offset as u64),
                    detail: Some(format!("{}x{}", entry.width, entry.height)),
                    ..EntryReport::named(i, entry.name.as_str())
                });
            }
        }
        FileKind::Mdl => {
            for (i, frame) in Mdl::parse(file.bytes)?.frames().iter().enumerate() {
                entries.push(EntryReport::named(i, frame.name.as_str()));
            }
        }
        FileKind::Spr => {
            for (i, frame) in Spr::parse(file.bytes)?.frames().iter().enumerate() {
                entries.push(EntryReport {
                    size: Some(frame.pixels.len() as u64),
                    detail: Some(format!("{}x{}", frame.width, frame.height)),
                    ..EntryReport::named(i, format!("frame_{i}"))
                });
            }
        }
        FileKind::Pal | FileKind::Lmp | FileKind::Other => {}
    }

    Ok(DumpReport {
        name: file.name.clone(),
        kind: file.kind,
        size: file.bytes.len(),
        summary: summary(file)?,
        header,
        entries,
    })
}

fn header_schema_for(file: &Resolved<'_>) -> Result<Option<&'static Schema>> {
    let layout = match file.kind {
        FileKind::Pak => archive::pak::header_schema()?,
        FileKind::Wad => archive::wad::header_schema()?,
        FileKind::Bsp => assets::bsp::header_schema()?,
        FileKind::Mdl => assets::mdl::header_schema()?,
        FileKind::Spr => assets::spr::header_schema()?,
        FileKind::Lmp => match file.wad_kind() {
            Some(WadEntryKind::MipTex) => assets::image::miptex_schema()?,
            Some(WadEntryKind::Status | WadEntryKind::Console) => {
                assets::image::simple_schema()?
            }
            _ => return Ok(None),
        },
        FileKind::Pal | FileKind::Other => return Ok(None),
    };
    Ok(Some(layout))
}

/// Looks up one of the built-in layouts by its [`SCHEMA_NAMES`] entry.
pub fn named_schema(name: &str) -> Result<&'static Schema> {
    let layout = match name {
        "pak-header" => archive::pak::header_schema(),
        "pak-entry" => archive::pak::entry_schema(),
        "wad-header" => archive::wad::header_schema(),
        "wad-entry" => archive::wad::entry_schema(),
        "bsp-header" => assets::bsp::header_schema(),
        "bsp-face" => assets::bsp::face_schema(),
        "bsp-texinfo" => assets::bsp::texinfo_schema(),
        "bsp-model" => assets::bsp::model_schema(),
        "mdl-header" => assets::mdl::header_schema(),
        "mdl-frame" => assets::mdl::frame_schema(),
        "spr-header" => assets::spr::header_schema(),
        "spr-picture" => assets::spr::picture_schema(),
        "spr-group" => assets::spr::group_schema(),
        "miptex" => assets::image::miptex_schema(),
        "picture" => assets::image::simple_schema(),
        _ => bail!(
            "unknown schema '{name}', expected one of: {}",
            SCHEMA_NAMES.join(", ")
        ),
    };
    Ok(layout?)
}

/// JSON report written by `schema`.
#[derive(Debug, Serialize)]
pub struct SchemaReport<'s> {
    pub name: &'s str,
    /// `schema_hash` as sixteen hex digits.
    pub fingerprint: String,
    pub fixed_size: Option<usize>,
    pub schema: &'s Schema,
}

pub fn schema_report(name: &str) -> Result<SchemaReport<'_>> {
    let layout = named_schema(name)?;
    Ok(SchemaReport {
        name,
        fingerprint: format!("0x{:016x}", schema::schema_hash(layout)),
        fixed_size: layout.fixed_size(),
        schema: layout,
    })
}

/// Picks the image held by a file; `index` selects a texture, skin or frame.
pub fn load_image<'a>(file: &Resolved<'a>, index: usize) -> Result<ImageData<'a>> {
    let image = match file.kind {
        FileKind::Bsp => Bsp::parse(file.bytes)?.miptex_image(index)?,
        FileKind::Mdl => Mdl::parse(file.bytes)?.skin_image(index)?,
        FileKind::Spr => Spr::parse(file.bytes)?.frame_image(index)?,
        FileKind::Lmp | FileKind::Pal => match &file.wad_entry {
            Some(entry) => image_from_wad_entry(entry, file.bytes)?,
            None => image_from_lump(&file.name, file.bytes, None)?,
        },
        other => bail!("{} is a {other} file and holds no image", file.name),
    };
    Ok(image)
}

/// Expands `image` with `palette` and writes it as PNG.
pub fn write_png(
    image: &ImageData<'_>,
    palette: &Palette,
    mip_level: Option<u8>,
    path: &Path,
) -> Result<()> {
    let (width, height) = image.dimensions(mip_level);
    let rgba = expand(image, palette, mip_level);
    let buffer = image::RgbaImage::from_raw(
        u32::try_from(width).context("image width")?,
        u32::try_from(height).context("image height")?,
        rgba,
    )
    .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!("wrote {} ({width}x{height})", path.display());
    Ok(())
}

/// Writes expanded geometry as Wavefront OBJ.
///
/// BSP files emit one object per model and one material per texture. MDL
/// files emit the pose at fractional `frame`.
pub fn write_obj<W: Write>(file: &Resolved<'_>, frame: f32, out: &mut W) -> Result<()> {
    match file.kind {
        FileKind::Bsp => {
            let bsp = Bsp::parse(file.bytes)?;
            let mut next = 1;
            for (i, model) in bsp.geometry().iter().enumerate() {
                writeln!(out, "o model_{i}")?;
                for group in &model.groups {
                    match bsp.miptex().get(group.tex_id as usize) {
                        Some(entry) => writeln!(out, "usemtl {}", entry.name)?,
                        None => writeln!(out, "usemtl tex_{}", group.tex_id)?,
                    }
                    next = write_triangles(out, &group.positions, &group.uvs, next)?;
                }
            }
        }
        FileKind::Mdl => {
            let mdl = Mdl::parse(file.bytes)?;
            if mdl.frames().is_empty() {
                bail!("{} has no frames", file.name);
            }
            writeln!(out, "o {}", file.name)?;
            write_triangles(out, &mdl.blend_frames(frame), mdl.uvs(), 1)?;
        }
        other => bail!("{} is a {other} file and holds no geometry", file.name),
    }
    Ok(())
}

/// Writes unindexed triangles starting at OBJ vertex `first`; returns the next index.
fn write_triangles<W: Write>(
    out: &mut W,
    positions: &[f32],
    uvs: &[f32],
    first: usize,
) -> Result<usize> {
    for p in positions.chunks_exact(3) {
        writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for uv in uvs.chunks_exact(2) {
        writeln!(out, "vt {} {}", uv[0], uv[1])?;
    }
    let triangles = positions.len() / 9;
    for t in 0..triangles {
        let a = first + t * 3;
        let (b, c) = (a + 1, a + 2);
        writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }
    Ok(first + triangles * 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::ByteWriter;

    fn wad(lumps: &[(&str, u8, &[u8])]) -> Vec<u8> {
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

    fn pak(files: &[(&str, &[u8])]) -> Vec<u8> {
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

    fn picture(width: i32, height: i32, pixels: &[u8]) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_i32(width);
        w.write_i32(height);
        w.write_bytes(pixels);
        w.finish()
    }

    fn sample_pak() -> Vec<u8> {
        let face = picture(2, 1, &[7, 255]);
        let gfx = wad(&[("FACE", b'B', &face), ("BACKTILE", b'B', &face)]);
        let palette: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i]).collect();
        pak(&[
            ("gfx.wad", &gfx),
            ("gfx/palette.lmp", &palette),
            ("sound/items/r_item1.wav", b"RIFF"),
        ])
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(FileKind::from_name("id1/pak0.PAK"), FileKind::Pak);
        assert_eq!(FileKind::from_name("maps/e1m1.bsp"), FileKind::Bsp);
        assert_eq!(FileKind::from_name("progs/player.mdl"), FileKind::Mdl);
        assert_eq!(FileKind::from_name("gfx/palette.lmp"), FileKind::Lmp);
        assert_eq!(FileKind::from_name("sound/r_item1.wav"), FileKind::Other);
        assert_eq!(FileKind::from_name("CONCHARS"), FileKind::Other);
        assert!(FileKind::Wad.is_container());
        assert!(!FileKind::Spr.is_container());
    }

    #[test]
    fn split_nested_path() {
        assert_eq!(
            split_path("id1/pak0.pak|gfx.wad|CONCHARS"),
            ("id1/pak0.pak", vec!["gfx.wad", "CONCHARS"])
        );
        assert_eq!(split_path("maps/start.bsp"), ("maps/start.bsp", vec![]));
        assert_eq!(split_path("a.pak||b.lmp"), ("a.pak", vec!["b.lmp"]));
    }

    #[test]
    fn resolves_through_pak_and_wad() {
        let data = sample_pak();
        let file = resolve("pak0.pak", &data, &["gfx.wad", "FACE"]).unwrap();
        assert_eq!(file.name, "FACE");
        assert_eq!(file.kind, FileKind::Lmp);
        assert_eq!(file.wad_kind(), Some(WadEntryKind::Status));
        assert_eq!(file.bytes, picture(2, 1, &[7, 255]).as_slice());
    }

    #[test]
    fn missing_entry_and_non_container_fail() {
        let data = sample_pak();
        let err = resolve("pak0.pak", &data, &["gfx/missing.lmp"]).unwrap_err();
        assert!(err.to_string().contains("no entry 'gfx/missing.lmp'"));
        let err = resolve("pak0.pak", &data, &["gfx/palette.lmp", "x"]).unwrap_err();
        assert!(err.to_string().contains("not a container"));
    }

    #[test]
    fn summaries() {
        let data = sample_pak();
        let root = Resolved::new("pak0.pak", &data);
        assert_eq!(summary(&root).unwrap(), "PAK: PACK (3 entries)");
        let sound = root.open("sound/items/r_item1.wav").unwrap();
        assert_eq!(
            summary(&sound).unwrap(),
            "sound/items/r_item1.wav: 4 bytes"
        );
    }

    #[test]
    fn listing_filters_by_glob() {
        let data = sample_pak();
        let root = Resolved::new("pak0.pak", &data);
        let pattern = Pattern::new("gfx*").unwrap();
        let listing = listing(&root, false, Some(&pattern)).unwrap();
        assert_eq!(listing, "0: gfx.wad\n1: gfx/palette.lmp\n");

        let gfx = root.open("gfx.wad").unwrap();
        let verbose = super::listing(&gfx, true, None).unwrap();
        assert_eq!(verbose.lines().count(), 2);
        assert!(verbose.contains("type=B"));
    }

    #[test]
    fn lump_has_nothing_to_list() {
        let data = sample_pak();
        let file = resolve("pak0.pak", &data, &["gfx.wad", "FACE"]).unwrap();
        assert!(listing(&file, false, None).is_err());
    }

    #[test]
    fn dump_includes_header_and_entries() {
        let data = sample_pak();
        let root = Resolved::new("pak0.pak", &data);
        let report = dump(&root).unwrap();
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[1].name, "gfx/palette.lmp");
        assert_eq!(report.entries[1].size, Some(768));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "pak");
        assert_eq!(json["header"]["magic"], "PACK");
        assert_eq!(json["header"]["dir_size"], 192);
    }

    #[test]
    fn dump_of_status_lump_uses_picture_header() {
        let data = sample_pak();
        let file = resolve("pak0.pak", &data, &["gfx.wad", "FACE"]).unwrap();
        let json = serde_json::to_value(dump(&file).unwrap()).unwrap();
        assert_eq!(json["header"]["width"], 2);
        assert!(json.get("entries").is_none());
    }

    #[test]
    fn schema_reports_are_stable() {
        for name in SCHEMA_NAMES {
            let a = schema_report(name).unwrap();
            let b = schema_report(name).unwrap();
            assert_eq!(a.fingerprint, b.fingerprint);
        }
        assert_eq!(schema_report("pak-entry").unwrap().fixed_size, Some(64));
        assert_eq!(schema_report("wad-entry").unwrap().fixed_size, Some(32));
        assert!(named_schema("nope").is_err());
    }

    #[test]
    fn png_of_status_picture() {
        let data = sample_pak();
        let file = resolve("pak0.pak", &data, &["gfx.wad", "FACE"]).unwrap();
        let image = load_image(&file, 0).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        write_png(&image, &Palette::greyscale(), None, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [7, 7, 7, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn palette_lump_previews_as_rgb() {
        let data = sample_pak();
        let file = resolve("pak0.pak", &data, &["gfx/palette.lmp"]).unwrap();
        let image = load_image(&file, 0).unwrap();
        assert_eq!((image.width(), image.height()), (16, 16));
        let palette = Palette::parse(file.bytes).unwrap();
        assert_eq!(palette.color(3), [3, 3, 3]);
    }

    #[test]
    fn obj_triangles_are_one_based() {
        let positions = [0.0, 16.0, 0.0, 16.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let uvs = [0.0, -1.0, 1.0, 0.0, 0.0, 0.0];
        let mut out = Vec::new();
        let next = write_triangles(&mut out, &positions, &uvs, 4).unwrap();
        assert_eq!(next, 7);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "v 0 16 0");
        assert_eq!(lines[3], "vt 0 -1");
        assert_eq!(lines[6], "f 4/4 5/5 6/6");
    }

    #[test]
    fn geometry_requires_bsp_or_mdl() {
        let data = sample_pak();
        let root = Resolved::new("pak0.pak", &data);
        let mut out = Vec::new();
        assert!(write_obj(&root, 0.0, &mut out).is_err());
    }
}
