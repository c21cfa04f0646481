//! Content decoders for Quake assets.
//!
//! This crate turns the bytes of a single asset into typed, renderer-ready
//! data:
//! - BSP levels with per-texture triangle lists
//! - MDL alias models with UVs, per-frame positions and frame blending
//! - SPR sprites, PAL palettes and untyped LMP lumps
//! - Indexed and RGB images expanded to RGBA
//!
//! Every decoder borrows the file buffer; pixel data is never copied until
//! it is expanded.
//!
//! # Design Principles
//!
//! - **Validate once** - Indices are checked while parsing, so expansion is infallible.
//! - **Lazy and deterministic** - Expanded geometry is computed on first access and cached.
//! - **Explicit palettes** - Expansion always takes the palette as an argument.
//! - **Bounded decoding** - Header counts are checked against [`AssetLimits`] before allocation.
//!
//! # Example
//!
//! ```
//! use assets::{expand, ImageData, Palette, PixelFormat};
//!
//! let palette = Palette::greyscale();
//! let pixels = [7, 255];
//! let image = ImageData::new("face", 2, 1, PixelFormat::Indexed, &pixels).unwrap();
//! let rgba = expand(&image, &palette, None);
//! assert_eq!(rgba, vec![7, 7, 7, 255, 0, 0, 0, 0]);
//! ```

pub mod bsp;
mod error;
pub mod image;
mod limits;
pub mod lmp;
pub mod mdl;
pub mod pal;
pub mod spr;
mod types;

pub use bsp::{Bsp, LumpKind, MiptexDirectory, ModelGeometry, TextureGeometry};
pub use error::{AssetError, AssetResult, LimitKind};
pub use image::{expand, image_from_lump, image_from_wad_entry, ImageData, PixelFormat};
pub use limits::AssetLimits;
pub use lmp::Lmp;
pub use mdl::{interpolate, split_frame_name, Mdl};
pub use pal::{Palette, FULLBRIGHT_INDEX};
pub use spr::{SpriteKind, Spr};
pub use types::Vec3;
