//! Limits for content decoding.

/// Content-specific limits enforced while decoding BSP, MDL and SPR files.
///
/// Every count read from a header is checked against these before any
/// allocation sized by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLimits {
    /// Maximum number of elements in one BSP lump.
    pub max_lump_elements: usize,
    /// Maximum number of MDL skins, counting every skin inside a group.
    pub max_skins: usize,
    /// Maximum number of MDL frames after flattening groups.
    pub max_frames: usize,
    /// Maximum number of MDL vertices.
    pub max_vertices: usize,
    /// Maximum number of MDL triangles.
    pub max_triangles: usize,
    /// Maximum width times height of a single image.
    pub max_image_pixels: usize,
    /// Maximum number of SPR pictures after flattening groups.
    pub max_sprite_frames: usize,
}

impl Default for AssetLimits {
    fn default() -> Self {
        Self {
            max_lump_elements: 1 << 20,
            max_skins: 256,
            max_frames: 4096,
            max_vertices: 1 << 16,
            max_triangles: 1 << 17,
            max_image_pixels: 4096 * 4096,
            max_sprite_frames: 4096,
        }
    }
}

impl AssetLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_lump_elements: 1024,
            max_skins: 8,
            max_frames: 64,
            max_vertices: 256,
            max_triangles: 512,
            max_image_pixels: 64 * 64,
            max_sprite_frames: 32,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_lump_elements: usize::MAX,
            max_skins: usize::MAX,
            max_frames: usize::MAX,
            max_vertices: usize::MAX,
            max_triangles: usize::MAX,
            max_image_pixels: usize::MAX,
            max_sprite_frames: usize::MAX,
        }
    }
}
