//! 256-colour palettes.

use std::fmt;

use crate::error::{AssetError, AssetResult};

/// Byte length of a palette file.
pub const PALETTE_SIZE: usize = 768;

/// Colours at this index and above are drawn unlit by the engine.
pub const FULLBRIGHT_INDEX: u8 = 240;

/// 256 RGB triples, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; 256],
}

impl Palette {
    /// Reads a palette; anything other than exactly 768 bytes is rejected.
    pub fn parse(data: &[u8]) -> AssetResult<Self> {
        if data.len() != PALETTE_SIZE {
            return Err(AssetError::SizeMismatch {
                expected: PALETTE_SIZE,
                actual: data.len(),
            });
        }
        let mut colors = [[0u8; 3]; 256];
        for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
            color.copy_from_slice(rgb);
        }
        Ok(Self { colors })
    }

    /// A grey ramp, handy when no palette file is around.
    #[must_use]
    pub fn greyscale() -> Self {
        let mut colors = [[0u8; 3]; 256];
        for (i, color) in colors.iter_mut().enumerate() {
            *color = [i as u8; 3];
        }
        Self { colors }
    }

    #[must_use]
    pub const fn color(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    #[must_use]
    pub const fn colors(&self) -> &[[u8; 3]; 256] {
        &self.colors
    }

    #[must_use]
    pub const fn is_fullbright(index: u8) -> bool {
        index >= FULLBRIGHT_INDEX
    }

    /// One `index: (r, g, b)` line per colour.
    #[must_use]
    pub fn listing(&self) -> String {
        let mut out = String::with_capacity(256 * 20);
        for (i, [r, g, b]) in self.colors.iter().enumerate() {
            out.push_str(&format!("{i}: ({r}, {g}, {b})\n"));
        }
        out
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fullbright = 256 - usize::from(FULLBRIGHT_INDEX);
        write!(f, "PAL: 256 colors ({fullbright} fullbright)")
    }
}
