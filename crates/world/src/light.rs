use serde::{Deserialize, Serialize};

use crate::Heightmap;

/// Mask selecting the sky-light nibble of a packed light byte.
pub const SKY_LIGHT_MASK: u8 = 0xF0;
/// Mask selecting the block-light nibble of a packed light byte.
pub const BLOCK_LIGHT_MASK: u8 = 0x0F;
/// Brightest light level.
pub const MAX_LIGHT: u8 = 15;

const COLUMNS: usize = 256;

/// Packed light byte: block light in the low nibble, sky light in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LightLevel(pub u8);

impl LightLevel {
    /// Pack two levels (each clamped to 0..=15).
    pub const fn new(block: u8, sky: u8) -> Self {
        let block = if block > MAX_LIGHT { MAX_LIGHT } else { block };
        let sky = if sky > MAX_LIGHT { MAX_LIGHT } else { sky };
        Self((sky << 4) | block)
    }

    /// Block light level.
    #[inline]
    pub const fn block(self) -> u8 {
        self.0 & BLOCK_LIGHT_MASK
    }

    /// Sky light level.
    #[inline]
    pub const fn sky(self) -> u8 {
        (self.0 & SKY_LIGHT_MASK) >> 4
    }

    /// Same block light, sky forced to maximum.
    #[inline]
    pub const fn with_full_sky(self) -> Self {
        Self(self.0 | SKY_LIGHT_MASK)
    }

    /// Raw byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Per-chunk light data that lives outside of sections.
#[derive(Debug, Clone)]
pub struct ChunkLight {
    /// Sky-blocking heightmap, one entry per column.
    pub heightmap: Heightmap,
    /// Light layer directly above the highest section.
    pub top: Box<[u8; COLUMNS]>,
    /// Light layer directly below the lowest section.
    pub bottom: Box<[u8; COLUMNS]>,
}

impl ChunkLight {
    /// Light for a chunk whose lowest block is at `min_y`: open sky above, darkness below.
    pub fn new(min_y: i32) -> Self {
        Self {
            heightmap: Heightmap::new(min_y),
            top: Box::new([SKY_LIGHT_MASK; COLUMNS]),
            bottom: Box::new([0; COLUMNS]),
        }
    }
}
