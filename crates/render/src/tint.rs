use std::collections::HashMap;

use minemesh_core::{BlockPosition, Identifier};
use minemesh_world::{BlockState, Fluid};

/// Untinted RGB.
pub const WHITE: u32 = 0x00FF_FFFF;

/// Colour multipliers for tinted faces, as `0xRRGGBB`.
pub trait TintProvider: Send + Sync {
    /// Tint of a block face with `tint_index`.
    fn block_tint(&self, state: &BlockState, position: BlockPosition, tint_index: u8) -> u32;

    /// Tint of a fluid surface.
    fn fluid_tint(&self, fluid: &dyn Fluid, state: &BlockState, position: BlockPosition) -> u32;
}

/// Everything is white.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTint;

impl TintProvider for NoTint {
    fn block_tint(&self, _: &BlockState, _: BlockPosition, _: u8) -> u32 {
        WHITE
    }

    fn fluid_tint(&self, _: &dyn Fluid, _: &BlockState, _: BlockPosition) -> u32 {
        WHITE
    }
}

/// Fixed tints per block and fluid, ignoring position and tint index.
#[derive(Debug, Clone, Default)]
pub struct StaticTints {
    blocks: HashMap<Identifier, u32>,
    fluids: HashMap<Identifier, u32>,
}

impl StaticTints {
    /// No tint registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tint faces of `block`.
    pub fn with_block(mut self, block: Identifier, tint: u32) -> Self {
        self.blocks.insert(block, tint & WHITE);
        self
    }

    /// Tint surfaces of `fluid`.
    pub fn with_fluid(mut self, fluid: Identifier, tint: u32) -> Self {
        self.fluids.insert(fluid, tint & WHITE);
        self
    }
}

impl TintProvider for StaticTints {
    fn block_tint(&self, state: &BlockState, _: BlockPosition, _: u8) -> u32 {
        self.blocks
            .get(state.block().identifier())
            .copied()
            .unwrap_or(WHITE)
    }

    fn fluid_tint(&self, fluid: &dyn Fluid, _: &BlockState, _: BlockPosition) -> u32 {
        self.fluids.get(fluid.identifier()).copied().unwrap_or(WHITE)
    }
}
