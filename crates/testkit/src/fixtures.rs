use std::sync::Arc;

use minemesh_core::Identifier;
use minemesh_world::{
    BlockState, CullShape, FlowingFluid, Fluid, FluidBlock, PropertyValue, SimpleBlock,
    StateFlags, Transparency,
};

/// State id of the first water level; level `n` has id `WATER_BASE_ID + n`.
pub const WATER_BASE_ID: u32 = 100;

/// A small fixed palette of block states with stable ids.
#[derive(Debug, Clone)]
pub struct Blocks {
    /// Full opaque cube.
    pub stone: BlockState,
    /// Full opaque cube at the bottom of the world.
    pub bedrock: BlockState,
    /// Full transparent cube.
    pub glass: BlockState,
    /// Full translucent cube.
    pub ice: BlockState,
    /// Opaque lower half block.
    pub slab: BlockState,
    /// Block with a block entity and no culling shape.
    pub chest: BlockState,
    /// Shapeless decoration of minor visual impact.
    pub torch: BlockState,
    /// Block entity that renders text.
    pub sign: BlockState,
    water: Arc<dyn Fluid>,
    water_block: Arc<FluidBlock>,
}

impl Blocks {
    /// Build the palette.
    pub fn new() -> Self {
        let simple = |name: &str| Arc::new(SimpleBlock::new(Identifier::minecraft(name)));
        let water: Arc<dyn Fluid> = Arc::new(FlowingFluid::new(Identifier::minecraft("water")));
        let water_block = Arc::new(FluidBlock::new(
            Identifier::minecraft("water"),
            Arc::clone(&water),
        ));
        Self {
            stone: BlockState::builder(1, simple("stone"))
                .shape(CullShape::full(Transparency::Opaque))
                .build(),
            bedrock: BlockState::builder(2, simple("bedrock"))
                .shape(CullShape::full(Transparency::Opaque))
                .build(),
            glass: BlockState::builder(3, simple("glass"))
                .shape(CullShape::full(Transparency::Transparent))
                .build(),
            ice: BlockState::builder(4, simple("ice"))
                .shape(CullShape::full(Transparency::Translucent))
                .build(),
            slab: BlockState::builder(5, simple("stone_slab"))
                .shape(CullShape::cuboid(
                    [0.0; 3],
                    [1.0, 0.5, 1.0],
                    Transparency::Opaque,
                ))
                .build(),
            chest: BlockState::builder(
                6,
                Arc::new(SimpleBlock::new(Identifier::minecraft("chest")).with_block_entity()),
            )
            .blocks_sky(false)
            .build(),
            torch: BlockState::builder(7, simple("torch"))
                .flags(StateFlags::MINOR_VISUAL_IMPACT)
                .build(),
            sign: BlockState::builder(
                8,
                Arc::new(SimpleBlock::new(Identifier::minecraft("oak_sign")).with_block_entity()),
            )
            .flags(StateFlags::TEXT)
            .build(),
            water,
            water_block,
        }
    }

    /// The water fluid shared by every water state.
    pub fn water_fluid(&self) -> &Arc<dyn Fluid> {
        &self.water
    }

    /// Water source block.
    pub fn water(&self) -> BlockState {
        self.water_level(0)
    }

    /// Water with `level` in `0..=7`, 0 being a source. Water is a cave
    /// surface.
    pub fn water_level(&self, level: i32) -> BlockState {
        let level = level.clamp(0, 7);
        BlockState::builder(WATER_BASE_ID + level as u32, self.water_block.clone())
            .property(FlowingFluid::LEVEL, PropertyValue::Int(level))
            .blocks_sky(false)
            .flags(StateFlags::CAVE_SURFACE)
            .build()
    }
}

impl Default for Blocks {
    fn default() -> Self {
        Self::new()
    }
}
