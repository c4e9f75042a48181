//! Fluids and the blocks that contain them.

use std::fmt;
use std::sync::Arc;

use minemesh_core::{Direction, Identifier};

use crate::block::{Block, BlockState};

/// Height of a source or otherwise full fluid block.
pub const MAX_FLUID_HEIGHT: f32 = 8.0 / 9.0;

/// A fluid type.
pub trait Fluid: Send + Sync + fmt::Debug {
    /// Registry name of the fluid.
    fn identifier(&self) -> &Identifier;

    /// Surface height of `state` in `[0, 1]`.
    fn height(&self, state: &BlockState) -> f32;

    /// True if `state` contains this fluid.
    fn matches(&self, state: Option<&BlockState>) -> bool {
        state
            .and_then(BlockState::fluid)
            .is_some_and(|fluid| fluid.identifier() == self.identifier())
    }

    /// Horizontal flow direction `[x, z]` of `state`, normalized or zero.
    ///
    /// `neighbours` are the blocks to the north, south, west and east.
    fn velocity(&self, state: &BlockState, neighbours: [Option<&BlockState>; 4]) -> [f64; 2] {
        let height = self.height(state) as f64;
        let mut velocity = [0.0f64; 2];
        for (direction, neighbour) in Direction::SIDES.into_iter().zip(neighbours) {
            let difference = match neighbour {
                Some(neighbour) if self.matches(Some(neighbour)) => {
                    height - self.height(neighbour) as f64
                }
                Some(neighbour) if neighbour.blocks_sky() => continue,
                _ => height,
            };
            let [dx, _, dz] = direction.vector();
            velocity[0] += dx as f64 * difference;
            velocity[1] += dz as f64 * difference;
        }
        let length = (velocity[0] * velocity[0] + velocity[1] * velocity[1]).sqrt();
        if length < 1.0e-9 {
            return [0.0, 0.0];
        }
        [velocity[0] / length, velocity[1] / length]
    }
}

/// Capability of blocks that contain a fluid.
pub trait FluidHolder: Send + Sync {
    /// Fluid inside `state`, if any.
    fn fluid(&self, state: &BlockState) -> Option<&dyn Fluid>;

    /// True for blocks that are nothing but fluid.
    fn is_fluid_block(&self) -> bool;
}

/// Water and lava: height follows the `level` property.
#[derive(Debug, Clone)]
pub struct FlowingFluid {
    identifier: Identifier,
}

impl FlowingFluid {
    /// Level property name.
    pub const LEVEL: &'static str = "level";

    /// Fluid named `identifier`.
    pub fn new(identifier: Identifier) -> Self {
        Self { identifier }
    }
}

impl Fluid for FlowingFluid {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn height(&self, state: &BlockState) -> f32 {
        if state.bool_property(WaterloggableBlock::WATERLOGGED) == Some(true) {
            return MAX_FLUID_HEIGHT;
        }
        match state.int_property(Self::LEVEL).unwrap_or(0) {
            level @ 1..=7 => (8 - level) as f32 / 9.0,
            _ => MAX_FLUID_HEIGHT,
        }
    }
}

/// A block that is only fluid.
#[derive(Debug, Clone)]
pub struct FluidBlock {
    identifier: Identifier,
    fluid: Arc<dyn Fluid>,
}

impl FluidBlock {
    /// Block named `identifier` filled with `fluid`.
    pub fn new(identifier: Identifier, fluid: Arc<dyn Fluid>) -> Self {
        Self { identifier, fluid }
    }
}

impl Block for FluidBlock {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn fluid_holder(&self) -> Option<&dyn FluidHolder> {
        Some(self)
    }
}

impl FluidHolder for FluidBlock {
    fn fluid(&self, _state: &BlockState) -> Option<&dyn Fluid> {
        Some(self.fluid.as_ref())
    }

    fn is_fluid_block(&self) -> bool {
        true
    }
}

/// A solid block that can hold a fluid when its `waterlogged` property is set.
#[derive(Debug, Clone)]
pub struct WaterloggableBlock {
    identifier: Identifier,
    fluid: Arc<dyn Fluid>,
}

impl WaterloggableBlock {
    /// Property name.
    pub const WATERLOGGED: &'static str = "waterlogged";

    /// Block named `identifier` that can be waterlogged with `fluid`.
    pub fn new(identifier: Identifier, fluid: Arc<dyn Fluid>) -> Self {
        Self { identifier, fluid }
    }
}

impl Block for WaterloggableBlock {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn fluid_holder(&self) -> Option<&dyn FluidHolder> {
        Some(self)
    }
}

impl FluidHolder for WaterloggableBlock {
    fn fluid(&self, state: &BlockState) -> Option<&dyn Fluid> {
        (state.bool_property(Self::WATERLOGGED) == Some(true)).then_some(self.fluid.as_ref())
    }

    fn is_fluid_block(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{PropertyValue, SimpleBlock};
    use crate::shape::{CullShape, Transparency};

    fn water() -> (Arc<dyn Fluid>, Arc<dyn Block>) {
        let fluid: Arc<dyn Fluid> = Arc::new(FlowingFluid::new(Identifier::minecraft("water")));
        let block: Arc<dyn Block> =
            Arc::new(FluidBlock::new(Identifier::minecraft("water"), fluid.clone()));
        (fluid, block)
    }

    fn level(block: &Arc<dyn Block>, level: i32) -> BlockState {
        BlockState::builder(100 + level as u32, block.clone())
            .property(FlowingFluid::LEVEL, PropertyValue::Int(level))
            .build()
    }

    #[test]
    fn height_follows_level() {
        let (fluid, block) = water();
        assert_eq!(fluid.height(&level(&block, 0)), MAX_FLUID_HEIGHT);
        assert_eq!(fluid.height(&level(&block, 1)), 7.0 / 9.0);
        assert_eq!(fluid.height(&level(&block, 7)), 1.0 / 9.0);
        assert_eq!(fluid.height(&level(&block, 8)), MAX_FLUID_HEIGHT);
    }

    #[test]
    fn waterlogged_blocks_hold_fluid_only_when_flagged() {
        let (fluid, _) = water();
        let stairs: Arc<dyn Block> = Arc::new(WaterloggableBlock::new(
            Identifier::minecraft("oak_stairs"),
            fluid.clone(),
        ));
        let dry = BlockState::builder(1, stairs.clone())
            .property(WaterloggableBlock::WATERLOGGED, PropertyValue::Bool(false))
            .build();
        let wet = BlockState::builder(2, stairs)
            .property(WaterloggableBlock::WATERLOGGED, PropertyValue::Bool(true))
            .build();
        assert!(!fluid.matches(Some(&dry)));
        assert!(fluid.matches(Some(&wet)));
        assert!(!wet.is_fluid_block());
        assert_eq!(fluid.height(&wet), MAX_FLUID_HEIGHT);
        assert!(!fluid.matches(None));
    }

    #[test]
    fn velocity_points_towards_lower_neighbours() {
        let (fluid, block) = water();
        let source = level(&block, 0);
        let low = level(&block, 4);
        let wall = BlockState::builder(
            1,
            Arc::new(SimpleBlock::new(Identifier::minecraft("stone"))),
        )
        .shape(CullShape::full(Transparency::Opaque))
        .build();

        let still = fluid.velocity(&source, [Some(&source), Some(&source), Some(&wall), Some(&wall)]);
        assert_eq!(still, [0.0, 0.0]);

        let east = fluid.velocity(&source, [Some(&source), Some(&source), Some(&wall), Some(&low)]);
        assert!(east[0] > 0.99 && east[1].abs() < 1.0e-9);

        let south = fluid.velocity(&source, [Some(&wall), None, Some(&wall), Some(&wall)]);
        assert!(south[1] > 0.99);
    }
}
