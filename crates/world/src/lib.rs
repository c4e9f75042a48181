#![warn(missing_docs)]
//! World-side data consumed by the mesher: block states and their culling
//! shapes, fluids, chunk sections with light, copy-on-write chunk storage,
//! and the container/inventory transaction system.

mod block;
mod chunk;
pub mod container;
mod error;
mod fluid;
mod heightmap;
mod light;
mod neighbourhood;
mod section;
mod shape;
mod storage;

pub use block::{
    position_hash, Block, BlockState, BlockStateBuilder, CustomBlockCulling, OffsetBlock,
    PropertyValue, RandomOffset, SimpleBlock, StateFlags,
};
pub use chunk::Chunk;
pub use error::WorldError;
pub use fluid::{
    FlowingFluid, Fluid, FluidBlock, FluidHolder, WaterloggableBlock, MAX_FLUID_HEIGHT,
};
pub use heightmap::Heightmap;
pub use light::{ChunkLight, LightLevel, BLOCK_LIGHT_MASK, MAX_LIGHT, SKY_LIGHT_MASK};
pub use neighbourhood::ChunkNeighbourhood;
pub use section::{BlockEntity, ChunkSection};
pub use shape::{CullShape, FaceProperties, SideProperties, Transparency};
pub use storage::ChunkStorage;
