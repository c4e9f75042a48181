#![warn(missing_docs)]
//! Chunk section meshing: face culling, fluid surfaces, distance based
//! detail levels and a background worker queue.

mod ao;
mod cache;
mod cancel;
mod config;
mod corner_heights;
mod details;
mod driver;
mod error;
mod face_culling;
mod fluid;
mod fluid_culling;
mod mesh;
mod mesher;
mod model;
mod queue;
mod solid;
mod tint;

pub use ao::{calculate_level, face_axes, AmbientOcclusion};
pub use cache::ChunkMeshCache;
pub use cancel::CancellationToken;
pub use config::{DetailPolicy, MesherConfig};
pub use corner_heights::{corner_heights, fluid_heights};
pub use details::ChunkMeshDetails;
pub use driver::{write_mesh_report, ChunkMeshDriver, ChunkMeshStat};
pub use error::MeshError;
pub use face_culling::can_cull;
pub use fluid_culling::{can_fluid_cull, FluidCull};
pub use mesh::{
    pack_light_tint, BlockVertex, ChunkMeshes, ChunkMeshesBuilder, LayerMesh, MeshHash, Quad,
    RenderedBlockEntity,
};
pub use mesher::ChunkMesher;
pub use model::{
    BakedBlockModel, BakedFace, BakedModel, FluidModel, ModelRegistry, RenderContext, Texture,
    SELF_LIGHT_INDEX,
};
pub use queue::{MeshOutcome, MeshingQueue};
pub use tint::{NoTint, StaticTints, TintProvider, WHITE};
