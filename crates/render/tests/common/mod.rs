//! Models and helpers shared by the mesh worldtests.

#![allow(dead_code)]

use std::sync::Arc;

use minemesh_core::SectionPosition;
use minemesh_render::{
    BakedBlockModel, CancellationToken, ChunkMeshDetails, ChunkMeshes, ChunkMesher, FluidModel,
    MesherConfig, ModelRegistry, NoTint, Texture,
};
use minemesh_testkit::{Blocks, TestWorld};
use minemesh_world::Transparency;

pub const STONE: u32 = 1;
pub const BEDROCK: u32 = 2;
pub const GLASS: u32 = 3;
pub const ICE: u32 = 4;
pub const SLAB: u32 = 5;
pub const TORCH: u32 = 6;
pub const WATER_STILL: u32 = 10;
pub const WATER_FLOW: u32 = 11;
pub const WATER_OVERLAY: u32 = 12;

pub fn models(blocks: &Blocks) -> ModelRegistry {
    let cube = |id: u32, transparency: Transparency| {
        Arc::new(BakedBlockModel::cube([Texture::new(id, transparency); 6]))
    };
    let mut models = ModelRegistry::new();
    models.insert_block(&blocks.stone, cube(STONE, Transparency::Opaque));
    models.insert_block(&blocks.bedrock, cube(BEDROCK, Transparency::Opaque));
    models.insert_block(&blocks.glass, cube(GLASS, Transparency::Transparent));
    models.insert_block(&blocks.ice, cube(ICE, Transparency::Translucent));
    models.insert_block(
        &blocks.slab,
        Arc::new(BakedBlockModel::new().with_cuboid(
            [0.0; 3],
            [1.0, 0.5, 1.0],
            [Texture::new(SLAB, Transparency::Opaque); 6],
        )),
    );
    models.insert_block(
        &blocks.torch,
        Arc::new(BakedBlockModel::new().with_cuboid(
            [0.4375, 0.0, 0.4375],
            [0.5625, 0.625, 0.5625],
            [Texture::new(TORCH, Transparency::Transparent); 6],
        )),
    );
    models.insert_fluid(
        blocks.water_fluid().identifier().clone(),
        FluidModel {
            still: Texture::new(WATER_STILL, Transparency::Translucent),
            flowing: Texture::new(WATER_FLOW, Transparency::Translucent),
            overlay: Some(Texture::new(WATER_OVERLAY, Transparency::Transparent)),
        },
    );
    models
}

pub fn mesher(blocks: &Blocks, config: MesherConfig) -> ChunkMesher {
    ChunkMesher::new(config, Arc::new(models(blocks)), Arc::new(NoTint))
}

/// Mesh `position` as seen from inside it.
pub fn mesh_section(world: &TestWorld, mesher: &ChunkMesher, position: SectionPosition) -> ChunkMeshes {
    let details = mesher.details(position, position, None);
    mesh_with(world, mesher, position, details)
}

pub fn mesh_with(
    world: &TestWorld,
    mesher: &ChunkMesher,
    position: SectionPosition,
    details: ChunkMeshDetails,
) -> ChunkMeshes {
    let neighbourhood = world.neighbourhood(position).expect("chunk loaded");
    mesher
        .mesh(&neighbourhood, position.y(), details, &CancellationToken::new())
        .expect("mesh pass")
        .expect("neighbourhood complete")
}
