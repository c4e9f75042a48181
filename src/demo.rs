//! Seeded demo terrain and the baked models used to mesh it.

use std::sync::Arc;

use anyhow::Result;
use minemesh_render::{BakedBlockModel, FluidModel, ModelRegistry, Texture};
use minemesh_testkit::{Blocks, TestWorld};
use minemesh_world::Transparency;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

const SEA_LEVEL: i32 = 14;
const BASE_HEIGHT: i32 = 8;

/// Texture ids handed to the baked models.
mod textures {
    pub const STONE: u32 = 1;
    pub const BEDROCK: u32 = 2;
    pub const GLASS: u32 = 3;
    pub const ICE: u32 = 4;
    pub const SLAB: u32 = 5;
    pub const WATER_STILL: u32 = 10;
    pub const WATER_FLOW: u32 = 11;
    pub const WATER_OVERLAY: u32 = 12;
}

/// Build rolling stone terrain with a bedrock floor, water up to sea level and
/// a few glass and ice pillars.
pub fn generate(blocks: &Blocks, radius: i32, seed: u64) -> Result<TestWorld> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = TestWorld::new(radius);
    let extent = (radius + 1) * 16;
    let mut placed = 0usize;
    for x in -radius * 16..extent {
        for z in -radius * 16..extent {
            let height = BASE_HEIGHT + column_height(x, z) + rng.gen_range(0..2);
            world.set(x, 0, z, &blocks.bedrock)?;
            for y in 1..height {
                world.set(x, y, z, &blocks.stone)?;
            }
            let top = if rng.gen_bool(0.05) {
                &blocks.slab
            } else {
                &blocks.stone
            };
            world.set(x, height, z, top)?;
            placed += height as usize + 1;
            for y in height + 1..=SEA_LEVEL {
                world.set(x, y, z, &blocks.water())?;
                placed += 1;
            }
            if height > SEA_LEVEL && rng.gen_bool(0.01) {
                let pillar = if rng.gen_bool(0.5) {
                    &blocks.glass
                } else {
                    &blocks.ice
                };
                let tall = rng.gen_range(2..6);
                world.fill([x, height + 1, z], [x, height + tall, z], pillar)?;
                placed += tall as usize;
            }
        }
    }
    debug!(radius, seed, blocks = placed, "demo terrain generated");
    Ok(world)
}

fn column_height(x: i32, z: i32) -> i32 {
    let wave = (x as f32 * 0.15).sin() * 4.0 + (z as f32 * 0.11).cos() * 5.0;
    wave.round() as i32 + 4
}

/// Cube models for every demo block plus the water fluid model.
pub fn models(blocks: &Blocks) -> ModelRegistry {
    let cube = |id: u32, transparency: Transparency| {
        Arc::new(BakedBlockModel::cube([Texture::new(id, transparency); 6]))
    };
    let mut models = ModelRegistry::new();
    models.insert_block(&blocks.stone, cube(textures::STONE, Transparency::Opaque));
    models.insert_block(&blocks.bedrock, cube(textures::BEDROCK, Transparency::Opaque));
    models.insert_block(&blocks.glass, cube(textures::GLASS, Transparency::Transparent));
    models.insert_block(&blocks.ice, cube(textures::ICE, Transparency::Translucent));
    models.insert_block(
        &blocks.slab,
        Arc::new(BakedBlockModel::new().with_cuboid(
            [0.0; 3],
            [1.0, 0.5, 1.0],
            [Texture::new(textures::SLAB, Transparency::Opaque); 6],
        )),
    );
    models.insert_fluid(
        blocks.water_fluid().identifier().clone(),
        FluidModel {
            still: Texture::new(textures::WATER_STILL, Transparency::Translucent),
            flowing: Texture::new(textures::WATER_FLOW, Transparency::Translucent),
            overlay: Some(Texture::new(
                textures::WATER_OVERLAY,
                Transparency::Transparent,
            )),
        },
    );
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use minemesh_core::BlockPosition;

    #[test]
    fn same_seed_same_terrain() {
        let blocks = Blocks::new();
        let first = generate(&blocks, 1, 7).expect("generate");
        let second = generate(&blocks, 1, 7).expect("generate");
        for (x, z) in [(0, 0), (-16, 5), (31, 31)] {
            for y in 0..40 {
                let position = BlockPosition::try_new(x, y, z).expect("in range");
                let a = first.storage().block(position).map(|state| state.id());
                let b = second.storage().block(position).map(|state| state.id());
                assert_eq!(a, b, "{x} {y} {z}");
            }
        }
    }

    #[test]
    fn floor_is_bedrock_and_water_reaches_sea_level() {
        let blocks = Blocks::new();
        let world = generate(&blocks, 0, 1).expect("generate");
        let floor = BlockPosition::try_new(3, 0, 3).expect("in range");
        assert_eq!(
            world.storage().block(floor).map(|state| state.id()),
            Some(blocks.bedrock.id())
        );
        for x in 0..16 {
            for z in 0..16 {
                let sea = BlockPosition::try_new(x, SEA_LEVEL, z).expect("in range");
                assert!(world.storage().block(sea).is_some());
            }
        }
    }

    #[test]
    fn every_block_has_a_model() {
        let blocks = Blocks::new();
        let models = models(&blocks);
        for state in [
            &blocks.stone,
            &blocks.bedrock,
            &blocks.glass,
            &blocks.ice,
            &blocks.slab,
        ] {
            assert!(models.block(state).is_some());
        }
        assert!(models.fluid(blocks.water_fluid().as_ref()).is_some());
    }
}
