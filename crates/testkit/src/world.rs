use anyhow::Result;
use minemesh_core::{BlockPosition, ChunkPosition, SectionPosition};
use minemesh_world::{BlockState, ChunkNeighbourhood, ChunkStorage, LightLevel};

/// A square of loaded chunks around the origin for headless mesh tests.
///
/// Chunks span sections `0..=3`, so block Y runs from 0 to 63.
#[derive(Debug)]
pub struct TestWorld {
    storage: ChunkStorage,
}

impl TestWorld {
    /// Lowest section of every chunk.
    pub const MIN_SECTION: i32 = 0;
    /// Highest section of every chunk.
    pub const MAX_SECTION: i32 = 3;

    /// Load every chunk within `radius` of chunk (0, 0).
    pub fn new(radius: i32) -> Self {
        let mut storage = ChunkStorage::new(Self::MIN_SECTION, Self::MAX_SECTION);
        for x in -radius..=radius {
            for z in -radius..=radius {
                storage.ensure_chunk(ChunkPosition::new(x, z));
            }
        }
        Self { storage }
    }

    /// Place a block.
    pub fn set(&mut self, x: i32, y: i32, z: i32, state: &BlockState) -> Result<()> {
        self.storage
            .set_block(BlockPosition::try_new(x, y, z)?, Some(state.clone()))?;
        Ok(())
    }

    /// Remove a block.
    pub fn clear(&mut self, x: i32, y: i32, z: i32) -> Result<()> {
        self.storage.set_block(BlockPosition::try_new(x, y, z)?, None)?;
        Ok(())
    }

    /// Fill the inclusive box `min..=max`.
    pub fn fill(&mut self, min: [i32; 3], max: [i32; 3], state: &BlockState) -> Result<()> {
        for x in min[0]..=max[0] {
            for y in min[1]..=max[1] {
                for z in min[2]..=max[2] {
                    self.set(x, y, z, state)?;
                }
            }
        }
        Ok(())
    }

    /// Overwrite the packed light of a block.
    pub fn set_light(&mut self, x: i32, y: i32, z: i32, light: LightLevel) -> Result<()> {
        self.storage
            .set_light(BlockPosition::try_new(x, y, z)?, light)?;
        Ok(())
    }

    /// Neighbourhood snapshot of the chunk containing `section`.
    pub fn neighbourhood(&self, section: SectionPosition) -> Option<ChunkNeighbourhood> {
        self.storage.neighbourhood(section.chunk_position())
    }

    /// Loaded chunks.
    pub fn storage(&self) -> &ChunkStorage {
        &self.storage
    }

    /// Loaded chunks, mutably.
    pub fn storage_mut(&mut self) -> &mut ChunkStorage {
        &mut self.storage
    }

    /// Give up the world, keeping its chunks.
    pub fn into_storage(self) -> ChunkStorage {
        self.storage
    }
}
