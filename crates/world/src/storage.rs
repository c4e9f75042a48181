use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use minemesh_core::{BlockPosition, ChunkPosition, SectionPosition, SECTION_MAX};
use tracing::{debug, warn};

use crate::block::BlockState;
use crate::chunk::Chunk;
use crate::error::WorldError;
use crate::light::LightLevel;
use crate::neighbourhood::ChunkNeighbourhood;

/// Loaded chunks plus the set of sections whose meshes are stale.
///
/// Chunks are held as `Arc`s and mutated copy-on-write, so neighbourhood
/// snapshots handed to mesh workers never observe later edits.
/// Uses `BTreeMap` for deterministic iteration order.
#[derive(Debug, Default)]
pub struct ChunkStorage {
    chunks: BTreeMap<ChunkPosition, Arc<Chunk>>,
    min_section: i32,
    max_section: i32,
    dirty: BTreeSet<SectionPosition>,
}

impl ChunkStorage {
    /// Storage whose chunks span sections `min_section..=max_section`.
    pub fn new(min_section: i32, max_section: i32) -> Self {
        Self {
            chunks: BTreeMap::new(),
            min_section,
            max_section: max_section.max(min_section),
            dirty: BTreeSet::new(),
        }
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Lowest section index of every chunk.
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// Highest section index of every chunk.
    pub fn max_section(&self) -> i32 {
        self.max_section
    }

    /// Insert a fully loaded chunk. Its sections and those of its neighbours
    /// become dirty, since the neighbours can now mesh their borders.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Arc<Chunk>> {
        let position = chunk.position();
        debug!(%position, "chunk loaded");
        let previous = self.chunks.insert(position, Arc::new(chunk));
        self.mark_chunk_dirty(position);
        for (dx, dz) in ChunkPosition::NEIGHBOUR_OFFSETS {
            self.mark_chunk_dirty(position.offset(dx, dz));
        }
        previous
    }

    /// Obtain mutable access to a chunk, creating an empty one if necessary.
    pub fn ensure_chunk(&mut self, position: ChunkPosition) -> &mut Chunk {
        let (min, max) = (self.min_section, self.max_section);
        let chunk = self
            .chunks
            .entry(position)
            .or_insert_with(|| Arc::new(Chunk::new(position, min, max)));
        Arc::make_mut(chunk)
    }

    /// Attempt to fetch a chunk.
    pub fn get(&self, position: ChunkPosition) -> Option<&Arc<Chunk>> {
        self.chunks.get(&position)
    }

    /// Unload a chunk and forget its dirty sections.
    pub fn unload(&mut self, position: ChunkPosition) -> Option<Arc<Chunk>> {
        let chunk = self.chunks.remove(&position)?;
        self.dirty
            .retain(|section| section.chunk_position() != position);
        debug!(%position, "chunk unloaded");
        Some(chunk)
    }

    /// Positions of every loaded chunk in deterministic order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    /// Block at a world position.
    pub fn block(&self, position: BlockPosition) -> Option<&BlockState> {
        self.chunks
            .get(&position.chunk_position())?
            .block(position.in_chunk_position())
    }

    /// Replace a block, marking its section and every section sharing the
    /// touched border dirty.
    pub fn set_block(
        &mut self,
        position: BlockPosition,
        state: Option<BlockState>,
    ) -> Result<Option<BlockState>, WorldError> {
        let chunk_position = position.chunk_position();
        let chunk = self
            .chunks
            .get_mut(&chunk_position)
            .ok_or(WorldError::ChunkNotLoaded(chunk_position))?;
        let previous = Arc::make_mut(chunk).set_block(position.in_chunk_position(), state)?;
        self.mark_block_dirty(position);
        Ok(previous)
    }

    /// Overwrite light at a world position.
    pub fn set_light(
        &mut self,
        position: BlockPosition,
        light: LightLevel,
    ) -> Result<(), WorldError> {
        let chunk_position = position.chunk_position();
        let chunk = self
            .chunks
            .get_mut(&chunk_position)
            .ok_or(WorldError::ChunkNotLoaded(chunk_position))?;
        Arc::make_mut(chunk).set_light(position.in_chunk_position(), light)?;
        self.mark_block_dirty(position);
        Ok(())
    }

    /// Snapshot a chunk with its eight neighbours, `None` if it is not loaded.
    pub fn neighbourhood(&self, position: ChunkPosition) -> Option<ChunkNeighbourhood> {
        let chunk = self.chunks.get(&position)?.clone();
        let neighbours = ChunkPosition::NEIGHBOUR_OFFSETS
            .map(|(dx, dz)| self.chunks.get(&position.offset(dx, dz)).cloned());
        Some(ChunkNeighbourhood::new(chunk, neighbours))
    }

    /// Mark one section dirty if its chunk is loaded and the height is valid.
    pub fn mark_dirty(&mut self, section: SectionPosition) {
        if section.y() < self.min_section || section.y() > self.max_section {
            return;
        }
        if self.chunks.contains_key(&section.chunk_position()) {
            self.dirty.insert(section);
        }
    }

    /// True if `section` awaits a re-mesh.
    pub fn is_dirty(&self, section: SectionPosition) -> bool {
        self.dirty.contains(&section)
    }

    /// Drain the dirty set in deterministic order.
    pub fn take_dirty_sections(&mut self) -> Vec<SectionPosition> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    fn mark_chunk_dirty(&mut self, position: ChunkPosition) {
        let Some(chunk) = self.chunks.get(&position) else {
            return;
        };
        let heights: Vec<i32> = chunk.section_heights().collect();
        for height in heights {
            match SectionPosition::try_of_chunk(position, height) {
                Ok(section) => self.mark_dirty(section),
                Err(err) => {
                    warn!(%position, height, %err, "section outside the world is never meshed");
                }
            }
        }
    }

    fn mark_block_dirty(&mut self, position: BlockPosition) {
        let local = position.in_section_position();
        let around = |value: i32| -> &'static [i32] {
            match value {
                0 => &[0, -1],
                SECTION_MAX => &[0, 1],
                _ => &[0],
            }
        };
        let section = position.section_position();
        for &dx in around(local.x()) {
            for &dy in around(local.y()) {
                for &dz in around(local.z()) {
                    let y = section.y() + dy;
                    if y < self.min_section || y > self.max_section {
                        continue;
                    }
                    if let Ok(neighbour) =
                        SectionPosition::try_new(section.x() + dx, y, section.z() + dz)
                    {
                        self.mark_dirty(neighbour);
                    }
                }
            }
        }
    }
}
