use std::collections::HashMap;

use minemesh_core::{ChunkPosition, SectionPosition};

use crate::mesh::ChunkMeshes;

/// Finished section meshes keyed by section position.
#[derive(Debug, Default)]
pub struct ChunkMeshCache {
    entries: HashMap<SectionPosition, ChunkMeshes>,
}

impl ChunkMeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store a mesh, returning the one it replaces. Empty meshes evict the entry.
    pub fn insert(&mut self, meshes: ChunkMeshes) -> Option<ChunkMeshes> {
        let position = meshes.position();
        if meshes.is_empty() {
            return self.entries.remove(&position);
        }
        self.entries.insert(position, meshes)
    }

    /// Retrieve the mesh if it's cached.
    pub fn get(&self, position: SectionPosition) -> Option<&ChunkMeshes> {
        self.entries.get(&position)
    }

    /// Drop one section.
    pub fn remove(&mut self, position: SectionPosition) -> Option<ChunkMeshes> {
        self.entries.remove(&position)
    }

    /// Drop every section of a chunk. Returns how many were cached.
    pub fn remove_chunk(&mut self, chunk: ChunkPosition) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|position, _| position.chunk_position() != chunk);
        before - self.entries.len()
    }

    /// Cached meshes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ChunkMeshes> {
        self.entries.values()
    }

    /// Triangles across every cached mesh.
    pub fn triangles(&self) -> usize {
        self.entries.values().map(ChunkMeshes::triangles).sum()
    }

    /// Number of cached sections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
