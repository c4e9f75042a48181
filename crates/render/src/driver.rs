use std::path::Path;

use anyhow::Result;
use minemesh_core::SectionPosition;
use minemesh_testkit::{MeshMetricSink, MeshPassCounters, SectionMeshMetric};
use minemesh_world::{ChunkStorage, Transparency};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::mesh::{ChunkMeshes, MeshHash};
use crate::mesher::ChunkMesher;
use crate::{ChunkMeshCache, MeshError};

/// Quad counts of one freshly meshed section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeshStat {
    /// Section this mesh belongs to.
    pub position: SectionPosition,
    /// Quads per layer: opaque, transparent, translucent.
    pub quads: [usize; 3],
    /// Block entities collected for the section.
    pub block_entities: usize,
    /// Mesh hash for determinism comparisons.
    pub hash: MeshHash,
}

impl ChunkMeshStat {
    /// Counts of `meshes`.
    pub fn of(meshes: &ChunkMeshes) -> Self {
        Self {
            position: meshes.position(),
            quads: [
                Transparency::Opaque,
                Transparency::Transparent,
                Transparency::Translucent,
            ]
            .map(|transparency| meshes.layer(transparency).quads()),
            block_entities: meshes.block_entities().len(),
            hash: meshes.hash(),
        }
    }
}

/// Meshes dirty sections on the calling thread and refreshes cache entries.
pub struct ChunkMeshDriver<'a> {
    storage: &'a mut ChunkStorage,
    cache: &'a mut ChunkMeshCache,
    mesher: &'a ChunkMesher,
    camera: SectionPosition,
}

impl<'a> ChunkMeshDriver<'a> {
    /// Create a new driver spanning storage/cache/mesher.
    pub fn new(
        storage: &'a mut ChunkStorage,
        cache: &'a mut ChunkMeshCache,
        mesher: &'a ChunkMesher,
        camera: SectionPosition,
    ) -> Self {
        Self {
            storage,
            cache,
            mesher,
            camera,
        }
    }

    /// Mesh all dirty sections and return stats.
    ///
    /// Sections whose neighbour chunks are missing stay dirty for a later pass.
    /// Sections that no longer exist lose their cached mesh.
    pub fn process(&mut self) -> Result<Vec<ChunkMeshStat>, MeshError> {
        let cancel = CancellationToken::new();
        let mut stats = Vec::new();
        let mut deferred = Vec::new();
        for position in self.storage.take_dirty_sections() {
            let Some(neighbourhood) = self.storage.neighbourhood(position.chunk_position()) else {
                continue;
            };
            if neighbourhood.chunk().section(position.y()).is_none() {
                self.cache.remove(position);
                continue;
            }
            let previous = self.cache.get(position).map(|meshes| meshes.details());
            let details = self.mesher.details(position, self.camera, previous);
            match self
                .mesher
                .mesh(&neighbourhood, position.y(), details, &cancel)?
            {
                Some(meshes) => {
                    stats.push(ChunkMeshStat::of(&meshes));
                    self.cache.insert(meshes);
                }
                None => deferred.push(position),
            }
        }
        if !deferred.is_empty() {
            debug!(sections = deferred.len(), "sections deferred until neighbours load");
        }
        for position in deferred {
            self.storage.mark_dirty(position);
        }
        Ok(stats)
    }

}

impl From<&ChunkMeshStat> for SectionMeshMetric {
    fn from(stat: &ChunkMeshStat) -> Self {
        let [opaque_quads, transparent_quads, translucent_quads] = stat.quads;
        Self {
            section: [stat.position.x(), stat.position.y(), stat.position.z()],
            opaque_quads,
            transparent_quads,
            translucent_quads,
            block_entities: stat.block_entities,
            hash: stat.hash.to_hex(),
        }
    }
}

/// Write per-section quad counts and the queue's pass counters as JSON.
pub fn write_mesh_report<P: AsRef<Path>>(
    stats: &[ChunkMeshStat],
    passes: MeshPassCounters,
    path: P,
) -> Result<()> {
    let metrics: Vec<SectionMeshMetric> = stats.iter().map(SectionMeshMetric::from).collect();
    MeshMetricSink::create(path)?.write(&metrics, passes)
}
