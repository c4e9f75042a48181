//! Section mesh pass over solid blocks and fluids.

use std::fmt;
use std::sync::Arc;

use minemesh_core::{Identifier, SectionPosition};
use minemesh_world::ChunkNeighbourhood;
use tracing::{debug, info, trace};

use crate::cancel::CancellationToken;
use crate::config::{DetailPolicy, MesherConfig};
use crate::details::ChunkMeshDetails;
use crate::fluid::FluidSectionMesher;
use crate::mesh::{ChunkMeshes, ChunkMeshesBuilder};
use crate::model::ModelRegistry;
use crate::solid::SolidSectionMesher;
use crate::tint::TintProvider;
use crate::MeshError;

/// Builds [`ChunkMeshes`] for single sections.
///
/// Cheap to clone; models and tints are shared.
#[derive(Clone)]
pub struct ChunkMesher {
    config: MesherConfig,
    mask: ChunkMeshDetails,
    models: Arc<ModelRegistry>,
    tints: Arc<dyn TintProvider>,
    bedrock: Identifier,
}

impl fmt::Debug for ChunkMesher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkMesher")
            .field("config", &self.config)
            .field("mask", &self.mask)
            .field("models", &self.models.len())
            .finish_non_exhaustive()
    }
}

impl ChunkMesher {
    /// Create a mesher over a model registry and tint source.
    pub fn new(
        config: MesherConfig,
        models: Arc<ModelRegistry>,
        tints: Arc<dyn TintProvider>,
    ) -> Self {
        info!(?config, models = models.len(), "chunk mesher ready");
        Self {
            mask: config.detail_mask(),
            config,
            models,
            tints,
            bedrock: Identifier::minecraft("bedrock"),
        }
    }

    /// Active settings.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Replace the settings. Sections meshed before keep their geometry.
    pub fn set_config(&mut self, config: MesherConfig) {
        self.mask = config.detail_mask();
        debug!(?config, mask = ?self.mask, "mesher config changed");
        self.config = config;
    }

    /// Details for `position` seen from `camera`, given the details of its
    /// previous mesh.
    pub fn details(
        &self,
        position: SectionPosition,
        camera: SectionPosition,
        previous: Option<ChunkMeshDetails>,
    ) -> ChunkMeshDetails {
        let details = match self.config.details {
            DetailPolicy::Full => ChunkMeshDetails::ALL,
            DetailPolicy::Distance => match previous {
                Some(previous) => previous.update(position, camera),
                None => ChunkMeshDetails::of(position, camera),
            },
        };
        details & self.mask
    }

    /// Mesh section `height` of the centre chunk.
    ///
    /// Returns `Ok(None)` while a horizontal neighbour chunk is missing.
    /// Chunks past the world border fail with [`MeshError::OutOfWorld`].
    /// On error no geometry escapes the pass.
    pub fn mesh(
        &self,
        neighbourhood: &ChunkNeighbourhood,
        height: i32,
        details: ChunkMeshDetails,
        cancel: &CancellationToken,
    ) -> Result<Option<ChunkMeshes>, MeshError> {
        let position = SectionPosition::try_of_chunk(neighbourhood.position(), height)?;
        if !neighbourhood.is_complete() {
            debug!(%position, "neighbourhood incomplete, mesh deferred");
            return Ok(None);
        }
        let Some(section) = neighbourhood.chunk().section(height) else {
            return Err(MeshError::MissingSection(position));
        };

        let mut builder = ChunkMeshesBuilder::new(position, details);
        let solid = SolidSectionMesher {
            models: &self.models,
            tints: self.tints.as_ref(),
            bedrock: &self.bedrock,
            fast_bedrock: self.config.fast_bedrock,
            ambient_occlusion: self.config.ambient_occlusion,
        };
        let fluid = FluidSectionMesher {
            models: &self.models,
            tints: self.tints.as_ref(),
        };
        let result = solid
            .mesh(neighbourhood, position, section, &mut builder, cancel)
            .and_then(|()| fluid.mesh(neighbourhood, position, section, &mut builder, cancel));
        if let Err(err) = result {
            builder.discard();
            return Err(err);
        }

        let meshes = builder.build();
        trace!(
            %position,
            triangles = meshes.triangles(),
            blocks = meshes.occupied(),
            "section meshed"
        );
        Ok(Some(meshes))
    }
}
