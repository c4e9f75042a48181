use serde::{Deserialize, Serialize};

use crate::details::ChunkMeshDetails;

/// How mesh details are chosen per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPolicy {
    /// Every section gets [`ChunkMeshDetails::ALL`].
    Full,
    /// Details shrink with the distance to the camera.
    #[default]
    Distance,
}

/// Mesher settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Treat bedrock at the bottom of the world as hidden from below.
    pub fast_bedrock: bool,
    /// Per-vertex ambient occlusion.
    pub ambient_occlusion: bool,
    /// Detail level policy.
    pub details: DetailPolicy,
    /// Mesh worker threads, 0 to derive from the available parallelism.
    pub worker_threads: usize,
    /// Finished meshes buffered before workers block.
    pub max_queued_results: usize,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            fast_bedrock: true,
            ambient_occlusion: false,
            details: DetailPolicy::Distance,
            worker_threads: 0,
            max_queued_results: 150,
        }
    }
}

impl MesherConfig {
    /// Details every mesh pass may use at most.
    pub fn detail_mask(&self) -> ChunkMeshDetails {
        let mut mask = ChunkMeshDetails::all();
        if !self.ambient_occlusion {
            mask -= ChunkMeshDetails::AMBIENT_OCCLUSION;
        }
        mask
    }

    /// Worker count with the automatic default resolved.
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads > 0 {
            return self.worker_threads;
        }
        std::thread::available_parallelism()
            .map(|threads| threads.get().saturating_sub(2))
            .unwrap_or(1)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: MesherConfig = toml::from_str("ambient_occlusion = true\ndetails = \"full\"")
            .expect("valid config");
        assert!(config.fast_bedrock);
        assert!(config.ambient_occlusion);
        assert_eq!(config.details, DetailPolicy::Full);
        assert_eq!(config.max_queued_results, 150);
    }

    #[test]
    fn mask_drops_disabled_features() {
        let config = MesherConfig::default();
        assert!(!config
            .detail_mask()
            .contains(ChunkMeshDetails::AMBIENT_OCCLUSION));
        let config = MesherConfig {
            ambient_occlusion: true,
            ..MesherConfig::default()
        };
        assert!(config
            .detail_mask()
            .contains(ChunkMeshDetails::AMBIENT_OCCLUSION));
    }

    #[test]
    fn worker_threads_never_zero() {
        assert!(MesherConfig::default().resolved_worker_threads() >= 1);
        let config = MesherConfig {
            worker_threads: 3,
            ..MesherConfig::default()
        };
        assert_eq!(config.resolved_worker_threads(), 3);
    }
}
