use anyhow::Result;
use minemesh_render::MesherConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/mesher.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Chunk radius of the generated world around the origin.
    pub radius: i32,
    /// Seed of the terrain generator.
    pub seed: u64,
    /// Mesh on the worker pool instead of the calling thread.
    pub background: bool,
    /// Where to write per-section mesh metrics, if anywhere.
    pub metrics_path: Option<PathBuf>,
    pub mesher: MesherConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            seed: 0x5eed,
            background: true,
            metrics_path: None,
            mesher: MesherConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<BenchConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    BenchConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Mesher config not found at {}. Using defaults", path.display());
                }
                BenchConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
