#![warn(missing_docs)]
//! Deterministic testing surfaces: block fixtures, a small loaded world and
//! mesh metric artifacts.

mod fixtures;
mod world;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use fixtures::*;
pub use world::*;

/// Quad counts of one meshed section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMeshMetric {
    /// Section coordinates [x, y, z].
    pub section: [i32; 3],
    /// Quads in the opaque layer.
    pub opaque_quads: usize,
    /// Quads in the transparent (cutout) layer.
    pub transparent_quads: usize,
    /// Quads in the translucent layer.
    pub translucent_quads: usize,
    /// Block entities handed to their own renderers.
    pub block_entities: usize,
    /// Mesh hash (hex string) for deterministic comparisons.
    pub hash: String,
}

/// Work thrown away by the background queue during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeshPassCounters {
    /// Passes that stopped early on cancellation.
    pub cancelled_passes: u64,
    /// Finished meshes replaced by a newer job before they were used.
    pub discarded_results: u64,
}

#[derive(Serialize)]
struct MeshReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    passes: MeshPassCounters,
    sections: &'a [SectionMeshMetric],
}

/// Writes section mesh metrics to JSON.
pub struct MeshMetricSink {
    file: File,
}

impl MeshMetricSink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the metrics and pass counters as pretty JSON.
    pub fn write(&mut self, metrics: &[SectionMeshMetric], passes: MeshPassCounters) -> Result<()> {
        let report = MeshReport {
            generated_at: Utc::now(),
            passes,
            sections: metrics,
        };
        let json = serde_json::to_string_pretty(&report)?;
        self.file.write_all(json.as_bytes())?;
        tracing::debug!(
            sections = metrics.len(),
            cancelled = passes.cancelled_passes,
            discarded = passes.discarded_results,
            "mesh metrics written"
        );
        Ok(())
    }
}
