//! minemesh - headless chunk section mesher
//!
//! Generates a seeded demo world, meshes every section and reports mesh metrics.

mod config;
mod demo;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{BenchConfig, DEFAULT_CONFIG_PATH};
use minemesh_core::SectionPosition;
use minemesh_render::{
    write_mesh_report, ChunkMeshCache, ChunkMeshDriver, ChunkMeshStat, ChunkMesher, DetailPolicy,
    MeshOutcome, MeshingQueue, NoTint,
};
use minemesh_testkit::{Blocks, MeshPassCounters};
use minemesh_world::ChunkStorage;
use tracing::info;

const STALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "minemesh", version, about = "Mesh a seeded demo world and report metrics")]
struct Cli {
    /// Mesher config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Chunk radius around the origin (overrides the config).
    #[arg(long)]
    radius: Option<i32>,
    /// Terrain seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,
    /// Mesh worker threads, 0 for automatic (overrides the config).
    #[arg(long)]
    workers: Option<usize>,
    /// Mesh on the calling thread instead of the worker pool.
    #[arg(long)]
    sync: bool,
    /// Mesh every section with full detail.
    #[arg(long)]
    full_detail: bool,
    /// Write per-section quad counts JSON to this path.
    #[arg(long)]
    metrics: Option<PathBuf>,
    /// Write the effective config back to `--config` and exit.
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(workers) = self.workers {
            config.mesher.worker_threads = workers;
        }
        if self.sync {
            config.background = false;
        }
        if self.full_detail {
            config.mesher.details = DetailPolicy::Full;
        }
        if let Some(path) = &self.metrics {
            config.metrics_path = Some(path.clone());
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting minemesh v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut config = BenchConfig::load_from_path(&cli.config);
    cli.apply(&mut config);
    if config.radius < 0 {
        bail!("radius must not be negative, got {}", config.radius);
    }

    if cli.save_config {
        config
            .save_to_path(&cli.config)
            .with_context(|| format!("saving config to {}", cli.config.display()))?;
        info!(path = %cli.config.display(), "config saved");
        return Ok(());
    }

    let blocks = Blocks::new();
    let started = Instant::now();
    let world = demo::generate(&blocks, config.radius, config.seed)
        .context("generating demo terrain")?;
    info!(
        radius = config.radius,
        seed = config.seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "terrain ready"
    );

    let mesher = ChunkMesher::new(
        config.mesher.clone(),
        Arc::new(demo::models(&blocks)),
        Arc::new(NoTint),
    );
    let camera = SectionPosition::new(0, 1, 0);
    let mut storage = world.into_storage();
    let mut cache = ChunkMeshCache::new();

    let started = Instant::now();
    let (stats, passes) = if config.background {
        mesh_in_background(&mut storage, &mut cache, mesher, camera)?
    } else {
        let stats = ChunkMeshDriver::new(&mut storage, &mut cache, &mesher, camera)
            .process()
            .context("meshing dirty sections")?;
        (stats, MeshPassCounters::default())
    };
    // Sections of the outermost chunks never see all of their neighbours.
    let deferred = storage.take_dirty_sections().len();
    info!(
        sections = stats.len(),
        cached = cache.len(),
        triangles = cache.triangles(),
        deferred,
        cancelled = passes.cancelled_passes,
        discarded = passes.discarded_results,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "meshing finished"
    );

    if let Some(path) = &config.metrics_path {
        write_mesh_report(&stats, passes, path)
            .with_context(|| format!("writing mesh metrics to {}", path.display()))?;
        info!(path = %path.display(), "mesh metrics written");
    }
    Ok(())
}

/// Queue every dirty section on the worker pool and wait until it drains.
fn mesh_in_background(
    storage: &mut ChunkStorage,
    cache: &mut ChunkMeshCache,
    mesher: ChunkMesher,
    camera: SectionPosition,
) -> Result<(Vec<ChunkMeshStat>, MeshPassCounters)> {
    let mut queue = MeshingQueue::new(mesher, camera).context("spawning mesh workers")?;
    for position in storage.take_dirty_sections() {
        queue.queue(position);
    }

    let deadline = Instant::now() + STALL_TIMEOUT;
    let mut stats = Vec::new();
    let mut not_ready = Vec::new();
    while !queue.is_idle() {
        if Instant::now() > deadline {
            bail!(
                "meshing stalled with {} pending and {} in flight",
                queue.pending(),
                queue.in_flight()
            );
        }
        queue.dispatch(storage);
        for outcome in queue.poll() {
            match outcome {
                MeshOutcome::Meshed(meshes) => {
                    stats.push(ChunkMeshStat::of(&meshes));
                    cache.insert(meshes);
                }
                MeshOutcome::NotReady(position) => not_ready.push(position),
                MeshOutcome::Missing(position) => {
                    cache.remove(position);
                }
            }
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    for position in not_ready {
        storage.mark_dirty(position);
    }
    let passes = MeshPassCounters {
        cancelled_passes: queue.cancelled_passes(),
        discarded_results: queue.discarded_results(),
    };
    Ok((stats, passes))
}
