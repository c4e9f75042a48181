//! Background mesh workers.
//!
//! Sections are queued on the main thread, handed to a fixed pool of worker
//! threads in camera priority order, and their results are collected with
//! [`MeshingQueue::poll`]. The result channel is bounded, so workers stall
//! when results are not polled.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use minemesh_core::{ChunkPosition, SectionPosition};
use minemesh_world::{ChunkNeighbourhood, ChunkStorage};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::config::MesherConfig;
use crate::details::ChunkMeshDetails;
use crate::mesh::ChunkMeshes;
use crate::mesher::ChunkMesher;
use crate::MeshError;

/// Result of one finished mesh job.
#[derive(Debug)]
pub enum MeshOutcome {
    /// New geometry for a section.
    Meshed(ChunkMeshes),
    /// A neighbour chunk was missing; queue the section again later.
    NotReady(SectionPosition),
    /// The section no longer exists in its chunk.
    Missing(SectionPosition),
}

struct MeshJob {
    id: u64,
    position: SectionPosition,
    neighbourhood: ChunkNeighbourhood,
    details: ChunkMeshDetails,
    mesher: Arc<ChunkMesher>,
    cancel: CancellationToken,
}

struct JobResult {
    id: u64,
    position: SectionPosition,
    result: Result<Option<ChunkMeshes>, MeshError>,
}

struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

/// Priority queue of dirty sections feeding a worker pool.
pub struct MeshingQueue {
    mesher: Arc<ChunkMesher>,
    camera: SectionPosition,
    pending: Vec<SectionPosition>,
    queued: HashSet<SectionPosition>,
    in_flight: HashMap<SectionPosition, InFlight>,
    /// Cancelled jobs whose result has not come back yet. Their workers are
    /// still busy.
    superseded: HashSet<u64>,
    cancelled_passes: u64,
    discarded_results: u64,
    details: HashMap<SectionPosition, ChunkMeshDetails>,
    next_id: u64,
    worker_count: usize,
    jobs: Option<Sender<MeshJob>>,
    results: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
}

impl MeshingQueue {
    /// Spawn the worker threads configured by the mesher.
    pub fn new(mesher: ChunkMesher, camera: SectionPosition) -> io::Result<Self> {
        let config = mesher.config();
        let worker_count = config.resolved_worker_threads();
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let (result_tx, result_rx) = bounded::<JobResult>(config.max_queued_results.max(1));

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("mesh-worker-{index}"))
                .spawn(move || run_worker(jobs, results))?;
            workers.push(handle);
        }
        info!(workers = worker_count, "meshing queue started");

        Ok(Self {
            mesher: Arc::new(mesher),
            camera,
            pending: Vec::new(),
            queued: HashSet::new(),
            in_flight: HashMap::new(),
            superseded: HashSet::new(),
            cancelled_passes: 0,
            discarded_results: 0,
            details: HashMap::new(),
            next_id: 0,
            worker_count,
            jobs: Some(job_tx),
            results: result_rx,
            workers,
        })
    }

    /// Mark a section for meshing. Queuing a queued section is a no-op.
    pub fn queue(&mut self, position: SectionPosition) {
        if self.queued.insert(position) {
            self.pending.push(position);
        }
    }

    /// Sections waiting for a worker.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Current jobs handed out and not yet polled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Jobs occupying a worker, cancelled ones included until their result
    /// is polled.
    pub fn running(&self) -> usize {
        self.in_flight.len() + self.superseded.len()
    }

    /// Passes that stopped early because they were cancelled.
    pub fn cancelled_passes(&self) -> u64 {
        self.cancelled_passes
    }

    /// Finished meshes dropped because a newer job replaced them.
    pub fn discarded_results(&self) -> u64 {
        self.discarded_results
    }

    /// True if nothing is pending or running.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.running() == 0
    }

    /// Section the camera is in.
    pub fn camera(&self) -> SectionPosition {
        self.camera
    }

    /// Move the camera. Affects priorities and details of later jobs.
    pub fn set_camera(&mut self, camera: SectionPosition) {
        self.camera = camera;
    }

    /// Active mesher settings.
    pub fn config(&self) -> &MesherConfig {
        self.mesher.config()
    }

    /// Replace the mesher settings. Running jobs finish with the old ones.
    pub fn set_config(&mut self, config: MesherConfig) {
        Arc::make_mut(&mut self.mesher).set_config(config);
    }

    /// Hand pending sections to the workers, nearest first.
    ///
    /// At most one job per worker runs at a time, counting cancelled jobs
    /// that have not reported back; the rest stay pending.
    /// Sections of chunks missing from `storage` are dropped. Returns the
    /// number of dispatched jobs.
    pub fn dispatch(&mut self, storage: &ChunkStorage) -> usize {
        let Some(jobs) = self.jobs.as_ref() else {
            return 0;
        };
        let free = self.worker_count.saturating_sub(self.running());
        if free == 0 || self.pending.is_empty() {
            return 0;
        }

        let camera = self.camera;
        let camera_chunk = camera.chunk_position();
        // Highest priority last so that `pop` takes it.
        self.pending.sort_by_key(|position| {
            std::cmp::Reverse((
                position.chunk_position() != camera_chunk,
                position.distance_squared(camera),
            ))
        });

        let mut dispatched = 0;
        while dispatched < free {
            let Some(position) = self.pending.pop() else {
                break;
            };
            self.queued.remove(&position);
            let Some(neighbourhood) = storage.neighbourhood(position.chunk_position()) else {
                debug!(%position, "chunk unloaded before meshing");
                continue;
            };

            let previous = self.details.get(&position).copied();
            let details = self.mesher.details(position, camera, previous);
            self.details.insert(position, details);

            let id = self.next_id;
            self.next_id += 1;
            let cancel = CancellationToken::new();
            if let Some(stale) = self.in_flight.insert(
                position,
                InFlight {
                    id,
                    cancel: cancel.clone(),
                },
            ) {
                stale.cancel.cancel();
                self.superseded.insert(stale.id);
            }
            let job = MeshJob {
                id,
                position,
                neighbourhood,
                details,
                mesher: Arc::clone(&self.mesher),
                cancel,
            };
            if jobs.send(job).is_err() {
                warn!(%position, "mesh workers gone, job dropped");
                self.in_flight.remove(&position);
                break;
            }
            dispatched += 1;
        }
        dispatched
    }

    /// Forget every section of `chunk` and cancel its running jobs.
    pub fn remove_chunk(&mut self, chunk: ChunkPosition) {
        self.pending.retain(|position| position.chunk_position() != chunk);
        self.queued.retain(|position| position.chunk_position() != chunk);
        self.details.retain(|position, _| position.chunk_position() != chunk);
        let superseded = &mut self.superseded;
        self.in_flight.retain(|position, job| {
            let keep = position.chunk_position() != chunk;
            if !keep {
                job.cancel.cancel();
                superseded.insert(job.id);
            }
            keep
        });
        debug!(%chunk, "chunk removed from meshing queue");
    }

    /// Collect finished jobs without blocking.
    ///
    /// Results of cancelled or superseded jobs are dropped.
    pub fn poll(&mut self) -> Vec<MeshOutcome> {
        let finished: Vec<JobResult> = self.results.try_iter().collect();
        let mut outcomes = Vec::with_capacity(finished.len());
        for job in finished {
            if self.superseded.remove(&job.id) {
                if matches!(job.result, Err(MeshError::Cancelled)) {
                    self.cancelled_passes += 1;
                } else {
                    self.discarded_results += 1;
                }
                debug!(position = %job.position, "stale mesh result dropped");
                continue;
            }
            match self.in_flight.get(&job.position) {
                Some(current) if current.id == job.id => {
                    self.in_flight.remove(&job.position);
                }
                _ => {
                    debug!(position = %job.position, "unknown mesh result dropped");
                    continue;
                }
            }
            match job.result {
                Ok(Some(meshes)) => outcomes.push(MeshOutcome::Meshed(meshes)),
                Ok(None) => outcomes.push(MeshOutcome::NotReady(job.position)),
                Err(MeshError::MissingSection(position)) => {
                    self.details.remove(&position);
                    outcomes.push(MeshOutcome::Missing(position));
                }
                Err(MeshError::Cancelled) => {
                    self.cancelled_passes += 1;
                    debug!(position = %job.position, "mesh pass cancelled");
                }
                Err(err @ MeshError::OutOfWorld(_)) => {
                    self.details.remove(&job.position);
                    warn!(position = %job.position, %err, "section dropped");
                }
            }
        }
        outcomes
    }
}

fn run_worker(jobs: Receiver<MeshJob>, results: Sender<JobResult>) {
    while let Ok(job) = jobs.recv() {
        let height = job.position.y();
        let result = job
            .mesher
            .mesh(&job.neighbourhood, height, job.details, &job.cancel);
        let finished = JobResult {
            id: job.id,
            position: job.position,
            result,
        };
        if results.send(finished).is_err() {
            break;
        }
    }
}

impl Drop for MeshingQueue {
    fn drop(&mut self) {
        self.jobs.take();
        for job in self.in_flight.values() {
            job.cancel.cancel();
        }
        for worker in self.workers.drain(..) {
            // Keep draining so that no worker blocks on a full result channel.
            while !worker.is_finished() {
                let _ = self.results.recv_timeout(Duration::from_millis(5));
            }
            if worker.join().is_err() {
                warn!("mesh worker panicked");
            }
        }
    }
}
