//! Background mesh builds and the consumer-side hand-off (engine-only).
#![forbid(unsafe_code)]

mod model;
mod queue;
mod sink;

pub use model::VoxModel;
pub use queue::{MeshQueue, QueuePolicy, QueuedMesh};
pub use sink::MeshApplySink;

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use vox_mesh_cpu::{MeshBuffer, MeshBuildError, MeshOptions, build_parallel_in, resolve_workers};
use vox_volume::VoxelSource;

/// A volume snapshot to mesh, tagged with the revision it was taken at.
#[derive(Clone)]
pub struct MeshJob {
    pub rev: u64,
    pub source: Arc<dyn VoxelSource + Send + Sync>,
    pub options: MeshOptions,
}

#[derive(Debug)]
pub struct MeshOut {
    pub rev: u64,
    pub result: Result<MeshBuffer, MeshBuildError>,
    pub t_mesh_ms: u32,
}

#[derive(Debug)]
pub enum RuntimeError {
    Pool(ThreadPoolBuildError),
    Spawn(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Pool(e) => write!(f, "failed to build mesh pool: {}", e),
            RuntimeError::Spawn(e) => write!(f, "failed to spawn mesh dispatcher: {}", e),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Pool(e) => Some(e),
            RuntimeError::Spawn(e) => Some(e),
        }
    }
}

fn process_mesh_job(job: MeshJob, pool: &ThreadPool, workers: usize, tx: &Sender<MeshOut>) {
    let MeshJob {
        rev,
        source,
        options,
    } = job;
    let t0 = Instant::now();
    let result = build_parallel_in(pool, source.as_ref(), workers, &options);
    let t_mesh_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    match &result {
        Ok(mesh) => log::info!(
            target: "perf",
            "ms={} mesh_job rev={} quads={} workers={}",
            t_mesh_ms,
            rev,
            mesh.quad_count(),
            workers
        ),
        Err(e) => log::error!(target: "runtime", "mesh job rev={} failed: {}", rev, e),
    }
    let _ = tx.send(MeshOut {
        rev,
        result,
        t_mesh_ms,
    });
}

/// Owns the mesh worker pool and a dispatcher thread feeding it jobs in
/// submission order.
pub struct Runtime {
    job_tx: Option<Sender<MeshJob>>,
    res_rx: Receiver<MeshOut>,
    dispatcher: Option<JoinHandle<()>>,
    q_mesh: Arc<AtomicUsize>,
    inflight_mesh: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    /// Starts a runtime meshing with `workers` slabs per job (0 = all cores).
    pub fn new(workers: usize) -> Result<Self, RuntimeError> {
        let workers = resolve_workers(workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("vox-mesh-{i}"))
            .build()
            .map_err(RuntimeError::Pool)?;
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshOut>();
        let q_mesh = Arc::new(AtomicUsize::new(0));
        let inflight_mesh = Arc::new(AtomicUsize::new(0));

        let dispatcher = {
            let q_mesh = q_mesh.clone();
            let inflight_mesh = inflight_mesh.clone();
            thread::Builder::new()
                .name("vox-mesh-dispatch".into())
                .spawn(move || {
                    while let Ok(job) = job_rx.recv() {
                        // Count as in flight before leaving the queue so idle checks never
                        // see a job in neither state.
                        inflight_mesh.fetch_add(1, Ordering::SeqCst);
                        q_mesh.fetch_sub(1, Ordering::SeqCst);
                        process_mesh_job(job, &pool, workers, &res_tx);
                        inflight_mesh.fetch_sub(1, Ordering::SeqCst);
                    }
                    log::debug!(target: "runtime", "mesh dispatcher exiting");
                })
                .map_err(RuntimeError::Spawn)?
        };

        log::info!(target: "runtime", "mesh runtime started with {} worker(s)", workers);
        Ok(Self {
            job_tx: Some(job_tx),
            res_rx,
            dispatcher: Some(dispatcher),
            q_mesh,
            inflight_mesh,
            workers,
        })
    }

    pub fn submit(&self, job: MeshJob) {
        let Some(tx) = &self.job_tx else {
            return;
        };
        self.q_mesh.fetch_add(1, Ordering::SeqCst);
        if tx.send(job).is_err() {
            self.q_mesh.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn drain_worker_results(&self) -> Vec<MeshOut> {
        self.res_rx.try_iter().collect()
    }

    /// `(queued, in_flight)` job counts.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.q_mesh.load(Ordering::SeqCst),
            self.inflight_mesh.load(Ordering::SeqCst),
        )
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.queue_debug_counts() == (0, 0)
    }

    /// Blocks until every submitted job has produced its output.
    pub fn wait_idle(&self) {
        while !self.is_idle() {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        drop(self.job_tx.take());
        if let Some(handle) = self.dispatcher.take() {
            if handle.join().is_err() {
                log::error!(target: "runtime", "mesh dispatcher panicked");
            }
        }
    }
}
