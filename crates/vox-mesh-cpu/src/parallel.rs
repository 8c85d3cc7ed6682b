use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use vox_volume::VoxelSource;

use crate::mesh_build::{InvalidMesh, MeshBuffer};
use crate::slab::{Slab, partition_slabs};
use crate::{MeshOptions, build_slab};

/// A slab whose worker panicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlabFailure {
    pub slab: Slab,
    pub message: String,
}

#[derive(Debug)]
pub enum MeshBuildError {
    /// One or more slab workers panicked; no partial mesh is returned.
    WorkerPanicked { failures: Vec<SlabFailure> },
    /// The worker pool could not be created.
    PoolBuild(ThreadPoolBuildError),
    /// The slab meshes could not be concatenated into one index space.
    Merge(InvalidMesh),
}

impl fmt::Display for MeshBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshBuildError::WorkerPanicked { failures } => {
                write!(f, "{} slab worker(s) panicked", failures.len())?;
                for fail in failures {
                    write!(
                        f,
                        "; slab {} z=[{}, {}): {}",
                        fail.slab.index, fail.slab.start, fail.slab.end, fail.message
                    )?;
                }
                Ok(())
            }
            MeshBuildError::PoolBuild(e) => write!(f, "failed to build mesh worker pool: {}", e),
            MeshBuildError::Merge(e) => write!(f, "failed to merge slab meshes: {}", e),
        }
    }
}

impl std::error::Error for MeshBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshBuildError::PoolBuild(e) => Some(e),
            MeshBuildError::Merge(e) => Some(e),
            MeshBuildError::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ThreadPoolBuildError> for MeshBuildError {
    fn from(e: ThreadPoolBuildError) -> Self {
        MeshBuildError::PoolBuild(e)
    }
}

impl From<InvalidMesh> for MeshBuildError {
    fn from(e: InvalidMesh) -> Self {
        MeshBuildError::Merge(e)
    }
}

/// Size summary of a finished mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub quads: usize,
    pub vertices: usize,
    pub triangles: usize,
}

impl MeshStats {
    pub fn of(mesh: &MeshBuffer) -> Self {
        Self {
            quads: mesh.quad_count(),
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        }
    }
}

/// Turns a worker count of zero into the machine's available parallelism.
pub fn resolve_workers(workers: usize) -> usize {
    if workers > 0 {
        return workers;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Meshes `source` on a fresh pool of `workers` threads (0 = all cores).
pub fn build_parallel<S: VoxelSource + Sync + ?Sized>(
    source: &S,
    workers: usize,
    options: &MeshOptions,
) -> Result<MeshBuffer, MeshBuildError> {
    let workers = resolve_workers(workers);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("vox-slab-{i}"))
        .build()?;
    build_parallel_in(&pool, source, workers, options)
}

/// Meshes `source` split into `workers` Z slabs on an existing pool.
///
/// Slab meshes are concatenated in slab order with indices rebased. The result
/// covers the same surface area and bounds as [`crate::build_single`]; side
/// faces are cut at slab seams, so it may hold more quads. With one slab the
/// two meshes are identical.
pub fn build_parallel_in<S: VoxelSource + Sync + ?Sized>(
    pool: &ThreadPool,
    source: &S,
    workers: usize,
    options: &MeshOptions,
) -> Result<MeshBuffer, MeshBuildError> {
    let dims = source.dims();
    if dims.is_empty() {
        return Ok(MeshBuffer::new());
    }
    let t0 = Instant::now();
    let slabs = partition_slabs(dims.z, resolve_workers(workers));
    let n = slabs.len();
    let parts = build_slabs_in(pool, source, &slabs, options)?;
    let mesh = MeshBuffer::merge(parts)?;
    let ms = t0.elapsed().as_millis();
    log::info!(
        target: "perf",
        "ms={} mesh_parallel slabs={} quads={} dims=({}, {}, {})",
        ms,
        n,
        mesh.quad_count(),
        dims.x,
        dims.y,
        dims.z
    );
    Ok(mesh)
}

/// Meshes each slab as its own task and returns the partial meshes in slab order.
///
/// A panicking slab does not take the pool down: every failure is collected
/// and reported together.
pub fn build_slabs_in<S: VoxelSource + Sync + ?Sized>(
    pool: &ThreadPool,
    source: &S,
    slabs: &[Slab],
    options: &MeshOptions,
) -> Result<Vec<MeshBuffer>, MeshBuildError> {
    let results: Vec<Result<MeshBuffer, SlabFailure>> = pool.install(|| {
        slabs
            .par_iter()
            .map(|&slab| {
                panic::catch_unwind(AssertUnwindSafe(|| build_slab(source, slab, options))).map_err(
                    |payload| SlabFailure {
                        slab,
                        message: panic_message(payload.as_ref()),
                    },
                )
            })
            .collect()
    });
    let mut parts = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for r in results {
        match r {
            Ok(m) => parts.push(m),
            Err(f) => {
                log::error!(
                    target: "mesh",
                    "slab {} z=[{}, {}) panicked: {}",
                    f.slab.index,
                    f.slab.start,
                    f.slab.end,
                    f.message
                );
                failures.push(f);
            }
        }
    }
    if failures.is_empty() {
        Ok(parts)
    } else {
        Err(MeshBuildError::WorkerPanicked { failures })
    }
}
