use std::sync::Arc;

use vox_blocks::VoxelType;
use vox_edit::{EditOutcome, modify_voxel};
use vox_mesh_cpu::MeshOptions;
use vox_volume::VoxelVolume;

use crate::queue::{MeshQueue, QueuePolicy};
use crate::sink::MeshApplySink;
use crate::{MeshJob, Runtime};

/// An editable volume whose mesh is rebuilt in the background.
///
/// Edits bump the revision and schedule a rebuild. Jobs mesh a shared snapshot
/// of the volume; the first edit after a submit copies the grid instead of
/// mutating data a worker may be reading.
pub struct VoxModel {
    volume: Arc<VoxelVolume>,
    rev: u64,
    last_applied: Option<u64>,
    options: MeshOptions,
    policy: QueuePolicy,
    runtime: Runtime,
    queue: MeshQueue,
}

impl VoxModel {
    pub fn new(
        volume: VoxelVolume,
        runtime: Runtime,
        options: MeshOptions,
        policy: QueuePolicy,
    ) -> Self {
        Self {
            volume: Arc::new(volume),
            rev: 0,
            last_applied: None,
            options,
            policy,
            runtime,
            queue: MeshQueue::new(),
        }
    }

    #[inline]
    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.rev
    }

    /// Revision of the mesh most recently handed to a sink.
    #[inline]
    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    #[inline]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Schedules a mesh build of the current revision.
    pub fn rebuild(&mut self) {
        log::debug!(target: "runtime", "rebuild rev={}", self.rev);
        self.runtime.submit(MeshJob {
            rev: self.rev,
            source: self.volume.clone(),
            options: self.options,
        });
    }

    /// Applies a spherical brush edit and schedules a rebuild if anything changed.
    pub fn modify_voxel(
        &mut self,
        center: (i32, i32, i32),
        ty: VoxelType,
        radius: i32,
    ) -> EditOutcome {
        let (x, y, z) = center;
        // A rejected edit must not copy a snapshot that a queued job still shares.
        if !self.volume.dims().contains(x, y, z) {
            return EditOutcome::Rejected;
        }
        let outcome = modify_voxel(Arc::make_mut(&mut self.volume), center, ty, radius);
        if outcome.triggers_rebuild() {
            self.rev += 1;
            self.rebuild();
        }
        outcome
    }

    /// Hands finished meshes to `sink` and returns how many were applied.
    ///
    /// Results older than the last applied revision are dropped. Failed builds
    /// are logged and skipped; the previously applied mesh stays current.
    pub fn apply_mesh<K: MeshApplySink + ?Sized>(&mut self, sink: &mut K) -> usize {
        for out in self.runtime.drain_worker_results() {
            match out.result {
                Ok(mesh) => self.queue.enqueue(out.rev, mesh),
                Err(e) => {
                    log::error!(target: "runtime", "dropping failed build rev={}: {}", out.rev, e)
                }
            }
        }
        let mut applied = 0;
        for entry in self.queue.drain(self.policy) {
            if let Some(last) = self.last_applied
                && entry.rev < last
            {
                log::debug!(
                    target: "runtime",
                    "stale mesh rev={} dropped (applied rev={})",
                    entry.rev,
                    last
                );
                continue;
            }
            sink.apply_mesh(entry.rev, &entry.mesh);
            self.last_applied = Some(entry.rev);
            applied += 1;
        }
        applied
    }

    /// Blocks until every scheduled build has finished.
    pub fn wait_idle(&self) {
        self.runtime.wait_idle();
    }
}
