use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use vox_mesh_cpu::MeshBuffer;

/// How queued meshes are handed to the consumer on each drain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    /// Every queued mesh, oldest first.
    Fifo,
    /// Only the newest mesh; older ones are discarded.
    #[default]
    LatestOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueuedMesh {
    pub rev: u64,
    pub mesh: MeshBuffer,
}

/// Multi-producer mesh hand-off. Producers push from any thread; a single
/// consumer drains.
pub struct MeshQueue {
    tx: Sender<QueuedMesh>,
    rx: Receiver<QueuedMesh>,
    dropped: AtomicUsize,
}

impl Default for MeshQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            dropped: AtomicUsize::new(0),
        }
    }

    pub fn enqueue(&self, rev: u64, mesh: MeshBuffer) {
        // The receiver lives in `self`, so the channel cannot be disconnected.
        let _ = self.tx.send(QueuedMesh { rev, mesh });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Meshes discarded by `LatestOnly` drains so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn drain(&self, policy: QueuePolicy) -> Vec<QueuedMesh> {
        let mut all: Vec<QueuedMesh> = self.rx.try_iter().collect();
        match policy {
            QueuePolicy::Fifo => all,
            QueuePolicy::LatestOnly => {
                let Some(pos) = all
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, q)| q.rev)
                    .map(|(i, _)| i)
                else {
                    return all;
                };
                let skipped = all.len() - 1;
                if skipped > 0 {
                    self.dropped.fetch_add(skipped, Ordering::Relaxed);
                    log::debug!(target: "runtime", "latest-only drain dropped {} older mesh(es)", skipped);
                }
                vec![all.swap_remove(pos)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_keeps_order() {
        let q = MeshQueue::new();
        for rev in [1, 2, 3] {
            q.enqueue(rev, MeshBuffer::new());
        }
        let revs: Vec<u64> = q.drain(QueuePolicy::Fifo).iter().map(|m| m.rev).collect();
        assert_eq!(revs, vec![1, 2, 3]);
        assert!(q.is_empty());
        assert_eq!(q.dropped(), 0);
    }

    #[test]
    fn latest_only_keeps_the_newest() {
        let q = MeshQueue::new();
        for rev in [4, 6, 5] {
            q.enqueue(rev, MeshBuffer::new());
        }
        let out = q.drain(QueuePolicy::LatestOnly);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rev, 6);
        assert_eq!(q.dropped(), 2);
        assert!(q.drain(QueuePolicy::LatestOnly).is_empty());
    }

    #[test]
    fn producers_on_other_threads() {
        let q = std::sync::Arc::new(MeshQueue::new());
        let handles: Vec<_> = (0..4u64)
            .map(|rev| {
                let q = q.clone();
                std::thread::spawn(move || q.enqueue(rev, MeshBuffer::new()))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(q.len(), 4);
        let mut revs: Vec<u64> = q.drain(QueuePolicy::Fifo).iter().map(|m| m.rev).collect();
        revs.sort();
        assert_eq!(revs, vec![0, 1, 2, 3]);
    }
}
