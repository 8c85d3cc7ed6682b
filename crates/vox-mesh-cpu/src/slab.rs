/// Half-open Z range `[start, end)` meshed by one worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slab {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Slab {
    pub const fn new(index: usize, start: usize, end: usize) -> Self {
        Self { index, start, end }
    }

    /// The single slab covering `[0, dim_z)`.
    pub const fn full(dim_z: usize) -> Self {
        Self::new(0, 0, dim_z)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, z: usize) -> bool {
        z >= self.start && z < self.end
    }

    /// Clamps the range to a volume of depth `dim_z`.
    pub fn clip(self, dim_z: usize) -> Slab {
        let end = self.end.min(dim_z);
        Slab::new(self.index, self.start.min(end), end)
    }
}

/// Splits `[0, dim_z)` into `workers` contiguous slabs.
///
/// Each slab spans `max(1, dim_z / workers)` layers and the last one absorbs
/// the remainder. When `dim_z < workers` the trailing slabs come out empty.
/// A worker count of zero is treated as one.
pub fn partition_slabs(dim_z: usize, workers: usize) -> Vec<Slab> {
    let n = workers.max(1);
    let size = (dim_z / n).max(1);
    (0..n)
        .map(|i| {
            let start = (i * size).min(dim_z);
            let end = if i + 1 == n {
                dim_z
            } else {
                (start + size).min(dim_z)
            };
            Slab::new(i, start, end)
        })
        .collect()
}
