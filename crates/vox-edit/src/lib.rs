//! Spherical brush edits applied to a voxel volume.
#![forbid(unsafe_code)]

use vox_blocks::VoxelType;
use vox_volume::VoxelVolume;

/// Brush radius used when the host does not pick one.
pub const DEFAULT_BRUSH_RADIUS: i32 = 8;

/// Result of a brush edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The center was outside the volume; nothing changed.
    Rejected,
    /// The brush was applied. `clipped` is set when part of the sphere fell
    /// outside the volume and was skipped.
    Applied { written: usize, clipped: bool },
}

impl EditOutcome {
    /// Whether the edit must be followed by a mesh rebuild.
    #[inline]
    pub fn triggers_rebuild(self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

/// Every cell within Euclidean distance `radius` of a center.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SphereBrush {
    pub radius: i32,
}

impl Default for SphereBrush {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
        }
    }
}

impl SphereBrush {
    pub fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// Absolute cell positions covered by the brush, in z/y/x order.
    ///
    /// Each row's X extent is solved directly, so only cells inside the
    /// sphere are produced.
    pub fn cells(self, center: (i32, i32, i32)) -> impl Iterator<Item = (i32, i32, i32)> {
        let r = i64::from(self.radius);
        let r2 = r * r;
        let (cx, cy, cz) = center;
        (-r..=r).flat_map(move |dz| {
            let ry = (r2 - dz * dz).isqrt();
            (-ry..=ry).flat_map(move |dy| {
                let rx = (r2 - dz * dz - dy * dy).isqrt();
                (-rx..=rx).map(move |dx| (cx + dx as i32, cy + dy as i32, cz + dz as i32))
            })
        })
    }
}

/// Sets every voxel within `radius` of `center` to `ty`.
///
/// A center outside the volume rejects the whole edit; brush cells that leave
/// the volume around an in-range center are skipped. Only the part of the
/// brush box inside the volume is visited, so the cost is bounded by the
/// volume size whatever the radius.
pub fn modify_voxel(
    volume: &mut VoxelVolume,
    center: (i32, i32, i32),
    ty: VoxelType,
    radius: i32,
) -> EditOutcome {
    let (x, y, z) = center;
    if !volume.dims().contains(x, y, z) {
        log::debug!(target: "edit", "edit at ({}, {}, {}) outside {:?}; ignored", x, y, z, volume.dims());
        return EditOutcome::Rejected;
    }
    if radius < 0 {
        return EditOutcome::Applied {
            written: 0,
            clipped: false,
        };
    }
    let dims = volume.dims();
    let r = i64::from(radius);
    let r2 = r * r;
    // Inclusive range of cells along one axis that are both in the brush box and in the volume.
    let span = |c: i32, extent: usize| {
        let c = i64::from(c);
        ((c - r).max(0), (c + r).min(extent as i64 - 1))
    };
    let (x0, x1) = span(x, dims.x);
    let (y0, y1) = span(y, dims.y);
    let (z0, z1) = span(z, dims.z);
    // The sphere's axis extremes are its farthest cells per axis, so it leaves
    // the volume exactly when the box is clamped on some side.
    let clipped = x0 > i64::from(x) - r
        || x1 < i64::from(x) + r
        || y0 > i64::from(y) - r
        || y1 < i64::from(y) + r
        || z0 > i64::from(z) - r
        || z1 < i64::from(z) + r;
    let mut written = 0usize;
    for wz in z0..=z1 {
        let dz = wz - i64::from(z);
        for wy in y0..=y1 {
            let dy = wy - i64::from(y);
            for wx in x0..=x1 {
                let dx = wx - i64::from(x);
                if dx * dx + dy * dy + dz * dz <= r2
                    && volume.set(wx as i32, wy as i32, wz as i32, ty)
                {
                    written += 1;
                }
            }
        }
    }
    log::debug!(
        target: "edit",
        "brush r={} at ({}, {}, {}) -> {} wrote={} clipped={}",
        radius, x, y, z, ty, written, clipped
    );
    EditOutcome::Applied { written, clipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_volume::VolumeDims;

    #[test]
    fn radius_zero_touches_only_center() {
        let cells: Vec<_> = SphereBrush::new(0).cells((4, 5, 6)).collect();
        assert_eq!(cells, vec![(4, 5, 6)]);
    }

    #[test]
    fn negative_radius_is_empty() {
        assert_eq!(SphereBrush::new(-2).cells((0, 0, 0)).count(), 0);
    }

    #[test]
    fn radius_one_is_a_plus_shape() {
        let cells: Vec<_> = SphereBrush::new(1).cells((0, 0, 0)).collect();
        assert_eq!(cells.len(), 7);
        assert!(cells.contains(&(0, 0, -1)));
        assert!(!cells.contains(&(1, 1, 0)));
    }

    #[test]
    fn radius_is_inclusive() {
        let cells: Vec<_> = SphereBrush::new(2).cells((0, 0, 0)).collect();
        assert!(cells.contains(&(2, 0, 0)));
        assert!(cells.contains(&(0, -2, 0)));
        assert!(!cells.contains(&(2, 1, 0)));
    }

    #[test]
    fn outside_center_is_rejected_and_untouched() {
        let mut vol = VoxelVolume::filled(VolumeDims::new(4, 4, 4), 1.0, VoxelType::STONE);
        let before = vol.clone();
        let out = modify_voxel(&mut vol, (4, 0, 0), VoxelType::AIR, 3);
        assert_eq!(out, EditOutcome::Rejected);
        assert!(!out.triggers_rebuild());
        assert_eq!(vol, before);
        assert_eq!(modify_voxel(&mut vol, (-1, 1, 1), VoxelType::AIR, 3), EditOutcome::Rejected);
    }

    #[test]
    fn brush_at_corner_skips_outside_cells() {
        let mut vol = VoxelVolume::filled(VolumeDims::new(4, 4, 4), 1.0, VoxelType::STONE);
        let out = modify_voxel(&mut vol, (0, 0, 0), VoxelType::AIR, 1);
        assert_eq!(out, EditOutcome::Applied { written: 4, clipped: true });
        assert!(out.triggers_rebuild());
        assert_eq!(vol.get(0, 0, 0), VoxelType::AIR);
        assert_eq!(vol.get(1, 0, 0), VoxelType::AIR);
        assert_eq!(vol.get(1, 1, 0), VoxelType::STONE);
    }

    #[test]
    fn interior_brush_is_not_clipped() {
        let mut vol = VoxelVolume::filled(VolumeDims::new(5, 5, 5), 1.0, VoxelType::STONE);
        let out = modify_voxel(&mut vol, (2, 2, 2), VoxelType::DIRT, 1);
        assert_eq!(out, EditOutcome::Applied { written: 7, clipped: false });
        assert_eq!(vol.get(2, 2, 3), VoxelType::DIRT);
    }

    #[test]
    fn huge_radius_covers_the_volume_without_overflow() {
        let mut vol = VoxelVolume::filled(VolumeDims::new(2, 2, 2), 1.0, VoxelType::STONE);
        let out = modify_voxel(&mut vol, (0, 0, 0), VoxelType::AIR, 50_000);
        assert_eq!(out, EditOutcome::Applied { written: 8, clipped: true });
        assert!(!vol.has_solid());
        let out = modify_voxel(&mut vol, (1, 1, 1), VoxelType::DIRT, i32::MAX);
        assert_eq!(out, EditOutcome::Applied { written: 8, clipped: true });
    }

    #[test]
    fn brush_cells_square_in_wide_integers() {
        // Offsets past 46340 would overflow an i32 square.
        let far = SphereBrush::new(50_000).cells((0, 0, 0)).take(1).collect::<Vec<_>>();
        assert_eq!(far, vec![(0, 0, -50_000)]);
    }
}
