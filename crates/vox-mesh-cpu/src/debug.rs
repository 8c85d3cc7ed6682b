use vox_geom::{Aabb, Vec3};
use vox_volume::VolumeDims;

use crate::MeshOrigin;
use crate::slab::{Slab, partition_slabs};

/// Per-slab colors, cycled by slab index.
pub const SLAB_PALETTE: [[u8; 4]; 8] = [
    [255, 0, 0, 255],     // red
    [0, 255, 0, 255],     // green
    [0, 0, 255, 255],     // blue
    [255, 255, 0, 255],   // yellow
    [255, 0, 255, 255],   // magenta
    [0, 255, 255, 255],   // cyan
    [255, 165, 0, 255],   // orange
    [128, 0, 128, 255],   // purple
];

/// Mesh-space box covering one slab, for debug overlays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlabBox {
    pub slab: Slab,
    pub bounds: Aabb,
    pub color: [u8; 4],
}

/// Boxes outlining how a volume of `dims` is split across `workers` slabs.
/// Empty slabs are omitted.
pub fn slab_overlay(
    dims: VolumeDims,
    scale: f32,
    workers: usize,
    origin: MeshOrigin,
) -> Vec<SlabBox> {
    if dims.is_empty() {
        return Vec::new();
    }
    let offset = origin.offset(dims, scale);
    partition_slabs(dims.z, workers)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|slab| SlabBox {
            slab,
            bounds: Aabb::new(
                offset + Vec3::new(0.0, 0.0, slab.start as f32 * scale),
                offset
                    + Vec3::new(
                        dims.x as f32 * scale,
                        dims.y as f32 * scale,
                        slab.end as f32 * scale,
                    ),
            ),
            color: SLAB_PALETTE[slab.index % SLAB_PALETTE.len()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_stack_along_z() {
        let boxes = slab_overlay(VolumeDims::new(2, 2, 10), 1.0, 3, MeshOrigin::Corner);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0].bounds.min, Vec3::ZERO);
        assert_eq!(boxes[2].bounds.max, Vec3::new(2.0, 2.0, 10.0));
        assert_eq!(boxes[1].bounds.min.z, boxes[0].bounds.max.z);
        assert_eq!(boxes[1].color, SLAB_PALETTE[1]);
    }

    #[test]
    fn colors_cycle_past_the_palette() {
        let boxes = slab_overlay(VolumeDims::new(1, 1, 9), 1.0, 9, MeshOrigin::Corner);
        assert_eq!(boxes.len(), 9);
        assert_eq!(boxes[8].color, SLAB_PALETTE[0]);
    }

    #[test]
    fn empty_slabs_are_skipped() {
        let boxes = slab_overlay(VolumeDims::new(1, 1, 2), 1.0, 4, MeshOrigin::Corner);
        assert_eq!(boxes.len(), 2);
    }
}
