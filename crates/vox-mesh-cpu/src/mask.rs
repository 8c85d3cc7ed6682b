use vox_blocks::VoxelType;
use vox_volume::VoxelSource;

use crate::face::Face;
use crate::slab::Slab;

/// One cell of a slice mask.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceMaskCell {
    pub active: bool,
    pub ty: VoxelType,
}

impl FaceMaskCell {
    pub const INACTIVE: FaceMaskCell = FaceMaskCell {
        active: false,
        ty: VoxelType::NULL,
    };

    /// True when `other` is active and can merge into a rectangle of type `ty`.
    #[inline]
    pub fn merges_with(self, ty: VoxelType) -> bool {
        self.active && self.ty == ty
    }
}

/// Exposure mask for one `(face, depth)` slice.
///
/// Rows run along the first in-plane axis (`V1`, `height` rows), columns along
/// the second (`V2`, `width` columns). The buffer is reused across slices.
#[derive(Clone, Debug, Default)]
pub struct FaceMask {
    width: usize,
    height: usize,
    cells: Vec<FaceMaskCell>,
}

impl FaceMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![FaceMaskCell::INACTIVE; width * height],
        }
    }

    /// Resizes to `width × height` and clears every cell.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, FaceMaskCell::INACTIVE);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn idx(&self, v1: usize, v2: usize) -> usize {
        v2 + v1 * self.width
    }

    #[inline]
    pub fn get(&self, v1: usize, v2: usize) -> FaceMaskCell {
        self.cells[self.idx(v1, v2)]
    }

    #[inline]
    pub fn set(&mut self, v1: usize, v2: usize, cell: FaceMaskCell) {
        let i = self.idx(v1, v2);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn deactivate(&mut self, v1: usize, v2: usize) {
        let i = self.idx(v1, v2);
        self.cells[i].active = false;
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.active).count()
    }

    /// Fills the mask for `face` at depth `d`, considering only voxels whose Z
    /// lies inside `slab`.
    ///
    /// A cell is active when its voxel is solid and the neighbor one step along
    /// the face normal is not. Neighbor reads go through `source`, so faces on a
    /// slab boundary see the voxels of the adjacent slab.
    pub fn fill<S: VoxelSource + ?Sized>(&mut self, source: &S, face: Face, d: usize, slab: Slab) {
        let dims = source.dims();
        let a = face.axis();
        let (a1, a2) = face.plane_axes();
        self.reset(dims.get(a2), dims.get(a1));
        let (nx, ny, nz) = face.delta();
        let mut pos = [0usize; 3];
        pos[a] = d;
        for v1 in 0..self.height {
            pos[a1] = v1;
            for v2 in 0..self.width {
                pos[a2] = v2;
                if !slab.contains(pos[2]) {
                    continue;
                }
                let (x, y, z) = (pos[0] as i32, pos[1] as i32, pos[2] as i32);
                let current = source.voxel(x, y, z);
                let next = source.voxel(x + nx, y + ny, z + nz);
                if current.is_solid() && !next.is_solid() {
                    let i = self.idx(v1, v2);
                    self.cells[i] = FaceMaskCell {
                        active: true,
                        ty: current,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_volume::{VolumeDims, VoxelVolume};

    fn column() -> VoxelVolume {
        // 1x1x3 column: stone, air, dirt.
        VoxelVolume::from_voxels(
            VolumeDims::new(1, 1, 3),
            1.0,
            vec![VoxelType::STONE, VoxelType::AIR, VoxelType::DIRT],
        )
    }

    #[test]
    fn positive_z_exposes_only_faces_owned_by_the_solid_side() {
        let vol = column();
        let slab = Slab::full(3);
        let mut mask = FaceMask::default();
        mask.fill(&vol, Face::PosZ, 0, slab);
        assert_eq!(mask.get(0, 0), FaceMaskCell { active: true, ty: VoxelType::STONE });
        // Air below dirt: that face belongs to the -Z pass.
        mask.fill(&vol, Face::PosZ, 1, slab);
        assert_eq!(mask.active_count(), 0);
        // Top of the volume reads the sentinel above.
        mask.fill(&vol, Face::PosZ, 2, slab);
        assert_eq!(mask.get(0, 0).ty, VoxelType::DIRT);
        assert!(mask.get(0, 0).active);
    }

    #[test]
    fn negative_z_sees_the_other_side() {
        let vol = column();
        let slab = Slab::full(3);
        let mut mask = FaceMask::default();
        mask.fill(&vol, Face::NegZ, 2, slab);
        assert!(mask.get(0, 0).merges_with(VoxelType::DIRT));
        mask.fill(&vol, Face::NegZ, 0, slab);
        assert!(mask.get(0, 0).merges_with(VoxelType::STONE));
    }

    #[test]
    fn x_sweep_is_clipped_to_the_slab() {
        let vol = VoxelVolume::filled(VolumeDims::new(1, 2, 4), 1.0, VoxelType::STONE);
        let mut mask = FaceMask::default();
        mask.fill(&vol, Face::PosX, 0, Slab::new(0, 1, 3));
        // Plane axes for X are (Y, Z): rows are Y, columns are Z.
        assert_eq!((mask.height(), mask.width()), (2, 4));
        for y in 0..2 {
            assert!(!mask.get(y, 0).active);
            assert!(mask.get(y, 1).active);
            assert!(mask.get(y, 2).active);
            assert!(!mask.get(y, 3).active);
        }
    }
}
