//! CPU meshing crate: greedy face merging over a voxel volume, single-threaded
//! or split into Z slabs on a rayon pool.
#![forbid(unsafe_code)]

mod debug;
mod emit;
mod face;
mod greedy;
mod mask;
mod mesh_build;
mod parallel;
mod slab;

pub use debug::{SLAB_PALETTE, SlabBox, slab_overlay};
pub use emit::emit_quad;
pub use face::{Face, Winding};
pub use greedy::greedy_rects;
pub use mask::{FaceMask, FaceMaskCell};
pub use mesh_build::{InvalidMesh, MAX_VERTICES, MeshBuffer};
pub use parallel::{
    MeshBuildError, MeshStats, SlabFailure, build_parallel, build_parallel_in, build_slabs_in,
    resolve_workers,
};
pub use slab::{Slab, partition_slabs};

use serde::{Deserialize, Serialize};
use vox_geom::Vec3;
use vox_volume::{VolumeDims, VoxelSource};

/// Where voxel `(0,0,0)`'s minimum corner lands in mesh space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshOrigin {
    /// Mesh space starts at the volume's minimum corner.
    #[default]
    Corner,
    /// The volume is centered on X and Y; Z still starts at zero.
    CenteredXY,
}

impl MeshOrigin {
    /// Translation added to every vertex.
    pub fn offset(self, dims: VolumeDims, scale: f32) -> Vec3 {
        match self {
            MeshOrigin::Corner => Vec3::ZERO,
            MeshOrigin::CenteredXY => Vec3::new(
                -(dims.x as f32) * scale * 0.5,
                -(dims.y as f32) * scale * 0.5,
                0.0,
            ),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshOptions {
    pub origin: MeshOrigin,
}

impl MeshOptions {
    pub fn with_origin(origin: MeshOrigin) -> Self {
        Self { origin }
    }
}

/// Meshes the faces owned by voxels whose Z lies in `slab`.
///
/// Runs the six directional passes in `Face::ALL` order. Z passes sweep only
/// the slab's depths; X and Y passes sweep their full axis but ignore cells
/// outside the slab. Neighbor reads still see the whole volume, so a face on
/// a slab boundary is emitted once, by the slab that owns its solid voxel.
pub fn build_slab<S: VoxelSource + ?Sized>(
    source: &S,
    slab: Slab,
    options: &MeshOptions,
) -> MeshBuffer {
    let dims = source.dims();
    let slab = slab.clip(dims.z);
    if dims.is_empty() || slab.is_empty() {
        return MeshBuffer::new();
    }
    let scale = source.voxel_scale();
    let offset = options.origin.offset(dims, scale);
    let mut mesh =
        MeshBuffer::with_quad_capacity((dims.x * dims.y + slab.len() * (dims.x + dims.y)) / 4);
    let mut mask = FaceMask::default();
    for face in Face::ALL {
        let a = face.axis();
        let (a1, a2) = face.plane_axes();
        let depths = if a == 2 {
            slab.start..slab.end
        } else {
            0..dims.get(a)
        };
        for d in depths {
            mask.fill(source, face, d, slab);
            greedy_rects(&mut mask, |v1, v2, w, h, _ty| {
                let mut cell = [0.0f32; 3];
                cell[a] = d as f32;
                cell[a1] = v1 as f32;
                cell[a2] = v2 as f32;
                let corner = offset + Vec3::new(cell[0], cell[1], cell[2]) * scale;
                emit_quad(&mut mesh, face, corner, w, h, scale);
            });
        }
    }
    log::trace!(
        target: "mesh",
        "slab {} z=[{}, {}) quads={}",
        slab.index,
        slab.start,
        slab.end,
        mesh.quad_count()
    );
    mesh
}

/// Meshes the whole volume on the calling thread.
pub fn build_single<S: VoxelSource + ?Sized>(source: &S, options: &MeshOptions) -> MeshBuffer {
    build_slab(source, Slab::full(source.dims().z), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_offset_only_moves_x_and_y() {
        let dims = VolumeDims::new(4, 6, 8);
        assert_eq!(MeshOrigin::Corner.offset(dims, 10.0), Vec3::ZERO);
        assert_eq!(
            MeshOrigin::CenteredXY.offset(dims, 10.0),
            Vec3::new(-20.0, -30.0, 0.0)
        );
    }
}
