use proptest::prelude::*;
use vox_blocks::VoxelType;
use vox_mesh_cpu::{MeshOptions, build_parallel_in, build_single};
use vox_volume::{VolumeDims, VoxelVolume};

fn volume() -> impl Strategy<Value = VoxelVolume> {
    (1usize..6, 1usize..6, 1usize..7).prop_flat_map(|(x, y, z)| {
        prop::collection::vec(0u8..4, x * y * z).prop_map(move |codes| {
            // 0 => air, otherwise one of three solid types.
            let voxels = codes
                .into_iter()
                .map(|c| if c == 0 { VoxelType::AIR } else { VoxelType(c + 1) })
                .collect();
            VoxelVolume::from_voxels(VolumeDims::new(x, y, z), 1.0, voxels)
        })
    })
}

/// Unit faces between a solid voxel and a non-solid neighbor.
fn exposed_faces(vol: &VoxelVolume) -> usize {
    let d = vol.dims();
    let mut n = 0;
    for z in 0..d.z as i32 {
        for y in 0..d.y as i32 {
            for x in 0..d.x as i32 {
                if !vol.get(x, y, z).is_solid() {
                    continue;
                }
                for (dx, dy, dz) in [
                    (1, 0, 0),
                    (-1, 0, 0),
                    (0, 1, 0),
                    (0, -1, 0),
                    (0, 0, 1),
                    (0, 0, -1),
                ] {
                    if !vol.get(x + dx, y + dy, z + dz).is_solid() {
                        n += 1;
                    }
                }
            }
        }
    }
    n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Merged quads cover exactly the exposed unit faces, however the volume is split.
    #[test]
    fn area_matches_exposed_faces(vol in volume(), workers in 1usize..6) {
        let opts = MeshOptions::default();
        let single = build_single(&vol, &opts);
        let want = exposed_faces(&vol) as f32;
        prop_assert!((single.surface_area() - want).abs() < 1e-3);
        prop_assert!(single.quad_count() <= exposed_faces(&vol));

        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let par = build_parallel_in(&pool, &vol, workers, &opts).unwrap();
        prop_assert!((par.surface_area() - want).abs() < 1e-3);
        prop_assert!(par.quad_count() >= single.quad_count());
        prop_assert_eq!(par.bounds(), single.bounds());
        prop_assert!(par.validate().is_ok());
    }
}
