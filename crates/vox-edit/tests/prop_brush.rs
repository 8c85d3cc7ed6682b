use proptest::prelude::*;
use vox_blocks::VoxelType;
use vox_edit::{EditOutcome, SphereBrush, modify_voxel};
use vox_volume::{VolumeDims, VoxelVolume};

proptest! {
    // Exactly the cells within the radius change; everything else keeps its type.
    #[test]
    fn brush_changes_exactly_the_sphere(
        cx in 0i32..10, cy in 0i32..10, cz in 0i32..10, radius in 0i32..5,
    ) {
        let dims = VolumeDims::new(10, 10, 10);
        let mut vol = VoxelVolume::filled(dims, 1.0, VoxelType::STONE);
        let out = modify_voxel(&mut vol, (cx, cy, cz), VoxelType::GRASS, radius);
        let mut inside = 0usize;
        for z in 0..10 { for y in 0..10 { for x in 0..10 {
            let d2 = (x - cx).pow(2) + (y - cy).pow(2) + (z - cz).pow(2);
            let expect = if d2 <= radius * radius { VoxelType::GRASS } else { VoxelType::STONE };
            if d2 <= radius * radius { inside += 1; }
            prop_assert_eq!(vol.get(x, y, z), expect);
        }}}
        let cells: Vec<_> = SphereBrush::new(radius).cells((cx, cy, cz)).collect();
        let clipped = cells.iter().any(|&(x, y, z)| !dims.contains(x, y, z));
        prop_assert!(cells.len() >= inside);
        prop_assert_eq!(out, EditOutcome::Applied { written: inside, clipped });
    }

    // The brush lists each in-sphere cell exactly once.
    #[test]
    fn brush_cells_match_the_distance_test(radius in -2i32..7) {
        let cells: Vec<_> = SphereBrush::new(radius).cells((0, 0, 0)).collect();
        let mut want = Vec::new();
        for z in -radius..=radius { for y in -radius..=radius { for x in -radius..=radius {
            if x * x + y * y + z * z <= radius * radius { want.push((x, y, z)); }
        }}}
        prop_assert_eq!(cells, want);
    }
}
