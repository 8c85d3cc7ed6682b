use clap::ValueEnum;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use vox_blocks::VoxelType;
use vox_volume::{VolumeDims, VoxelVolume};

/// Demo volumes for the CLI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// Every cell filled.
    Solid,
    /// Ball inscribed in the volume.
    Sphere,
    /// Noise heightmap: stone, then dirt, with a grass top.
    Terrain,
    /// Alternating filled and empty cells; nothing merges.
    Checker,
    /// Empty volume.
    Air,
}

const TOPSOIL: i32 = 3;

pub fn generate(shape: Shape, dims: VolumeDims, scale: f32, fill: VoxelType, seed: i32) -> VoxelVolume {
    match shape {
        Shape::Solid => VoxelVolume::filled(dims, scale, fill),
        Shape::Air => VoxelVolume::new(dims, scale),
        Shape::Sphere => sphere(dims, scale, fill),
        Shape::Checker => checker(dims, scale, fill),
        Shape::Terrain => terrain(dims, scale, fill, seed),
    }
}

fn sphere(dims: VolumeDims, scale: f32, fill: VoxelType) -> VoxelVolume {
    let mut vol = VoxelVolume::new(dims, scale);
    let c = [dims.x as f32 * 0.5, dims.y as f32 * 0.5, dims.z as f32 * 0.5];
    let r = c[0].min(c[1]).min(c[2]);
    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                let dx = x as f32 + 0.5 - c[0];
                let dy = y as f32 + 0.5 - c[1];
                let dz = z as f32 + 0.5 - c[2];
                if dx * dx + dy * dy + dz * dz <= r * r {
                    vol.set(x as i32, y as i32, z as i32, fill);
                }
            }
        }
    }
    vol
}

fn checker(dims: VolumeDims, scale: f32, fill: VoxelType) -> VoxelVolume {
    let mut vol = VoxelVolume::new(dims, scale);
    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                if (x + y + z) % 2 == 0 {
                    vol.set(x as i32, y as i32, z as i32, fill);
                }
            }
        }
    }
    vol
}

/// Heightmap over X/Y with Z up. `deep` fills below the topsoil.
fn terrain(dims: VolumeDims, scale: f32, deep: VoxelType, seed: i32) -> VoxelVolume {
    let mut vol = VoxelVolume::new(dims, scale);
    if dims.is_empty() {
        return vol;
    }
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(0.03));
    let dz = dims.z as f32;
    for y in 0..dims.y {
        for x in 0..dims.x {
            let n = (noise.get_noise_2d(x as f32, y as f32) + 1.0) * 0.5;
            let h = ((0.2 + 0.6 * n) * dz).round() as i32;
            let h = h.clamp(1, dims.z as i32);
            for z in 0..h {
                let ty = if z == h - 1 {
                    VoxelType::GRASS
                } else if z >= h - 1 - TOPSOIL {
                    VoxelType::DIRT
                } else {
                    deep
                };
                vol.set(x as i32, y as i32, z, ty);
            }
        }
    }
    vol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_has_no_two_adjacent_solids() {
        let vol = generate(Shape::Checker, VolumeDims::new(3, 3, 3), 1.0, VoxelType::STONE, 0);
        assert!(vol.get(0, 0, 0).is_solid());
        assert!(!vol.get(1, 0, 0).is_solid());
        assert!(vol.get(1, 1, 0).is_solid());
    }

    #[test]
    fn terrain_columns_are_grass_topped() {
        let dims = VolumeDims::new(8, 8, 16);
        let vol = generate(Shape::Terrain, dims, 1.0, VoxelType::STONE, 1337);
        for y in 0..8 {
            for x in 0..8 {
                assert!(vol.get(x, y, 0).is_solid());
                let top = (0..16).rev().find(|&z| vol.get(x, y, z).is_solid());
                assert_eq!(top.map(|z| vol.get(x, y, z)), Some(VoxelType::GRASS));
            }
        }
    }

    #[test]
    fn sphere_is_symmetric() {
        let vol = generate(Shape::Sphere, VolumeDims::new(6, 6, 6), 1.0, VoxelType::DIRT, 0);
        assert!(vol.get(3, 3, 3).is_solid());
        assert!(!vol.get(0, 0, 0).is_solid());
        assert_eq!(vol.get(1, 2, 3), vol.get(4, 3, 2));
    }
}
