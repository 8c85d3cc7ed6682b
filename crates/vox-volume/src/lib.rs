//! Dense voxel grid and the read interface the mesher consumes.
#![forbid(unsafe_code)]

use vox_blocks::VoxelType;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VolumeDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl VolumeDims {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Builds dimensions from signed extents; negative components become zero.
    pub fn from_signed(x: i32, y: i32, z: i32) -> Self {
        let clamp = |v: i32| usize::try_from(v).unwrap_or(0);
        Self::new(clamp(x), clamp(y), clamp(z))
    }

    /// True when any component is zero; such a volume meshes to nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.x * self.y * self.z
    }

    /// Extent along `axis` (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn get(&self, axis: usize) -> usize {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.x
            && (y as usize) < self.y
            && (z as usize) < self.z
    }
}

/// Read access to a voxel grid.
///
/// Out-of-range coordinates must read as [`VoxelType::SENTINEL`]; callers rely
/// on that instead of bounds checks at the grid edge.
pub trait VoxelSource {
    fn voxel(&self, x: i32, y: i32, z: i32) -> VoxelType;
    fn dims(&self) -> VolumeDims;
    fn voxel_scale(&self) -> f32;
}

impl<T: VoxelSource + ?Sized> VoxelSource for &T {
    #[inline]
    fn voxel(&self, x: i32, y: i32, z: i32) -> VoxelType {
        (**self).voxel(x, y, z)
    }
    #[inline]
    fn dims(&self) -> VolumeDims {
        (**self).dims()
    }
    #[inline]
    fn voxel_scale(&self) -> f32 {
        (**self).voxel_scale()
    }
}

impl<T: VoxelSource + ?Sized> VoxelSource for std::sync::Arc<T> {
    #[inline]
    fn voxel(&self, x: i32, y: i32, z: i32) -> VoxelType {
        (**self).voxel(x, y, z)
    }
    #[inline]
    fn dims(&self) -> VolumeDims {
        (**self).dims()
    }
    #[inline]
    fn voxel_scale(&self) -> f32 {
        (**self).voxel_scale()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoxelVolume {
    dims: VolumeDims,
    scale: f32,
    voxels: Vec<VoxelType>,
}

impl VoxelVolume {
    /// An all-air volume.
    pub fn new(dims: VolumeDims, scale: f32) -> Self {
        Self::filled(dims, scale, VoxelType::AIR)
    }

    pub fn filled(dims: VolumeDims, scale: f32, ty: VoxelType) -> Self {
        Self {
            dims,
            scale,
            voxels: vec![ty; dims.volume()],
        }
    }

    /// Wraps existing voxel data; a wrong-sized vector is truncated or padded with air.
    pub fn from_voxels(dims: VolumeDims, scale: f32, voxels: Vec<VoxelType>) -> Self {
        let mut v = voxels;
        let expect = dims.volume();
        if v.len() != expect {
            v.resize(expect, VoxelType::AIR);
        }
        Self {
            dims,
            scale,
            voxels: v,
        }
    }

    #[inline]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims.x + z * self.dims.x * self.dims.y
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> VoxelType {
        self.voxels[self.idx(x, y, z)]
    }

    /// Reads a voxel; out-of-range coordinates return the sentinel.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> VoxelType {
        if !self.dims.contains(x, y, z) {
            return VoxelType::SENTINEL;
        }
        self.get_local(x as usize, y as usize, z as usize)
    }

    /// Writes a voxel; returns `false` and leaves the grid untouched when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, ty: VoxelType) -> bool {
        if !self.dims.contains(x, y, z) {
            return false;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.voxels[i] = ty;
        true
    }

    #[inline]
    pub fn has_solid(&self) -> bool {
        self.voxels.iter().any(|v| v.is_solid())
    }

    #[inline]
    pub fn voxels(&self) -> &[VoxelType] {
        &self.voxels
    }
}

impl VoxelSource for VoxelVolume {
    #[inline]
    fn voxel(&self, x: i32, y: i32, z: i32) -> VoxelType {
        self.get(x, y, z)
    }

    #[inline]
    fn dims(&self) -> VolumeDims {
        self.dims
    }

    #[inline]
    fn voxel_scale(&self) -> f32 {
        self.scale
    }
}
