use std::fmt;

/// Voxel type code.
///
/// The set of codes is open: the five built-ins below are reserved, and any
/// other code is a valid solid type registered by the host. The mesher only
/// asks two questions of a voxel: whether it is solid, and whether two voxels
/// share a code.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct VoxelType(pub u8);

impl VoxelType {
    pub const NULL: VoxelType = VoxelType(0);
    pub const AIR: VoxelType = VoxelType(1);
    pub const STONE: VoxelType = VoxelType(2);
    pub const DIRT: VoxelType = VoxelType(3);
    pub const GRASS: VoxelType = VoxelType(4);

    /// The non-solid value returned for empty space and out-of-range reads.
    pub const SENTINEL: VoxelType = VoxelType::AIR;

    /// Codes below this value are reserved for the built-in types.
    pub const FIRST_CUSTOM: u8 = 5;

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, VoxelType::NULL | VoxelType::AIR)
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_CUSTOM
    }

    pub(crate) fn builtin_name(self) -> Option<&'static str> {
        match self {
            VoxelType::NULL => Some("null"),
            VoxelType::AIR => Some("air"),
            VoxelType::STONE => Some("stone"),
            VoxelType::DIRT => Some("dirt"),
            VoxelType::GRASS => Some("grass"),
            _ => None,
        }
    }
}

impl From<u8> for VoxelType {
    #[inline]
    fn from(code: u8) -> Self {
        VoxelType(code)
    }
}

impl fmt::Display for VoxelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "voxel#{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_null_and_air_are_non_solid() {
        assert!(!VoxelType::NULL.is_solid());
        assert!(!VoxelType::AIR.is_solid());
        assert!(!VoxelType::SENTINEL.is_solid());
        for code in 2..=u8::MAX {
            assert!(VoxelType(code).is_solid(), "code {code} should be solid");
        }
    }

    #[test]
    fn display_uses_builtin_names() {
        assert_eq!(VoxelType::GRASS.to_string(), "grass");
        assert_eq!(VoxelType(42).to_string(), "voxel#42");
    }
}
