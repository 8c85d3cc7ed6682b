//! Voxel type codes and the name registry.
#![forbid(unsafe_code)]

pub mod registry;
pub mod types;

pub use registry::{RegistryError, VoxelRegistry};
pub use types::VoxelType;
