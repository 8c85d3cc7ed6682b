use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::VoxelType;

#[derive(Debug)]
pub enum RegistryError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    DuplicateName(String),
    DuplicateCode(u8),
    ReservedCode { name: String, code: u8 },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Io(e) => write!(f, "registry read error: {}", e),
            RegistryError::Parse(e) => write!(f, "registry parse error: {}", e),
            RegistryError::DuplicateName(name) => write!(f, "duplicate voxel name '{}'", name),
            RegistryError::DuplicateCode(code) => write!(f, "duplicate voxel code {}", code),
            RegistryError::ReservedCode { name, code } => write!(
                f,
                "voxel '{}' uses reserved code {} (custom codes start at {})",
                name,
                code,
                VoxelType::FIRST_CUSTOM
            ),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Io(e) => Some(e),
            RegistryError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        RegistryError::Io(e)
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(e: toml::de::Error) -> Self {
        RegistryError::Parse(e)
    }
}

#[derive(Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub voxels: Vec<VoxelDef>,
}

#[derive(Deserialize)]
pub struct VoxelDef {
    pub name: String,
    pub code: u8,
}

/// Name <-> code table for voxel types.
#[derive(Clone, Debug)]
pub struct VoxelRegistry {
    by_name: HashMap<String, VoxelType>,
    names: Vec<Option<String>>,
}

impl Default for VoxelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VoxelRegistry {
    /// Registry holding only the reserved built-in types.
    pub fn builtin() -> Self {
        let mut reg = Self {
            by_name: HashMap::new(),
            names: vec![None; usize::from(u8::MAX) + 1],
        };
        for code in 0..VoxelType::FIRST_CUSTOM {
            let ty = VoxelType(code);
            if let Some(name) = ty.builtin_name() {
                reg.by_name.insert(name.to_string(), ty);
                reg.names[usize::from(code)] = Some(name.to_string());
            }
        }
        reg
    }

    pub fn register(&mut self, name: &str, code: u8) -> Result<VoxelType, RegistryError> {
        let ty = VoxelType(code);
        if ty.is_builtin() {
            return Err(RegistryError::ReservedCode {
                name: name.to_string(),
                code,
            });
        }
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        if self.names[usize::from(code)].is_some() {
            return Err(RegistryError::DuplicateCode(code));
        }
        self.by_name.insert(name.to_string(), ty);
        self.names[usize::from(code)] = Some(name.to_string());
        Ok(ty)
    }

    /// Built-ins extended with the `[[voxels]]` entries of a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: RegistryConfig = toml::from_str(toml_str)?;
        let mut reg = Self::builtin();
        for def in cfg.voxels {
            reg.register(&def.name, def.code)?;
        }
        Ok(reg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn code_of(&self, name: &str) -> Option<VoxelType> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, ty: VoxelType) -> Option<&str> {
        self.names[usize::from(ty.code())].as_deref()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered types in code order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelType, &str)> {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(code, name)| name.as_deref().map(|n| (VoxelType(code as u8), n)))
    }
}
