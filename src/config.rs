use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use vox_edit::DEFAULT_BRUSH_RADIUS;
use vox_mesh_cpu::MeshOrigin;
use vox_runtime::QueuePolicy;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "voxmesh.toml";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mesher: MesherConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Optional `[[voxels]]` registry file with extra voxel types.
    #[serde(default)]
    pub voxels: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MesherConfig {
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_voxel_scale")]
    pub voxel_scale: f32,
    #[serde(default)]
    pub origin: MeshOrigin,
}
fn default_voxel_scale() -> f32 {
    10.0
}
impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            voxel_scale: default_voxel_scale(),
            origin: MeshOrigin::Corner,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub queue_policy: QueuePolicy,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EditConfig {
    #[serde(default = "default_brush_radius")]
    pub brush_radius: i32,
}
fn default_brush_radius() -> i32 {
    DEFAULT_BRUSH_RADIUS
}
impl Default for EditConfig {
    fn default() -> Self {
        Self {
            brush_radius: default_brush_radius(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogConfig {
    /// `env_logger` filter string, e.g. `"info"` or `"warn,perf=info"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Config = toml::from_str(s).map_err(|e| format!("parse error: {}", e))?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("read error {}: {}", path.display(), e))?;
        Self::from_toml_str(&s)
    }

    /// Loads `path` if given, else `voxmesh.toml` when present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                let p = Path::new(DEFAULT_CONFIG_FILE);
                if p.exists() {
                    Self::load_from_path(p)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.mesher.workers, 0);
        assert_eq!(cfg.mesher.voxel_scale, 10.0);
        assert_eq!(cfg.mesher.origin, MeshOrigin::Corner);
        assert_eq!(cfg.runtime.queue_policy, QueuePolicy::LatestOnly);
        assert_eq!(cfg.edit.brush_radius, 8);
        assert_eq!(cfg.log.level, "info");
        assert!(cfg.voxels.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            voxels = "assets/voxels.toml"
            [mesher]
            workers = 3
            origin = "centered_xy"
            [runtime]
            queue_policy = "fifo"
            [edit]
            brush_radius = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mesher.workers, 3);
        assert_eq!(cfg.mesher.voxel_scale, 10.0);
        assert_eq!(cfg.mesher.origin, MeshOrigin::CenteredXY);
        assert_eq!(cfg.runtime.queue_policy, QueuePolicy::Fifo);
        assert_eq!(cfg.edit.brush_radius, 2);
        assert_eq!(cfg.voxels, Some(PathBuf::from("assets/voxels.toml")));
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Config::from_toml_str("[runtime]\nqueue_policy = \"random\"").is_err());
    }
}
