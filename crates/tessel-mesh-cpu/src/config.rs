use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessel_chunk::CoordTransform;

/// Immutable meshing parameters threaded through every stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Neighbor columns carried on each X/Z side of a voxel volume.
    pub padding: usize,
    /// Highest block row scanned (inclusive).
    pub max_world_height: usize,
    pub chunk_size: i32,
    /// World units per block edge.
    pub block_dimension: f32,
    pub lod: LodConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    pub levels: usize,
    pub step_distance: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            padding: 1,
            max_world_height: 255,
            chunk_size: 16,
            block_dimension: 1.0,
            lod: LodConfig::default(),
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            levels: 4,
            step_distance: 75.0,
        }
    }
}

impl MeshConfig {
    #[inline]
    pub fn transform(&self) -> CoordTransform {
        CoordTransform::new(self.chunk_size, self.block_dimension)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MeshConfig = toml::from_str(s)?;
        if cfg.padding == 0 {
            return Err("mesh config: padding must be at least 1".into());
        }
        if cfg.chunk_size <= 0 || cfg.block_dimension <= 0.0 {
            return Err("mesh config: chunk_size and block_dimension must be positive".into());
        }
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
