use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::MaterialId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
}

/// Named face materials. Ids are dense and follow sorted key order, so the
/// same catalog always yields the same ids.
#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
    by_key: HashMap<String, MaterialId>,
}

/// `materials.toml`: `materials = ["stone", "grass_top", ...]`.
#[derive(Deserialize)]
struct MaterialsFile {
    materials: Vec<String>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts and dedups `keys`, then numbers them from zero.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() > usize::from(u16::MAX) + 1 {
            return Err(format!("material catalog: {} keys exceed the u16 id range", keys.len()).into());
        }
        let materials: Vec<Material> = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| Material {
                id: MaterialId(i as u16),
                key,
            })
            .collect();
        let by_key = materials.iter().map(|m| (m.key.clone(), m.id)).collect();
        Ok(Self { materials, by_key })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let file: MaterialsFile = toml::from_str(toml_str)?;
        Self::from_keys(file.materials)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    #[inline]
    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    #[inline]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
