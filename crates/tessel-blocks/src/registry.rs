use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::class::BlockClass;
use super::config::{BlocksConfig, MaterialsDef};
use super::material::MaterialCatalog;
use super::types::{AIR, BlockId, FaceDirection, MaterialId};

#[derive(Default, Clone, Debug)]
pub struct CompiledMaterials {
    pub all: Option<MaterialId>,
    pub top: Option<MaterialId>,
    pub bottom: Option<MaterialId>,
    pub side: Option<MaterialId>,
}

impl CompiledMaterials {
    #[inline]
    pub fn material_for(&self, dir: FaceDirection) -> Option<MaterialId> {
        match dir {
            FaceDirection::Top => self.top.or(self.all),
            FaceDirection::Bottom => self.bottom.or(self.all),
            FaceDirection::Side => self.side.or(self.all),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub plant: bool,
    pub transparent: bool,
    pub liquid: bool,
    pub materials: CompiledMaterials,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            plant: false,
            transparent: false,
            liquid: false,
            materials: CompiledMaterials::default(),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub materials: MaterialCatalog,
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn load_from_paths(
        materials_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_path(materials_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_configs(
        materials: MaterialCatalog,
        cfg: BlocksConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            materials,
            blocks: Vec::new(),
            by_name: HashMap::new(),
        };
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len().max(1) as BlockId);
            if id == AIR {
                return Err(format!("block `{}` uses the reserved air id 0", def.name).into());
            }
            let ty = BlockType {
                id,
                materials: compile_materials(&reg.materials, &def.name, def.materials),
                name: def.name,
                plant: def.plant.unwrap_or(false),
                transparent: def.transparent.unwrap_or(false),
                liquid: def.liquid.unwrap_or(false),
            };
            if reg.blocks.len() <= id as usize {
                while reg.blocks.len() <= id as usize {
                    let next = reg.blocks.len() as BlockId;
                    reg.blocks.push(BlockType::placeholder(next));
                }
            } else if !reg.blocks[id as usize].name.is_empty() {
                log::warn!(
                    "block id {} redefined: `{}` replaces `{}`",
                    id,
                    ty.name,
                    reg.blocks[id as usize].name
                );
            }
            reg.blocks[id as usize] = ty;
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();
        Ok(reg)
    }

    /// Material for a block face, or `None` when the block or its mapping is missing.
    #[inline]
    pub fn material_for(&self, id: BlockId, dir: FaceDirection) -> Option<MaterialId> {
        self.get(id)?.materials.material_for(dir)
    }
}

impl BlockClass for BlockRegistry {
    #[inline]
    fn is_plant(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.plant)
    }
    #[inline]
    fn is_transparent(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.transparent)
    }
    #[inline]
    fn is_liquid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|t| t.liquid)
    }
}

fn compile_materials(
    matcat: &MaterialCatalog,
    block: &str,
    mats: Option<MaterialsDef>,
) -> CompiledMaterials {
    let resolve = |key: Option<String>| -> Option<MaterialId> {
        let key = key?;
        let id = matcat.get_id(&key);
        if id.is_none() {
            log::warn!("block `{}` references unknown material `{}`", block, key);
        }
        id
    };
    let Some(m) = mats else {
        return CompiledMaterials::default();
    };
    CompiledMaterials {
        all: resolve(m.all),
        top: resolve(m.top),
        bottom: resolve(m.bottom),
        side: resolve(m.side),
    }
}
