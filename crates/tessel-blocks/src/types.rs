use serde::{Deserialize, Serialize};

/// Block-type identifier as stored in voxel volumes.
pub type BlockId = u16;

pub const AIR: BlockId = 0;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

/// Coarse face orientation used to pick a block's material.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceDirection {
    Top,
    Side,
    Bottom,
}

impl FaceDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            FaceDirection::Top => "top",
            FaceDirection::Side => "side",
            FaceDirection::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for FaceDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
