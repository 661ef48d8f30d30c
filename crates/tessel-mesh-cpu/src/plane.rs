use serde::{Deserialize, Serialize};
use tessel_blocks::{BlockId, FaceDirection};
use tessel_chunk::SmoothSample;
use tessel_geom::Vec3;

use crate::face::GeometryId;

/// One visible face produced by extraction. `pos` is in global block units.
#[derive(Clone, Debug, PartialEq)]
pub enum Plane {
    /// Crossed billboard; shading comes from the geometry itself.
    Plant {
        geometry: GeometryId,
        pos: Vec3,
        face: FaceDirection,
        block: BlockId,
    },
    Solid {
        geometry: GeometryId,
        pos: Vec3,
        face: FaceDirection,
        block: BlockId,
        light: u8,
        smooth: Option<SmoothSample>,
    },
}

impl Plane {
    #[inline]
    pub fn geometry(&self) -> GeometryId {
        match self {
            Plane::Plant { geometry, .. } | Plane::Solid { geometry, .. } => *geometry,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        match self {
            Plane::Plant { pos, .. } | Plane::Solid { pos, .. } => *pos,
        }
    }

    #[inline]
    pub fn face(&self) -> FaceDirection {
        match self {
            Plane::Plant { face, .. } | Plane::Solid { face, .. } => *face,
        }
    }

    #[inline]
    pub fn block(&self) -> BlockId {
        match self {
            Plane::Plant { block, .. } | Plane::Solid { block, .. } => *block,
        }
    }

    #[inline]
    pub fn material_key(&self) -> MaterialKey {
        MaterialKey {
            block: self.block(),
            geometry: self.geometry(),
            face: self.face(),
        }
    }
}

/// Lookup key for the material of one merged face group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialKey {
    pub block: BlockId,
    pub geometry: GeometryId,
    pub face: FaceDirection,
}
