use tessel_blocks::{BlockId, FaceDirection};
use thiserror::Error;

use crate::face::GeometryId;

/// Failures surfaced by the merge and assembly stages. None are retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The catalog has no material for a face that was meshed.
    #[error("no material for block {block} geometry `{geometry}` face `{face}`")]
    MissingMaterial {
        block: BlockId,
        geometry: GeometryId,
        face: FaceDirection,
    },

    #[error("failed to encode merged geometry: {0}")]
    Encode(String),

    #[error("failed to decode merged geometry: {0}")]
    Decode(String),

    /// Geometry groups and material keys must correspond one to one.
    #[error("geometry has {groups} groups but {keys} material keys")]
    GroupMismatch { groups: usize, keys: usize },

    #[error("merged geometry would exceed the u32 index range ({0} vertices)")]
    TooManyVertices(usize),
}
