//! CPU chunk meshing: face extraction, fragment merging, and LOD assembly.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod builder;
pub mod config;
mod constants;
pub mod error;
pub mod extract;
pub mod face;
pub mod geometry;
pub mod mesh_build;
pub mod plane;

pub use assemble::{Lod, LodLevel, MaterialFn, MaterialProvider, Mesh, assemble_mesh};
pub use builder::{MeshData, SerializedGeometry, build_mesh_data, merge_planes};
pub use config::{LodConfig, MeshConfig};
pub use constants::LIGHT_MAX;
pub use error::MeshError;
pub use extract::{PlantJitter, PlantLookup, ScatterPlants, extract_planes};
pub use face::{Face, GeometryId};
pub use geometry::{BakedGeometry, GeometryFragment, GeometryProvider};
pub use mesh_build::{Group, MeshBuild};
pub use plane::{MaterialKey, Plane};

use tessel_blocks::BlockClass;
use tessel_chunk::{ChunkOrigin, LightVolume, SmoothLightVolume, VoxelVolume};

/// Read-only inputs for meshing one chunk.
#[derive(Clone, Copy, Debug)]
pub struct ChunkInputs<'a> {
    pub voxels: &'a VoxelVolume,
    pub light: &'a LightVolume,
    pub smooth: &'a SmoothLightVolume,
    pub origin: ChunkOrigin,
}

/// Extract and build in one call; `Ok(None)` when the chunk has no visible faces.
pub fn mesh_chunk<P, C, G>(
    inputs: ChunkInputs<'_>,
    plants: &P,
    blocks: &C,
    geometry: &G,
    cfg: &MeshConfig,
) -> Result<Option<MeshData>, MeshError>
where
    P: PlantLookup + ?Sized,
    C: BlockClass + ?Sized,
    G: GeometryProvider + ?Sized,
{
    let planes = extract_planes(
        inputs.voxels,
        inputs.light,
        inputs.smooth,
        inputs.origin,
        plants,
        blocks,
        cfg,
    );
    build_mesh_data(&planes, geometry, &cfg.transform())
}
