//! Padded chunk volumes and chunk/world coordinate transforms.
#![forbid(unsafe_code)]

mod coords;
mod light;
mod voxels;

pub use coords::{ChunkOrigin, CoordTransform};
pub use light::{FACE_COUNT, LightVolume, SmoothLightVolume, SmoothSample};
pub use voxels::VoxelVolume;
