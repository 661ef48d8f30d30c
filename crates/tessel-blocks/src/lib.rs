//! Block catalog: ids, classification flags, and face materials.
#![forbid(unsafe_code)]

pub mod class;
pub mod config;
pub mod material;
pub mod registry;
pub mod types;

pub use class::BlockClass;
pub use material::MaterialCatalog;
pub use registry::BlockRegistry;
pub use types::{AIR, BlockId, FaceDirection, MaterialId};
