use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "tessel", version, about = "Mesh a generated voxel landscape chunk by chunk")]
pub struct Args {
    /// Mesher config (TOML); defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "assets/voxels/blocks.toml")]
    pub blocks: PathBuf,

    #[arg(long, default_value = "assets/voxels/materials.toml")]
    pub materials: PathBuf,

    /// Chunks per side of the square demo area.
    #[arg(long, default_value_t = 2)]
    pub chunks: i32,

    /// Volume height in blocks.
    #[arg(long, default_value_t = 64)]
    pub height: usize,

    /// Worker threads (default: available parallelism).
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long, default_value_t = 1337)]
    pub seed: u64,

    /// Fraction of grass columns that grow a plant.
    #[arg(long, default_value_t = 0.35)]
    pub plant_density: f32,

    /// Generate smooth-light samples so faces pick their alternate triangulation.
    #[arg(long)]
    pub smooth: bool,

    /// Viewer distance used to report which LOD level is selected.
    #[arg(long, default_value_t = 100.0)]
    pub view_distance: f32,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}
