mod cli;
mod demo;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tessel_blocks::config::BlocksConfig;
use tessel_blocks::{BlockRegistry, MaterialCatalog};
use tessel_chunk::ChunkOrigin;
use tessel_mesh_cpu::{BakedGeometry, MeshConfig, ScatterPlants, assemble_mesh};
use tessel_runtime::{MeshContext, MeshRuntime};

use crate::cli::Args;
use crate::demo::{DemoBlocks, terrain_job};

const BUILTIN_BLOCKS: &str = include_str!("../assets/voxels/blocks.toml");
const BUILTIN_MATERIALS: &str = include_str!("../assets/voxels/materials.toml");

#[derive(Serialize, Debug)]
struct ChunkReport {
    cx: i32,
    cz: i32,
    planes: usize,
    vertices: usize,
    triangles: usize,
    materials: usize,
    bytes: usize,
    extract_ms: u32,
    build_ms: u32,
}

#[derive(Serialize, Debug, Default)]
struct Report {
    chunks: Vec<ChunkReport>,
}

fn load_registry(args: &Args) -> Result<BlockRegistry, Box<dyn Error>> {
    if args.blocks.exists() && args.materials.exists() {
        log::info!(
            "loading block catalog from {} and {}",
            args.blocks.display(),
            args.materials.display()
        );
        return BlockRegistry::load_from_paths(&args.materials, &args.blocks);
    }
    log::warn!("block catalog files not found; using the built-in catalog");
    let materials = MaterialCatalog::from_toml_str(BUILTIN_MATERIALS)?;
    let blocks: BlocksConfig = toml::from_str(BUILTIN_BLOCKS)?;
    BlockRegistry::from_configs(materials, blocks)
}

fn load_config(path: Option<&PathBuf>) -> Result<MeshConfig, Box<dyn Error>> {
    match path {
        Some(p) => MeshConfig::from_path(p),
        None => Ok(MeshConfig::default()),
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.height < 4 {
        return Err("--height must be at least 4".into());
    }
    let cfg = load_config(args.config.as_ref())?;
    let reg = Arc::new(load_registry(&args)?);
    let ids = DemoBlocks::resolve(&reg)?;

    let ctx = MeshContext {
        blocks: reg.clone(),
        plants: Arc::new(ScatterPlants::new(args.seed, args.plant_density, 0.3)),
        geometry: Arc::new(BakedGeometry::new(cfg.block_dimension)),
        cfg: Arc::new(cfg.clone()),
    };
    let rt = MeshRuntime::new(ctx, args.workers)?;

    let t0 = Instant::now();
    let mut submitted = 0usize;
    for cx in 0..args.chunks {
        for cz in 0..args.chunks {
            let job = terrain_job(
                &ids,
                &cfg,
                ChunkOrigin::new(cx, cz),
                args.height,
                args.seed,
                args.smooth,
                rt.next_job_id(),
            );
            rt.submit_bg(job);
            submitted += 1;
        }
    }
    let results = rt.wait_fresh_results(submitted, Duration::from_secs(120));
    if results.len() < submitted {
        log::warn!("only {} of {} chunks finished", results.len(), submitted);
    }

    let mut report = Report::default();
    for out in results {
        let Some(data) = out.data? else {
            log::info!("chunk ({}, {}) has no visible faces", out.origin.cx, out.origin.cz);
            continue;
        };
        let lod = assemble_mesh(&data, reg.as_ref(), &cfg.lod)?;
        let Some(mesh) = lod.mesh_for_distance(args.view_distance) else {
            continue;
        };
        log::info!(
            "chunk ({}, {}): planes={} verts={} tris={} materials={} bounds=({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1}) lod_levels={}",
            out.origin.cx,
            out.origin.cz,
            out.planes,
            mesh.geometry.vertex_count(),
            mesh.geometry.triangle_count(),
            mesh.materials.len(),
            mesh.bounds.min.x,
            mesh.bounds.min.y,
            mesh.bounds.min.z,
            mesh.bounds.max.x,
            mesh.bounds.max.y,
            mesh.bounds.max.z,
            lod.levels().len()
        );
        report.chunks.push(ChunkReport {
            cx: out.origin.cx,
            cz: out.origin.cz,
            planes: out.planes,
            vertices: mesh.geometry.vertex_count(),
            triangles: mesh.geometry.triangle_count(),
            materials: mesh.materials.len(),
            bytes: data.geometry.len(),
            extract_ms: out.timings.extract_ms,
            build_ms: out.timings.build_ms,
        });
    }

    report.chunks.sort_by_key(|c| (c.cx, c.cz));
    let total_tris: usize = report.chunks.iter().map(|c| c.triangles).sum();
    log::info!(
        target: "perf",
        "ms={} meshed chunks={} tris={} workers={}",
        t0.elapsed().as_millis(),
        report.chunks.len(),
        total_tris,
        rt.w_edit + rt.w_bg
    );
    log::debug!("report:\n{}", toml::to_string(&report)?);
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to install logger: {e}");
    }
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
