use std::error::Error;

use tessel_blocks::{AIR, BlockId, BlockRegistry};
use tessel_chunk::{
    ChunkOrigin, FACE_COUNT, LightVolume, SmoothLightVolume, SmoothSample, VoxelVolume,
};
use tessel_mesh_cpu::{Face, LIGHT_MAX, MeshConfig};
use tessel_runtime::ChunkJob;

/// Block ids the demo terrain is built from.
#[derive(Clone, Copy, Debug)]
pub struct DemoBlocks {
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub sand: BlockId,
    pub water: BlockId,
    pub tall_grass: BlockId,
}

impl DemoBlocks {
    pub fn resolve(reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let id = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| format!("block catalog has no `{name}`"))
        };
        Ok(Self {
            stone: id("stone")?,
            dirt: id("dirt")?,
            grass: id("grass")?,
            sand: id("sand")?,
            water: id("water")?,
            tall_grass: id("tall_grass")?,
        })
    }
}

/// Deterministic rolling height field in blocks.
fn surface_height(gx: i32, gz: i32, height: usize, seed: u64) -> usize {
    let phase = (seed % 1024) as f32 * 0.37;
    let (x, z) = (gx as f32, gz as f32);
    let n = (x * 0.11 + phase).sin() * 4.0
        + (z * 0.07 - phase).cos() * 5.0
        + ((x + z) * 0.023).sin() * 7.0;
    let base = height as f32 * 0.4;
    (base + n).clamp(1.0, (height - 2) as f32) as usize
}

fn column(ids: &DemoBlocks, surface: usize, sea: usize, y: usize) -> BlockId {
    if y + 3 < surface {
        ids.stone
    } else if y < surface {
        if surface <= sea + 1 { ids.sand } else { ids.dirt }
    } else if y == surface {
        if surface <= sea + 1 { ids.sand } else { ids.grass }
    } else if y == surface + 1 && surface > sea + 1 {
        ids.tall_grass
    } else if y <= sea {
        ids.water
    } else {
        AIR
    }
}

/// Builds the padded voxel, light and smooth-light snapshot for one chunk.
pub fn terrain_job(
    ids: &DemoBlocks,
    cfg: &MeshConfig,
    origin: ChunkOrigin,
    height: usize,
    seed: u64,
    smooth: bool,
    job_id: u64,
) -> ChunkJob {
    let cs = cfg.chunk_size as usize;
    let pad = cfg.padding;
    let (sx, sz) = (cs + 2 * pad, cs + 2 * pad);
    let sea = height / 3;
    let xf = cfg.transform();

    let mut voxels = VoxelVolume::new(sx, height, sz, pad);
    let mut surfaces = vec![0usize; cs * cs];
    for px in 0..sx {
        for pz in 0..sz {
            let lx = px as i32 - pad as i32;
            let lz = pz as i32 - pad as i32;
            let (gx, _, gz) = xf.chunk_block_to_global(origin, lx, 0, lz);
            let surface = surface_height(gx, gz, height, seed);
            if (0..cs as i32).contains(&lx) && (0..cs as i32).contains(&lz) {
                surfaces[lx as usize * cs + lz as usize] = surface;
            }
            for y in 0..height {
                voxels.set(px, pz, y, column(ids, surface, sea, y));
            }
        }
    }

    let mut light = LightVolume::new(cs, height, cs);
    let mut samples = SmoothLightVolume::new(cs, height, cs);
    for x in 0..cs {
        for z in 0..cs {
            let surface = surfaces[x * cs + z];
            for y in 0..height {
                let open_sky = y >= surface;
                for f in 0..FACE_COUNT {
                    let level = match (open_sky, f == Face::Bottom.index()) {
                        (true, false) => LIGHT_MAX,
                        (true, true) => LIGHT_MAX - 3,
                        (false, _) => 4,
                    };
                    light.set(x, z, y, f, level);
                    if smooth {
                        let alt = ((x + y + z + f) % 2) as u8;
                        let l = level.max(1);
                        samples.set_sample(x, z, y, f, SmoothSample([[l, l, l], [l, l, l], [alt, l, l]]));
                    }
                }
            }
        }
    }

    ChunkJob {
        origin,
        voxels,
        light,
        smooth: samples,
        job_id,
    }
}
