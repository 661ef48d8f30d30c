use std::time::Instant;

use serde::{Deserialize, Serialize};
use tessel_blocks::{AIR, BlockClass, BlockId, FaceDirection};
use tessel_chunk::{ChunkOrigin, LightVolume, SmoothLightVolume, VoxelVolume};
use tessel_geom::Vec3;

use crate::config::MeshConfig;
use crate::face::{Face, GeometryId};
use crate::plane::Plane;

/// Horizontal offset of a plant inside its block, in block units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantJitter {
    pub dx: f32,
    pub dz: f32,
}

/// Decides which plant-type voxels actually render and where.
///
/// Must be deterministic per `(gx, gz)`.
pub trait PlantLookup {
    fn jitter(&self, gx: i32, gz: i32) -> Option<PlantJitter>;
}

impl<F> PlantLookup for F
where
    F: Fn(i32, i32) -> Option<PlantJitter> + ?Sized,
{
    #[inline]
    fn jitter(&self, gx: i32, gz: i32) -> Option<PlantJitter> {
        self(gx, gz)
    }
}

/// Hash-scattered plant placement: roughly `density` of columns get a plant,
/// each offset by up to `spread` blocks on X and Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlants {
    pub seed: u64,
    pub density: f32,
    pub spread: f32,
}

impl Default for ScatterPlants {
    fn default() -> Self {
        Self {
            seed: 0x7E55_E1,
            density: 0.5,
            spread: 0.3,
        }
    }
}

impl ScatterPlants {
    pub fn new(seed: u64, density: f32, spread: f32) -> Self {
        Self {
            seed,
            density,
            spread,
        }
    }
}

#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn unit(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u64 << 24) as f32
}

impl PlantLookup for ScatterPlants {
    fn jitter(&self, gx: i32, gz: i32) -> Option<PlantJitter> {
        let key = ((gx as u32 as u64) << 32) | gz as u32 as u64;
        let h = mix64(key ^ mix64(self.seed));
        if unit(h) >= self.density {
            return None;
        }
        let h2 = mix64(h);
        let h3 = mix64(h2);
        Some(PlantJitter {
            dx: (unit(h2) * 2.0 - 1.0) * self.spread,
            dz: (unit(h3) * 2.0 - 1.0) * self.spread,
        })
    }
}

#[inline]
fn face_visible<C: BlockClass + ?Sized>(
    blocks: &C,
    face: Face,
    nb: BlockId,
    self_transparent: bool,
    self_liquid: bool,
) -> bool {
    if nb == AIR || blocks.is_plant(nb) {
        return true;
    }
    blocks.is_transparent(nb) && !self_transparent && !(self_liquid && face.liquid_culls())
}

/// Scans the unpadded interior of `voxels` and returns every visible face in
/// scan order: X outer, Z middle, Y inner, faces top, +X, +Z, -X, -Z, bottom.
///
/// `light` and `smooth` are indexed by unpadded local coordinates.
///
/// # Panics
///
/// If `voxels` was built with a padding other than `cfg.padding`.
pub fn extract_planes<P, C>(
    voxels: &VoxelVolume,
    light: &LightVolume,
    smooth: &SmoothLightVolume,
    origin: ChunkOrigin,
    plants: &P,
    blocks: &C,
    cfg: &MeshConfig,
) -> Vec<Plane>
where
    P: PlantLookup + ?Sized,
    C: BlockClass + ?Sized,
{
    let mut planes = Vec::new();
    if voxels.is_empty() || voxels.blocks.is_empty() {
        return planes;
    }
    let t0 = Instant::now();
    let pad = cfg.padding;
    assert_eq!(
        voxels.padding, pad,
        "voxel volume padding does not match the mesh config"
    );
    let (sx, sy, sz) = (voxels.sx, voxels.sy, voxels.sz);
    let y_end = cfg.max_world_height.min(sy - 1);
    let xf = cfg.transform();
    let mut n_plants = 0usize;

    for x in pad..sx - pad {
        for z in pad..sz - pad {
            for y in 0..=y_end {
                let here = voxels.get(x, z, y as isize);
                if here == AIR {
                    continue;
                }
                let (lx, lz) = (x - pad, z - pad);
                let (gx, gy, gz) =
                    xf.chunk_block_to_global(origin, lx as i32, y as i32, lz as i32);
                let base = Vec3::new(gx as f32, gy as f32, gz as f32);

                if blocks.is_plant(here) {
                    let Some(j) = plants.jitter(gx, gz) else {
                        continue;
                    };
                    let pos = base + Vec3::new(j.dx, 0.0, j.dz);
                    for geometry in [GeometryId::Cross1, GeometryId::Cross2] {
                        planes.push(Plane::Plant {
                            geometry,
                            pos,
                            face: FaceDirection::Side,
                            block: here,
                        });
                    }
                    n_plants += 1;
                    continue;
                }

                let self_transparent = blocks.is_transparent(here);
                let self_liquid = blocks.is_liquid(here);
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let nb = voxels.get(
                        (x as isize + dx) as usize,
                        (z as isize + dz) as usize,
                        y as isize + dy,
                    );
                    if !face_visible(blocks, face, nb, self_transparent, self_liquid) {
                        continue;
                    }
                    let fi = face.index();
                    let sample = smooth.sample(lx, lz, y, fi);
                    let secondary = sample.is_some_and(|s| s.selects_secondary());
                    planes.push(Plane::Solid {
                        geometry: face.geometry(secondary),
                        pos: base,
                        face: face.direction(),
                        block: here,
                        light: light.get(lx, lz, y, fi),
                        smooth: sample,
                    });
                }
            }
        }
    }

    log::debug!(
        target: "perf",
        "ms={} extract_planes planes={} plants={} dims=({}, {}, {}) cx={} cz={}",
        t0.elapsed().as_millis(),
        planes.len(),
        n_plants,
        sx,
        sy,
        sz,
        origin.cx,
        origin.cz
    );
    planes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_deterministic_and_bounded() {
        let p = ScatterPlants::new(42, 0.5, 0.25);
        let mut hits = 0;
        for gx in -32..32 {
            for gz in -32..32 {
                let a = p.jitter(gx, gz);
                assert_eq!(a, p.jitter(gx, gz));
                if let Some(j) = a {
                    hits += 1;
                    assert!(j.dx.abs() <= 0.25 && j.dz.abs() <= 0.25);
                }
            }
        }
        // 4096 columns at density 0.5
        assert!((1500..2600).contains(&hits), "hits={hits}");
    }

    #[test]
    fn scatter_density_extremes() {
        let none = ScatterPlants::new(1, 0.0, 0.3);
        let all = ScatterPlants::new(1, 1.0, 0.3);
        for g in -8..8 {
            assert!(none.jitter(g, -g).is_none());
            assert!(all.jitter(g, -g).is_some());
        }
    }

    #[test]
    fn closures_are_lookups() {
        let f = |gx: i32, _gz: i32| (gx == 3).then_some(PlantJitter { dx: 0.1, dz: 0.0 });
        assert!(f.jitter(3, 9).is_some());
        assert!(f.jitter(2, 9).is_none());
    }
}
