use std::collections::HashMap;

use tessel_blocks::BlockId;
use tessel_chunk::SmoothSample;
use tessel_geom::Vec3;

use crate::constants::{FULL_BRIGHT, LIGHT_MAX, OPAQUE_ALPHA};
use crate::face::{Face, GeometryId};
use crate::mesh_build::MeshBuild;

/// A face shape in world units plus the block-unit offset it is placed at.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryFragment {
    pub mesh: MeshBuild,
    pub translation: Vec3,
}

/// Source of per-face base geometry for the mesh builder.
pub trait GeometryProvider {
    /// Shape-only fragment, used for plant crosses.
    fn pure(&self, id: GeometryId) -> GeometryFragment;

    /// Fragment with the face's light baked into its vertex colors.
    fn lit(
        &self,
        id: GeometryId,
        light: u8,
        smooth: Option<&SmoothSample>,
        block: BlockId,
    ) -> GeometryFragment;
}

/// Maps a light level to an 8-bit brightness.
#[inline]
pub fn shade(level: u8) -> u8 {
    ((level.min(LIGHT_MAX) as u32 * 255) / LIGHT_MAX as u32) as u8
}

/// Per-corner light from a 3x3 sample: each corner averages the 2x2 cells touching it.
///
/// Corners are in quad order `(0,0) (1,0) (1,1) (0,1)` over `(n, m)`.
pub fn corner_levels(sample: &SmoothSample) -> [u8; 4] {
    const CORNERS: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
    CORNERS.map(|(cu, cv)| {
        let mut sum = 0u32;
        for m in cv..cv + 2 {
            for n in cu..cu + 2 {
                sum += sample.get(m, n) as u32;
            }
        }
        (sum / 4) as u8
    })
}

/// Unit-cube corners of each face in `[0,1]^3`, quad order.
fn face_corners(face: Face) -> [[f32; 3]; 4] {
    match face {
        Face::Top => [[0., 1., 0.], [1., 1., 0.], [1., 1., 1.], [0., 1., 1.]],
        Face::Bottom => [[0., 0., 1.], [1., 0., 1.], [1., 0., 0.], [0., 0., 0.]],
        Face::PosX => [[1., 0., 1.], [1., 0., 0.], [1., 1., 0.], [1., 1., 1.]],
        Face::NegX => [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
        Face::PosZ => [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
        Face::NegZ => [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]],
    }
}

const QUAD_UVS: [(f32, f32); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Procedural stand-in for an asset-backed geometry cache.
///
/// Every shape is a single quad centered on the block; fragments carry a
/// `(0.5, 0.5, 0.5)` translation so they land on the block's center.
#[derive(Clone, Debug)]
pub struct BakedGeometry {
    block_dimension: f32,
    shapes: HashMap<GeometryId, MeshBuild>,
}

impl BakedGeometry {
    pub fn new(block_dimension: f32) -> Self {
        let shapes = GeometryId::ALL
            .iter()
            .map(|&id| (id, bake_shape(id, block_dimension, [FULL_BRIGHT; 4])))
            .collect();
        Self {
            block_dimension,
            shapes,
        }
    }

    #[inline]
    pub fn block_dimension(&self) -> f32 {
        self.block_dimension
    }

    fn fragment(&self, id: GeometryId) -> GeometryFragment {
        GeometryFragment {
            mesh: self.shapes.get(&id).cloned().unwrap_or_default(),
            translation: Vec3::HALF,
        }
    }
}

impl GeometryProvider for BakedGeometry {
    fn pure(&self, id: GeometryId) -> GeometryFragment {
        self.fragment(id)
    }

    fn lit(
        &self,
        id: GeometryId,
        light: u8,
        smooth: Option<&SmoothSample>,
        _block: BlockId,
    ) -> GeometryFragment {
        match smooth {
            // Colors go in with the corners so they follow any winding reorder.
            Some(s) => {
                let rgba = corner_levels(s).map(|l| {
                    let v = shade(l);
                    [v, v, v, OPAQUE_ALPHA]
                });
                GeometryFragment {
                    mesh: bake_shape(id, self.block_dimension, rgba),
                    translation: Vec3::HALF,
                }
            }
            None => {
                let mut frag = self.fragment(id);
                let s = shade(light);
                frag.mesh.tint(|_| s);
                frag
            }
        }
    }
}

fn bake_shape(id: GeometryId, dim: f32, rgba: [[u8; 4]; 4]) -> MeshBuild {
    let to_local = |c: [f32; 3]| (Vec3::new(c[0], c[1], c[2]) - Vec3::HALF) * dim;
    let mut mb = MeshBuild::default();
    match id.face() {
        Some(face) => {
            let corners = face_corners(face).map(to_local);
            mb.add_quad(corners, face.normal(), QUAD_UVS, rgba, id.is_secondary());
        }
        None => {
            // Vertical quads along the two XZ diagonals of the block.
            let (base, normal) = match id {
                GeometryId::Cross1 => (
                    [[0., 0., 0.], [1., 0., 1.], [1., 1., 1.], [0., 1., 0.]],
                    Vec3::new(1.0, 0.0, -1.0),
                ),
                _ => (
                    [[1., 0., 0.], [0., 0., 1.], [0., 1., 1.], [1., 1., 0.]],
                    Vec3::new(1.0, 0.0, 1.0),
                ),
            };
            let n = normal * std::f32::consts::FRAC_1_SQRT_2;
            mb.add_quad(base.map(to_local), n, QUAD_UVS, rgba, false);
        }
    }
    mb
}
