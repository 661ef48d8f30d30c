use serde::{Deserialize, Serialize};
use tessel_geom::{Aabb, Vec3};

use crate::constants::{QUAD_INDICES, QUAD_VERTS};
use crate::error::MeshError;

/// Index range drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub start: u32,
    pub count: u32,
    pub material_index: u32,
}

/// Interleaved-by-attribute triangle buffers with optional material groups.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
    pub groups: Vec<Group>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * QUAD_VERTS * 3);
        self.norm.reserve(n_quads * QUAD_VERTS * 3);
        self.uv.reserve(n_quads * QUAD_VERTS * 2);
        self.col.reserve(n_quads * QUAD_VERTS * 4);
        self.idx.reserve(n_quads * QUAD_INDICES);
        self.groups.reserve(n_quads);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.pos[i * 3..i * 3 + 3])
    }

    /// Appends a quad with explicit per-vertex UVs and colors.
    ///
    /// Corners are reordered so the winding faces along `n`. The quad is split
    /// along the `a`–`c` diagonal, or `b`–`d` when `alt_diagonal` is set.
    pub fn add_quad(
        &mut self,
        corners: [Vec3; 4],
        n: Vec3,
        mut uvs: [(f32, f32); 4],
        mut rgba: [[u8; 4]; 4],
        alt_diagonal: bool,
    ) {
        let base = self.vertex_count() as u32;
        let mut vs = corners;
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        if e1.cross(e2).dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
            rgba.swap(1, 3);
        }
        for i in 0..QUAD_VERTS {
            self.pos.extend_from_slice(&vs[i].to_array());
            self.norm.extend_from_slice(&n.to_array());
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col.extend_from_slice(&rgba[i]);
        }
        let tri = if alt_diagonal {
            [1, 2, 3, 1, 3, 0]
        } else {
            [0, 1, 2, 0, 2, 3]
        };
        self.idx.extend(tri.iter().map(|&k| base + k));
    }

    /// Appends `other` shifted by `translation`, tagging its indices as group `material_index`.
    ///
    /// Groups already present in `other` are flattened into the single new group.
    pub fn merge(
        &mut self,
        other: &MeshBuild,
        translation: Vec3,
        material_index: u32,
    ) -> Result<(), MeshError> {
        let base = self.vertex_count();
        let total = base + other.vertex_count();
        if total > u32::MAX as usize || self.idx.len() + other.idx.len() > u32::MAX as usize {
            return Err(MeshError::TooManyVertices(total));
        }
        let base = base as u32;
        let start = self.idx.len() as u32;
        for p in other.pos.chunks_exact(3) {
            let v = Vec3::from_slice(p) + translation;
            self.pos.extend_from_slice(&v.to_array());
        }
        self.norm.extend_from_slice(&other.norm);
        self.uv.extend_from_slice(&other.uv);
        self.col.extend_from_slice(&other.col);
        self.idx.extend(other.idx.iter().map(|&i| base + i));
        self.groups.push(Group {
            start,
            count: other.idx.len() as u32,
            material_index,
        });
        Ok(())
    }

    /// Multiplies every vertex color's RGB by `shade(vertex)`; alpha is kept.
    pub fn tint(&mut self, mut shade: impl FnMut(usize) -> u8) {
        for (i, c) in self.col.chunks_exact_mut(4).enumerate() {
            let s = shade(i) as u32;
            for ch in &mut c[..3] {
                *ch = ((*ch as u32 * s) / 255) as u8;
            }
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.pos.chunks_exact(3).map(Vec3::from_slice).collect()
    }
}
