use std::sync::Arc;
use std::time::Instant;

use tessel_blocks::{BlockId, BlockRegistry, FaceDirection, MaterialId};
use tessel_geom::{Aabb, Vec3};

use crate::builder::MeshData;
use crate::config::LodConfig;
use crate::error::MeshError;
use crate::face::GeometryId;
use crate::mesh_build::MeshBuild;

/// Resolves the material drawn for one merged face group.
pub trait MaterialProvider {
    type Material: Clone;

    fn material(
        &self,
        block: BlockId,
        geometry: GeometryId,
        face: FaceDirection,
    ) -> Option<Self::Material>;
}

impl MaterialProvider for BlockRegistry {
    type Material = MaterialId;

    #[inline]
    fn material(&self, block: BlockId, _geometry: GeometryId, face: FaceDirection) -> Option<MaterialId> {
        self.material_for(block, face)
    }
}

/// Adapts a closure into a [`MaterialProvider`].
pub struct MaterialFn<F>(pub F);

impl<F, M> MaterialProvider for MaterialFn<F>
where
    F: Fn(BlockId, GeometryId, FaceDirection) -> Option<M>,
    M: Clone,
{
    type Material = M;

    #[inline]
    fn material(&self, block: BlockId, geometry: GeometryId, face: FaceDirection) -> Option<M> {
        (self.0)(block, geometry, face)
    }
}

/// Static mesh: decoded geometry with one material per group and a baked world matrix.
#[derive(Clone, Debug)]
pub struct Mesh<M> {
    pub geometry: MeshBuild,
    pub materials: Vec<M>,
    pub bounds: Aabb,
    pub position: Vec3,
    /// Column-major 4x4 world transform.
    pub matrix: [f32; 16],
    pub matrix_auto_update: bool,
}

impl<M> Mesh<M> {
    pub fn new(geometry: MeshBuild, materials: Vec<M>) -> Self {
        let bounds = geometry.bounds();
        let mut mesh = Self {
            geometry,
            materials,
            bounds,
            position: Vec3::ZERO,
            matrix: [0.0; 16],
            matrix_auto_update: false,
        };
        mesh.update_matrix();
        mesh
    }

    /// Recomputes `matrix` from `position`.
    pub fn update_matrix(&mut self) {
        let p = self.position;
        self.matrix = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            p.x, p.y, p.z, 1.0,
        ];
    }

    /// Material for the group that owns index range `group`.
    #[inline]
    pub fn group_material(&self, group: usize) -> Option<&M> {
        let g = self.geometry.groups.get(group)?;
        self.materials.get(g.material_index as usize)
    }
}

#[derive(Clone, Debug)]
pub struct LodLevel<M> {
    pub distance: f32,
    pub mesh: Arc<Mesh<M>>,
}

/// Distance-keyed mesh levels, kept sorted by ascending distance.
#[derive(Clone, Debug)]
pub struct Lod<M> {
    levels: Vec<LodLevel<M>>,
}

impl<M> Default for Lod<M> {
    fn default() -> Self {
        Self { levels: Vec::new() }
    }
}

impl<M> Lod<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts before the first level farther than `distance`; equal distances keep insertion order.
    pub fn add_level(&mut self, mesh: Arc<Mesh<M>>, distance: f32) {
        let distance = distance.abs();
        let at = self
            .levels
            .iter()
            .position(|l| l.distance > distance)
            .unwrap_or(self.levels.len());
        self.levels.insert(at, LodLevel { distance, mesh });
    }

    #[inline]
    pub fn levels(&self) -> &[LodLevel<M>] {
        &self.levels
    }

    /// The farthest level whose threshold is within `distance`.
    pub fn mesh_for_distance(&self, distance: f32) -> Option<&Arc<Mesh<M>>> {
        let first = self.levels.first()?;
        let mut pick = &first.mesh;
        for l in &self.levels[1..] {
            if distance < l.distance {
                break;
            }
            pick = &l.mesh;
        }
        Some(pick)
    }
}

/// Decodes `data`, resolves every material key, and registers the mesh at
/// `lod.levels` thresholds spaced `lod.step_distance` apart.
pub fn assemble_mesh<P>(data: &MeshData, materials: &P, lod: &LodConfig) -> Result<Lod<P::Material>, MeshError>
where
    P: MaterialProvider + ?Sized,
{
    let t0 = Instant::now();
    let geometry = data.geometry.decode()?;
    if geometry.groups.len() != data.materials.len() {
        return Err(MeshError::GroupMismatch {
            groups: geometry.groups.len(),
            keys: data.materials.len(),
        });
    }
    let resolved = data
        .materials
        .iter()
        .map(|k| {
            materials
                .material(k.block, k.geometry, k.face)
                .ok_or_else(|| MeshError::MissingMaterial {
                    block: k.block,
                    geometry: k.geometry,
                    face: k.face,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mesh = Arc::new(Mesh::new(geometry, resolved));
    let mut out = Lod::new();
    for i in 0..lod.levels {
        out.add_level(Arc::clone(&mesh), i as f32 * lod.step_distance);
    }
    log::debug!(
        target: "perf",
        "ms={} assemble_mesh groups={} levels={}",
        t0.elapsed().as_millis(),
        mesh.materials.len(),
        lod.levels
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_mesh() -> Arc<Mesh<u8>> {
        Arc::new(Mesh::new(MeshBuild::default(), Vec::new()))
    }

    #[test]
    fn levels_stay_sorted_and_pick_by_threshold() {
        let (a, b, c) = (empty_mesh(), empty_mesh(), empty_mesh());
        let mut lod = Lod::new();
        lod.add_level(c.clone(), 100.0);
        lod.add_level(a.clone(), 0.0);
        lod.add_level(b.clone(), 50.0);
        let d: Vec<f32> = lod.levels().iter().map(|l| l.distance).collect();
        assert_eq!(d, vec![0.0, 50.0, 100.0]);
        assert!(Arc::ptr_eq(lod.mesh_for_distance(10.0).unwrap(), &a));
        assert!(Arc::ptr_eq(lod.mesh_for_distance(50.0).unwrap(), &b));
        assert!(Arc::ptr_eq(lod.mesh_for_distance(1e6).unwrap(), &c));
        assert!(Lod::<u8>::new().mesh_for_distance(0.0).is_none());
    }

    #[test]
    fn matrix_tracks_position() {
        let mut m = Mesh::<u8>::new(MeshBuild::default(), Vec::new());
        assert!(!m.matrix_auto_update);
        assert_eq!(m.matrix[12..15], [0.0, 0.0, 0.0]);
        m.position = Vec3::new(1.0, 2.0, 3.0);
        m.update_matrix();
        assert_eq!(m.matrix[12..15], [1.0, 2.0, 3.0]);
        assert_eq!(m.matrix[15], 1.0);
    }
}
