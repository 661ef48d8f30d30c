use std::time::Instant;

use serde::{Deserialize, Serialize};
use tessel_chunk::CoordTransform;

use crate::constants::WIRE_VERSION;
use crate::error::MeshError;
use crate::geometry::GeometryProvider;
use crate::mesh_build::MeshBuild;
use crate::plane::{MaterialKey, Plane};

#[derive(Serialize)]
struct WireOut<'a> {
    version: u16,
    mesh: &'a MeshBuild,
}

#[derive(Deserialize)]
struct WireIn {
    version: u16,
    mesh: MeshBuild,
}

/// Merged geometry as owned, self-describing bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedGeometry(pub Vec<u8>);

impl SerializedGeometry {
    pub fn encode(mesh: &MeshBuild) -> Result<Self, MeshError> {
        let wire = WireOut {
            version: WIRE_VERSION,
            mesh,
        };
        bincode::serialize(&wire)
            .map(SerializedGeometry)
            .map_err(|e| MeshError::Encode(e.to_string()))
    }

    pub fn decode(&self) -> Result<MeshBuild, MeshError> {
        let wire: WireIn =
            bincode::deserialize(&self.0).map_err(|e| MeshError::Decode(e.to_string()))?;
        if wire.version != WIRE_VERSION {
            return Err(MeshError::Decode(format!(
                "unsupported geometry version {} (expected {})",
                wire.version, WIRE_VERSION
            )));
        }
        Ok(wire.mesh)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builder output handed to the assembler. `materials[i]` belongs to geometry group `i`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub geometry: SerializedGeometry,
    pub materials: Vec<MaterialKey>,
}

impl MeshData {
    #[inline]
    pub fn face_count(&self) -> usize {
        self.materials.len()
    }
}

/// Merges every plane's fragment into one buffer, one group per plane, in plane order.
pub fn merge_planes<G>(
    planes: &[Plane],
    geometry: &G,
    transform: &CoordTransform,
) -> Result<(MeshBuild, Vec<MaterialKey>), MeshError>
where
    G: GeometryProvider + ?Sized,
{
    let mut merged = MeshBuild::default();
    merged.reserve_quads(planes.len());
    let mut materials = Vec::with_capacity(planes.len());
    for (i, plane) in planes.iter().enumerate() {
        let frag = match plane {
            Plane::Plant { geometry: id, .. } => geometry.pure(*id),
            Plane::Solid {
                geometry: id,
                light,
                smooth,
                block,
                ..
            } => geometry.lit(*id, *light, smooth.as_ref(), *block),
        };
        let translation = transform.global_block_to_world(plane.pos() + frag.translation);
        merged.merge(&frag.mesh, translation, i as u32)?;
        materials.push(plane.material_key());
    }
    Ok((merged, materials))
}

/// Merges and serializes `planes`. Returns `Ok(None)` when there is nothing to draw.
pub fn build_mesh_data<G>(
    planes: &[Plane],
    geometry: &G,
    transform: &CoordTransform,
) -> Result<Option<MeshData>, MeshError>
where
    G: GeometryProvider + ?Sized,
{
    if planes.is_empty() {
        return Ok(None);
    }
    let t0 = Instant::now();
    let (merged, materials) = merge_planes(planes, geometry, transform)?;
    let geometry = SerializedGeometry::encode(&merged)?;
    log::debug!(
        target: "perf",
        "ms={} build_mesh_data planes={} verts={} tris={} bytes={}",
        t0.elapsed().as_millis(),
        planes.len(),
        merged.vertex_count(),
        merged.triangle_count(),
        geometry.len()
    );
    Ok(Some(MeshData {
        geometry,
        materials,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_geom::Vec3;

    use crate::geometry::BakedGeometry;

    #[test]
    fn decode_rejects_garbage_and_wrong_version() {
        assert!(matches!(
            SerializedGeometry(vec![1, 2, 3]).decode(),
            Err(MeshError::Decode(_))
        ));
        let mut bytes = SerializedGeometry::encode(&MeshBuild::default()).unwrap().0;
        bytes[0] = bytes[0].wrapping_add(1);
        assert!(matches!(
            SerializedGeometry(bytes).decode(),
            Err(MeshError::Decode(_))
        ));
    }

    #[test]
    fn plane_position_is_scaled_into_world_units() {
        let geo = BakedGeometry::new(2.0);
        let planes = [Plane::Plant {
            geometry: crate::face::GeometryId::Cross1,
            pos: Vec3::new(1.0, 0.0, 0.0),
            face: tessel_blocks::FaceDirection::Side,
            block: 3,
        }];
        let (mb, keys) = merge_planes(&planes, &geo, &CoordTransform::new(16, 2.0)).unwrap();
        assert_eq!(keys.len(), 1);
        let bb = mb.bounds();
        // block 1 spans world x in [2, 4]
        assert_eq!(bb.min.x, 2.0);
        assert_eq!(bb.max.x, 4.0);
        assert_eq!(bb.min.y, 0.0);
        assert_eq!(bb.max.y, 2.0);
    }
}
