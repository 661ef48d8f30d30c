use proptest::prelude::*;
use tessel_blocks::{AIR, BlockClass, BlockId, FaceDirection};
use tessel_chunk::{ChunkOrigin, LightVolume, SmoothLightVolume, SmoothSample, VoxelVolume};
use tessel_geom::Vec3;
use tessel_mesh_cpu::{
    BakedGeometry, Face, GeometryId, MeshConfig, PlantJitter, Plane, build_mesh_data,
    extract_planes,
};

const STONE: BlockId = 1;
const GLASS: BlockId = 2;
const LAVA: BlockId = 3;
const GRASS: BlockId = 4;
const WATER: BlockId = 5;

struct Fixture;

impl BlockClass for Fixture {
    fn is_plant(&self, id: BlockId) -> bool {
        id == GRASS
    }
    fn is_transparent(&self, id: BlockId) -> bool {
        matches!(id, GLASS | WATER)
    }
    fn is_liquid(&self, id: BlockId) -> bool {
        matches!(id, LAVA | WATER)
    }
}

/// 3 x h x 3 interior with one column of padding.
struct Chunk {
    voxels: VoxelVolume,
    light: LightVolume,
    smooth: SmoothLightVolume,
}

impl Chunk {
    fn new(h: usize) -> Self {
        Self {
            voxels: VoxelVolume::new(5, h, 5, 1),
            light: LightVolume::new(3, h, 3),
            smooth: SmoothLightVolume::new(3, h, 3),
        }
    }

    fn extract_with(&self, plants: &dyn Fn(i32, i32) -> Option<PlantJitter>, cfg: &MeshConfig) -> Vec<Plane> {
        extract_planes(
            &self.voxels,
            &self.light,
            &self.smooth,
            ChunkOrigin::new(0, 0),
            plants,
            &Fixture,
            cfg,
        )
    }

    fn extract(&self) -> Vec<Plane> {
        self.extract_with(&no_plants, &MeshConfig::default())
    }
}

fn no_plants(_: i32, _: i32) -> Option<PlantJitter> {
    None
}

fn of_block(planes: &[Plane], block: BlockId) -> Vec<&Plane> {
    planes.iter().filter(|p| p.block() == block).collect()
}

#[test]
fn isolated_voxel_emits_six_faces_in_order() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, STONE);
    let planes = c.extract();
    let ids: Vec<GeometryId> = planes.iter().map(|p| p.geometry()).collect();
    assert_eq!(
        ids,
        vec![
            GeometryId::Py,
            GeometryId::Px,
            GeometryId::Pz,
            GeometryId::Nx,
            GeometryId::Nz,
            GeometryId::Ny
        ]
    );
    let dirs: Vec<FaceDirection> = planes.iter().map(|p| p.face()).collect();
    use FaceDirection::*;
    assert_eq!(dirs, vec![Top, Side, Side, Side, Side, Bottom]);
    for p in &planes {
        assert_eq!(p.pos(), Vec3::new(1.0, 1.0, 1.0));
        assert!(matches!(p, Plane::Solid { light: 0, smooth: None, .. }));
    }
}

#[test]
fn enclosed_voxel_emits_nothing() {
    let mut c = Chunk::new(3);
    c.voxels.blocks.fill(STONE);
    let planes = c.extract();
    let center = Vec3::new(1.0, 1.0, 1.0);
    assert!(planes.iter().all(|p| p.pos() != center));
    // only the exposed top and bottom layers remain
    assert_eq!(planes.len(), 18);
    assert!(planes.iter().all(|p| p.face() != FaceDirection::Side));
}

#[test]
fn transparent_neighbors() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, STONE);
    c.voxels.set(3, 2, 1, GLASS);
    c.voxels.set(3, 3, 1, GLASS);
    let planes = c.extract();

    // opaque draws against glass
    let stone = of_block(&planes, STONE);
    assert_eq!(stone.len(), 6);
    // glass never draws against opaque or against glass
    let glass = of_block(&planes, GLASS);
    assert!(
        glass
            .iter()
            .all(|p| !(p.pos() == Vec3::new(2.0, 1.0, 1.0) && p.geometry() == GeometryId::Nx))
    );
    assert!(
        glass
            .iter()
            .all(|p| !(p.pos() == Vec3::new(2.0, 1.0, 1.0) && p.geometry() == GeometryId::Pz))
    );
    assert_eq!(glass.len(), 4 + 5);
}

#[test]
fn liquid_keeps_top_but_drops_sides_against_transparent() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, LAVA);
    c.voxels.set(2, 2, 2, GLASS); // above
    c.voxels.set(1, 2, 1, GLASS); // -X
    c.voxels.set(3, 2, 1, GLASS); // +X
    c.voxels.set(2, 2, 0, GLASS); // below
    let planes = c.extract();
    let ids: Vec<GeometryId> = of_block(&planes, LAVA).iter().map(|p| p.geometry()).collect();
    assert_eq!(ids, vec![GeometryId::Py, GeometryId::Pz, GeometryId::Nz]);
}

#[test]
fn transparent_liquid_culls_against_transparent_everywhere() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, WATER);
    c.voxels.set(2, 2, 2, GLASS);
    c.voxels.set(1, 2, 1, WATER);
    let planes = c.extract();
    let center: Vec<GeometryId> = of_block(&planes, WATER)
        .iter()
        .filter(|p| p.pos() == Vec3::new(1.0, 1.0, 1.0))
        .map(|p| p.geometry())
        .collect();
    assert_eq!(
        center,
        vec![GeometryId::Px, GeometryId::Pz, GeometryId::Nz, GeometryId::Ny]
    );
}

#[test]
fn plants_are_sparse_and_jittered() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, GRASS);
    let cfg = MeshConfig::default();
    assert!(c.extract_with(&no_plants, &cfg).is_empty());

    let planes = c.extract_with(
        &|gx, gz| (gx == 1 && gz == 1).then_some(PlantJitter { dx: 0.3, dz: -0.1 }),
        &cfg,
    );
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0].geometry(), GeometryId::Cross1);
    assert_eq!(planes[1].geometry(), GeometryId::Cross2);
    for p in &planes {
        assert!(matches!(p, Plane::Plant { .. }));
        assert_eq!(p.face(), FaceDirection::Side);
        let d = p.pos() - Vec3::new(1.0, 1.0, 1.0);
        assert!((d.x - 0.3).abs() < 1e-6);
        assert_eq!(d.y, 0.0);
        assert!((d.z + 0.1).abs() < 1e-6);
    }
}

#[test]
fn plant_neighbors_expose_faces() {
    let mut c = Chunk::new(3);
    c.voxels.blocks.fill(STONE);
    c.voxels.set(2, 2, 2, GRASS); // above the center
    let planes = c.extract();
    let center: Vec<&Plane> = planes
        .iter()
        .filter(|p| p.pos() == Vec3::new(1.0, 1.0, 1.0))
        .collect();
    assert_eq!(center.len(), 1);
    assert_eq!(center[0].geometry(), GeometryId::Py);
}

#[test]
fn smooth_sample_selects_variant() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, STONE);
    let top = Face::Top.index();
    let east = Face::PosX.index();
    c.smooth
        .set_sample(1, 1, 1, top, SmoothSample([[7, 7, 7], [7, 7, 7], [1, 7, 7]]));
    c.smooth
        .set_sample(1, 1, 1, east, SmoothSample([[7, 7, 7], [7, 7, 7], [2, 7, 7]]));
    // [0][0] == 0 means no sample, even when [2][0] is 1
    c.smooth
        .set_sample(1, 1, 1, Face::Bottom.index(), SmoothSample([[0, 7, 7], [7, 7, 7], [1, 7, 7]]));
    let planes = c.extract();
    assert_eq!(planes[0].geometry(), GeometryId::Py2);
    assert_eq!(planes[1].geometry(), GeometryId::Px);
    assert_eq!(planes[5].geometry(), GeometryId::Ny);
    assert!(matches!(planes[5], Plane::Solid { smooth: None, .. }));
    assert!(matches!(planes[1], Plane::Solid { smooth: Some(_), .. }));
}

#[test]
fn per_face_light_is_carried() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, STONE);
    for f in Face::ALL {
        c.light.set(1, 1, 1, f.index(), 10 + f.index() as u8);
    }
    let planes = c.extract();
    for (i, p) in planes.iter().enumerate() {
        let Plane::Solid { light, .. } = p else {
            panic!("expected a solid face");
        };
        assert_eq!(*light as usize, 10 + i);
    }
}

#[test]
fn origin_and_height_limit() {
    let mut c = Chunk::new(4);
    c.voxels.set(1, 3, 2, STONE);
    let planes = extract_planes(
        &c.voxels,
        &c.light,
        &c.smooth,
        ChunkOrigin::new(2, -1),
        &no_plants,
        &Fixture,
        &MeshConfig::default(),
    );
    assert_eq!(planes[0].pos(), Vec3::new(32.0, 2.0, -14.0));

    let low = MeshConfig {
        max_world_height: 1,
        ..MeshConfig::default()
    };
    assert!(c.extract_with(&no_plants, &low).is_empty());
}

#[test]
fn empty_volumes_yield_nothing() {
    let c = Chunk::new(3);
    assert!(c.extract().is_empty());
    let flat = VoxelVolume::new(2, 3, 2, 1);
    let planes = extract_planes(
        &flat,
        &LightVolume::new(0, 3, 0),
        &SmoothLightVolume::new(0, 3, 0),
        ChunkOrigin::default(),
        &no_plants,
        &Fixture,
        &MeshConfig::default(),
    );
    assert!(planes.is_empty());
}

#[test]
fn scan_uses_configured_padding() {
    let h = 3;
    let mut voxels = VoxelVolume::new(7, h, 7, 2);
    voxels.set(4, 3, 1, STONE);
    // a neighbor in the padding hides the +X face and is not meshed itself
    voxels.set(5, 3, 1, STONE);
    let cfg = MeshConfig {
        padding: 2,
        ..MeshConfig::default()
    };
    let planes = extract_planes(
        &voxels,
        &LightVolume::new(3, h, 3),
        &SmoothLightVolume::new(3, h, 3),
        ChunkOrigin::default(),
        &no_plants,
        &Fixture,
        &cfg,
    );
    assert_eq!(planes.len(), 5);
    assert!(planes.iter().all(|p| p.pos() == Vec3::new(2.0, 1.0, 1.0)));
    assert!(planes.iter().all(|p| p.geometry() != GeometryId::Px));
}

#[test]
#[should_panic(expected = "padding")]
fn mismatched_padding_is_rejected() {
    let mut c = Chunk::new(3);
    c.voxels.set(2, 2, 1, STONE);
    let cfg = MeshConfig {
        padding: 2,
        ..MeshConfig::default()
    };
    c.extract_with(&no_plants, &cfg);
}

fn chunk_strategy() -> impl Strategy<Value = (Vec<BlockId>, Vec<u8>)> {
    let h = 4usize;
    (
        prop::collection::vec(0u16..=5, 5 * h * 5),
        prop::collection::vec(0u8..=15, 3 * h * 3 * 6),
    )
}

proptest! {
    #[test]
    fn extraction_is_deterministic_and_counts_match((blocks, levels) in chunk_strategy()) {
        let h = 4;
        let voxels = VoxelVolume::from_blocks(5, h, 5, 1, blocks);
        let light = LightVolume::from_levels(3, h, 3, levels);
        let smooth = SmoothLightVolume::new(3, h, 3);
        let plants = |gx: i32, gz: i32| ((gx + gz) % 2 == 0).then_some(PlantJitter { dx: 0.1, dz: 0.2 });
        let cfg = MeshConfig::default();
        let run = || extract_planes(&voxels, &light, &smooth, ChunkOrigin::new(1, 1), &plants, &Fixture, &cfg);
        let a = run();
        let b = run();
        prop_assert_eq!(&a, &b);

        let solid = (1..4)
            .flat_map(|x| (1..4).flat_map(move |z| (0..h).map(move |y| (x, z, y))))
            .filter(|&(x, z, y)| {
                let id = voxels.get(x, z, y as isize);
                id != AIR && id != GRASS
            })
            .count();
        let n_solid = a.iter().filter(|p| matches!(p, Plane::Solid { .. })).count();
        prop_assert!(n_solid <= solid * 6);
        prop_assert_eq!(a.iter().filter(|p| matches!(p, Plane::Plant { .. })).count() % 2, 0);

        let geo = BakedGeometry::new(1.0);
        let built = build_mesh_data(&a, &geo, &cfg.transform()).unwrap();
        match built {
            None => prop_assert!(a.is_empty()),
            Some(data) => {
                prop_assert_eq!(data.materials.len(), a.len());
                let mesh = data.geometry.decode().unwrap();
                prop_assert_eq!(mesh.groups.len(), a.len());
                let again = build_mesh_data(&b, &geo, &cfg.transform()).unwrap().unwrap();
                prop_assert_eq!(data, again);
            }
        }
    }
}
