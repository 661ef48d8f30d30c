use std::sync::Arc;
use std::time::Duration;

use tessel_blocks::{BlockClass, BlockId};
use tessel_chunk::{ChunkOrigin, LightVolume, SmoothLightVolume, VoxelVolume};
use tessel_mesh_cpu::{BakedGeometry, MeshConfig, PlantJitter};
use tessel_runtime::{ChunkJob, JobKind, MeshContext, MeshRuntime, process_chunk_job};

struct Opaque;

impl BlockClass for Opaque {
    fn is_plant(&self, _id: BlockId) -> bool {
        false
    }
    fn is_transparent(&self, _id: BlockId) -> bool {
        false
    }
    fn is_liquid(&self, _id: BlockId) -> bool {
        false
    }
}

fn no_plants(_: i32, _: i32) -> Option<PlantJitter> {
    None
}

fn context() -> MeshContext {
    MeshContext {
        blocks: Arc::new(Opaque),
        plants: Arc::new(no_plants),
        geometry: Arc::new(BakedGeometry::new(1.0)),
        cfg: Arc::new(MeshConfig::default()),
    }
}

/// 3x3 interior with `blocks` solid cells stacked from y = 0 in the center column.
fn job(origin: ChunkOrigin, job_id: u64, blocks: usize) -> ChunkJob {
    let h = 4;
    let mut voxels = VoxelVolume::new(5, h, 5, 1);
    for y in 0..blocks.min(h) {
        voxels.set(2, 2, y, 1);
    }
    ChunkJob {
        origin,
        voxels,
        light: LightVolume::uniform(3, h, 3, 15),
        smooth: SmoothLightVolume::new(3, h, 3),
        job_id,
    }
}

#[test]
fn inline_processing_reports_planes() {
    let out = process_chunk_job(&job(ChunkOrigin::new(0, 0), 1, 1), JobKind::Edit, &context());
    assert_eq!(out.planes, 6);
    let data = out.data.unwrap().unwrap();
    assert_eq!(data.materials.len(), 6);
    assert!(out.timings.total_ms >= out.timings.extract_ms);

    let empty = process_chunk_job(&job(ChunkOrigin::new(0, 0), 2, 0), JobKind::Bg, &context());
    assert_eq!(empty.planes, 0);
    assert!(matches!(empty.data, Ok(None)));
}

#[test]
fn pool_meshes_every_submitted_chunk() {
    let rt = MeshRuntime::new(context(), Some(3)).unwrap();
    assert_eq!((rt.w_edit, rt.w_bg), (1, 2));
    for i in 0..8 {
        let origin = ChunkOrigin::new(i, -i);
        let j = job(origin, rt.next_job_id(), 2);
        if i % 2 == 0 {
            rt.submit_edit(j);
        } else {
            rt.submit_bg(j);
        }
    }
    let results = rt.wait_fresh_results(8, Duration::from_secs(30));
    assert_eq!(results.len(), 8);
    for r in &results {
        // two stacked blocks share one hidden face pair
        assert_eq!(r.planes, 10);
        assert!(r.data.as_ref().unwrap().is_some());
    }
    let mut ids: Vec<u64> = results.iter().map(|r| r.job_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}

#[test]
fn stale_results_are_dropped() {
    let rt = MeshRuntime::new(context(), Some(1)).unwrap();
    let origin = ChunkOrigin::new(4, 4);
    rt.submit_bg(job(origin, 10, 1));
    rt.submit_edit(job(origin, 11, 3));
    let fresh = rt.wait_fresh_results(1, Duration::from_secs(30));
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].job_id, 11);
    assert_eq!(fresh[0].kind, JobKind::Edit);
    assert_eq!(fresh[0].planes, 14);
    // nothing further arrives once the stale job has been discarded
    assert!(rt.wait_fresh_results(1, Duration::from_millis(200)).is_empty());
    assert_eq!(rt.queue_debug_counts(), (0, 0, 0, 0));
}
