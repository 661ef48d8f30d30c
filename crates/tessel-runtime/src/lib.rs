//! Worker pools that mesh owned chunk snapshots off the caller's thread.
#![forbid(unsafe_code)]

mod latest;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, select, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tessel_blocks::BlockClass;
use tessel_chunk::{ChunkOrigin, LightVolume, SmoothLightVolume, VoxelVolume};
use tessel_mesh_cpu::{
    GeometryProvider, MeshConfig, MeshData, MeshError, PlantLookup, build_mesh_data,
    extract_planes,
};

pub use latest::LatestJobs;

/// Shared, read-only collaborators every worker meshes with.
#[derive(Clone)]
pub struct MeshContext {
    pub blocks: Arc<dyn BlockClass + Send + Sync>,
    pub plants: Arc<dyn PlantLookup + Send + Sync>,
    pub geometry: Arc<dyn GeometryProvider + Send + Sync>,
    pub cfg: Arc<MeshConfig>,
}

/// Owned snapshot of one chunk's inputs.
#[derive(Clone, Debug)]
pub struct ChunkJob {
    pub origin: ChunkOrigin,
    pub voxels: VoxelVolume,
    pub light: LightVolume,
    pub smooth: SmoothLightVolume,
    pub job_id: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JobTimings {
    pub extract_ms: u32,
    pub build_ms: u32,
    pub total_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Edit,
    Bg,
}

pub struct MeshJobOut {
    pub origin: ChunkOrigin,
    pub job_id: u64,
    pub kind: JobKind,
    pub planes: usize,
    pub data: Result<Option<MeshData>, MeshError>,
    pub timings: JobTimings,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Lane {
    Edit,
    Bg,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Runs extract and build for one job on the current thread.
pub fn process_chunk_job(job: &ChunkJob, kind: JobKind, ctx: &MeshContext) -> MeshJobOut {
    let t_job_start = Instant::now();

    let t0 = Instant::now();
    let planes = extract_planes(
        &job.voxels,
        &job.light,
        &job.smooth,
        job.origin,
        ctx.plants.as_ref(),
        ctx.blocks.as_ref(),
        &ctx.cfg,
    );
    let extract_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    let data = build_mesh_data(&planes, ctx.geometry.as_ref(), &ctx.cfg.transform());
    let build_ms = elapsed_ms(t0);
    if let Err(e) = &data {
        log::warn!(
            "mesh job {} at ({}, {}) failed: {}",
            job.job_id,
            job.origin.cx,
            job.origin.cz,
            e
        );
    }

    MeshJobOut {
        origin: job.origin,
        job_id: job.job_id,
        kind,
        planes: planes.len(),
        data,
        timings: JobTimings {
            extract_ms,
            build_ms,
            total_ms: elapsed_ms(t_job_start),
        },
    }
}

struct Counters {
    queued: AtomicUsize,
    inflight: AtomicUsize,
}

impl Counters {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            queued: AtomicUsize::new(0),
            inflight: AtomicUsize::new(0),
        })
    }
}

fn run_job(job: ChunkJob, lane: Lane, ctx: &MeshContext, ctr: &Counters, tx: &Sender<MeshJobOut>) {
    ctr.queued.fetch_sub(1, Ordering::Relaxed);
    ctr.inflight.fetch_add(1, Ordering::Relaxed);
    let kind = match lane {
        Lane::Edit => JobKind::Edit,
        Lane::Bg => JobKind::Bg,
    };
    let out = process_chunk_job(&job, kind, ctx);
    let _ = tx.send(out);
    ctr.inflight.fetch_sub(1, Ordering::Relaxed);
}

/// Two-lane mesher: a small edit pool for latency-sensitive chunks and a
/// background pool that also helps with edits when idle.
pub struct MeshRuntime {
    job_tx_edit: Sender<ChunkJob>,
    job_tx_bg: Sender<ChunkJob>,
    res_rx: Receiver<MeshJobOut>,
    _edit_pool: Arc<ThreadPool>,
    bg_pool: Option<Arc<ThreadPool>>,
    edit: Arc<Counters>,
    bg: Arc<Counters>,
    latest: LatestJobs,
    next_job_id: AtomicU64,
    pub w_edit: usize,
    pub w_bg: usize,
}

impl MeshRuntime {
    /// `workers` defaults to the available parallelism; one worker always serves the edit lane.
    pub fn new(ctx: MeshContext, workers: Option<usize>) -> Result<Self, ThreadPoolBuildError> {
        let (job_tx_edit, job_rx_edit) = unbounded::<ChunkJob>();
        let (job_tx_bg, job_rx_bg) = unbounded::<ChunkJob>();
        let (res_tx, res_rx) = unbounded::<MeshJobOut>();

        let worker_count = workers
            .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(4))
            .max(1);
        let w_edit = 1usize;
        let w_bg = worker_count - w_edit;

        let edit_ctr = Counters::new();
        let bg_ctr = Counters::new();

        let edit_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_edit)
                .thread_name(|i| format!("tessel-edit-{i}"))
                .build()?,
        );
        for _ in 0..w_edit {
            let rx = job_rx_edit.clone();
            let tx = res_tx.clone();
            let ctx = ctx.clone();
            let ctr = edit_ctr.clone();
            edit_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    run_job(job, Lane::Edit, &ctx, &ctr, &tx);
                }
            });
        }

        let bg_pool = if w_bg > 0 {
            let pool = Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(w_bg)
                    .thread_name(|i| format!("tessel-bg-{i}"))
                    .build()?,
            );
            for _ in 0..w_bg {
                let bg_rx = job_rx_bg.clone();
                let edit_rx = job_rx_edit.clone();
                let tx = res_tx.clone();
                let ctx = ctx.clone();
                let bg = bg_ctr.clone();
                let edit = edit_ctr.clone();
                pool.spawn(move || {
                    loop {
                        match edit_rx.try_recv() {
                            Ok(job) => {
                                run_job(job, Lane::Edit, &ctx, &edit, &tx);
                                continue;
                            }
                            Err(TryRecvError::Disconnected) => {
                                while let Ok(job) = bg_rx.recv() {
                                    run_job(job, Lane::Bg, &ctx, &bg, &tx);
                                }
                                break;
                            }
                            Err(TryRecvError::Empty) => {}
                        }

                        select! {
                            recv(bg_rx) -> res => match res {
                                Ok(job) => run_job(job, Lane::Bg, &ctx, &bg, &tx),
                                Err(_) => {
                                    while let Ok(job) = edit_rx.recv() {
                                        run_job(job, Lane::Edit, &ctx, &edit, &tx);
                                    }
                                    break;
                                }
                            },
                            recv(edit_rx) -> res => match res {
                                Ok(job) => run_job(job, Lane::Edit, &ctx, &edit, &tx),
                                Err(_) => {}
                            },
                        }
                    }
                });
            }
            Some(pool)
        } else {
            None
        };

        log::info!("mesh runtime started: edit={} bg={}", w_edit, w_bg);

        Ok(Self {
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _edit_pool: edit_pool,
            bg_pool,
            edit: edit_ctr,
            bg: bg_ctr,
            latest: LatestJobs::new(),
            next_job_id: AtomicU64::new(1),
            w_edit,
            w_bg,
        })
    }

    /// Monotonic id for the next job.
    pub fn next_job_id(&self) -> u64 {
        self.next_job_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn submit_edit(&self, job: ChunkJob) {
        self.latest.record(job.origin, job.job_id);
        self.edit.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_edit.send(job).is_err() {
            self.edit.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Falls back to the edit lane when there is no background pool.
    pub fn submit_bg(&self, job: ChunkJob) {
        if self.bg_pool.is_none() {
            self.submit_edit(job);
            return;
        }
        self.latest.record(job.origin, job.job_id);
        self.bg.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_bg.send(job).is_err() {
            self.bg.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Every result that has arrived, stale or not.
    pub fn drain_worker_results(&self) -> Vec<MeshJobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Arrived results, dropping those superseded by a newer job for the same chunk.
    pub fn drain_fresh_results(&self) -> Vec<MeshJobOut> {
        self.res_rx
            .try_iter()
            .filter(|out| self.keep_if_current(out))
            .collect()
    }

    /// Blocks until `n` fresh results arrive or `timeout` elapses.
    pub fn wait_fresh_results(&self, n: usize, timeout: Duration) -> Vec<MeshJobOut> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.res_rx.recv_timeout(left) {
                Ok(r) if self.keep_if_current(&r) => out.push(r),
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        out
    }

    fn keep_if_current(&self, out: &MeshJobOut) -> bool {
        let keep = self.latest.is_current(out.origin, out.job_id);
        if !keep {
            log::debug!(
                "dropping stale mesh job {} at ({}, {})",
                out.job_id,
                out.origin.cx,
                out.origin.cz
            );
        }
        keep
    }

    /// `(edit queued, edit inflight, bg queued, bg inflight)`.
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.edit.queued.load(Ordering::Relaxed),
            self.edit.inflight.load(Ordering::Relaxed),
            self.bg.queued.load(Ordering::Relaxed),
            self.bg.inflight.load(Ordering::Relaxed),
        )
    }
}
