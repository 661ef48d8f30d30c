use std::sync::Mutex;

use hashbrown::HashMap;
use tessel_chunk::ChunkOrigin;

/// Newest job id submitted per chunk; results for older ids are stale.
#[derive(Default)]
pub struct LatestJobs {
    by_origin: Mutex<HashMap<ChunkOrigin, u64>>,
}

impl LatestJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `job_id` unless a newer job for `origin` is already known.
    pub fn record(&self, origin: ChunkOrigin, job_id: u64) {
        let mut map = self.by_origin.lock().unwrap();
        let cur = map.entry(origin).or_insert(job_id);
        if *cur < job_id {
            *cur = job_id;
        }
    }

    pub fn is_current(&self, origin: ChunkOrigin, job_id: u64) -> bool {
        let map = self.by_origin.lock().unwrap();
        map.get(&origin).is_none_or(|&latest| job_id >= latest)
    }

    pub fn forget(&self, origin: ChunkOrigin) {
        self.by_origin.lock().unwrap().remove(&origin);
    }

    pub fn len(&self) -> usize {
        self.by_origin.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ids_supersede_older() {
        let l = LatestJobs::new();
        let o = ChunkOrigin::new(1, -2);
        assert!(l.is_current(o, 0));
        l.record(o, 3);
        l.record(o, 2);
        assert!(!l.is_current(o, 2));
        assert!(l.is_current(o, 3));
        assert!(l.is_current(ChunkOrigin::new(0, 0), 1));
        l.forget(o);
        assert!(l.is_empty());
    }
}
