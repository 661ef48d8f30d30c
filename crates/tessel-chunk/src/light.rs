use serde::{Deserialize, Serialize};

/// Faces per block in light volumes: top, +X, +Z, -X, -Z, bottom.
pub const FACE_COUNT: usize = 6;

const SAMPLE_CELLS: usize = 9;

/// Flat per-face light level for every unpadded block of a chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightVolume {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub levels: Vec<u8>,
}

impl LightVolume {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            levels: vec![0; sx * sy * sz * FACE_COUNT],
        }
    }

    /// Same value on every face of every block.
    pub fn uniform(sx: usize, sy: usize, sz: usize, level: u8) -> Self {
        Self {
            sx,
            sy,
            sz,
            levels: vec![level; sx * sy * sz * FACE_COUNT],
        }
    }

    pub fn from_levels(sx: usize, sy: usize, sz: usize, levels: Vec<u8>) -> Self {
        assert_eq!(
            levels.len(),
            sx * sy * sz * FACE_COUNT,
            "light buffer does not match ({sx}, {sy}, {sz}) x {FACE_COUNT} faces"
        );
        Self { sx, sy, sz, levels }
    }

    #[inline]
    fn idx(&self, x: usize, z: usize, y: usize, face: usize) -> usize {
        ((x * self.sz + z) * self.sy + y) * FACE_COUNT + face
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize, y: usize, face: usize) -> u8 {
        self.levels[self.idx(x, z, y, face)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, y: usize, face: usize, level: u8) {
        let i = self.idx(x, z, y, face);
        self.levels[i] = level;
    }
}

/// 3x3 secondary light samples around one face, row-major `[m][n]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmoothSample(pub [[u8; 3]; 3]);

impl SmoothSample {
    #[inline]
    pub fn get(&self, m: usize, n: usize) -> u8 {
        self.0[m][n]
    }

    /// Whether the face should use its alternate triangulation.
    #[inline]
    pub fn selects_secondary(&self) -> bool {
        self.0[2][0] == 1
    }
}

/// Optional 3x3 sample per (block, face); a `0` in cell `[0][0]` marks "no sample".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmoothLightVolume {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub samples: Vec<u8>,
}

impl SmoothLightVolume {
    /// Volume without any smooth-lighting contribution.
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            samples: vec![0; sx * sy * sz * FACE_COUNT * SAMPLE_CELLS],
        }
    }

    /// Panics when `samples` is not exactly nine cells per block face.
    pub fn from_samples(sx: usize, sy: usize, sz: usize, samples: Vec<u8>) -> Self {
        assert_eq!(
            samples.len(),
            sx * sy * sz * FACE_COUNT * SAMPLE_CELLS,
            "smooth-light buffer must hold a 3x3 sample per block face"
        );
        Self { sx, sy, sz, samples }
    }

    #[inline]
    fn base(&self, x: usize, z: usize, y: usize, face: usize) -> usize {
        (((x * self.sz + z) * self.sy + y) * FACE_COUNT + face) * SAMPLE_CELLS
    }

    #[inline]
    pub fn sample(&self, x: usize, z: usize, y: usize, face: usize) -> Option<SmoothSample> {
        let b = self.base(x, z, y, face);
        let cells = &self.samples[b..b + SAMPLE_CELLS];
        if cells[0] == 0 {
            return None;
        }
        let mut out = [[0u8; 3]; 3];
        for (m, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(&cells[m * 3..m * 3 + 3]);
        }
        Some(SmoothSample(out))
    }

    pub fn set_sample(&mut self, x: usize, z: usize, y: usize, face: usize, sample: SmoothSample) {
        let b = self.base(x, z, y, face);
        for m in 0..3 {
            self.samples[b + m * 3..b + m * 3 + 3].copy_from_slice(&sample.0[m]);
        }
    }
}
