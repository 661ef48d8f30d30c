use tessel_blocks::types::{AIR, BlockId};

/// Block ids for one chunk plus `padding` columns of each X/Z neighbor.
///
/// Storage is `(x, z, y)` with `y` fastest. X/Z reads outside the padded
/// extent are a caller bug; vertical reads outside `[0, sy)` yield air.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelVolume {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub padding: usize,
    pub blocks: Vec<BlockId>,
}

impl VoxelVolume {
    /// All-air volume with padded dims `(sx, sy, sz)`.
    pub fn new(sx: usize, sy: usize, sz: usize, padding: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            padding,
            blocks: vec![AIR; sx * sy * sz],
        }
    }

    /// Wraps an existing `(x, z, y)` buffer of exactly `sx * sy * sz` ids.
    pub fn from_blocks(sx: usize, sy: usize, sz: usize, padding: usize, blocks: Vec<BlockId>) -> Self {
        assert_eq!(
            blocks.len(),
            sx * sy * sz,
            "voxel buffer does not match ({sx}, {sy}, {sz})"
        );
        Self {
            sx,
            sy,
            sz,
            padding,
            blocks,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, z: usize, y: usize) -> usize {
        (x * self.sz + z) * self.sy + y
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize, y: isize) -> BlockId {
        debug_assert!(x < self.sx && z < self.sz, "x/z read outside padded volume");
        if y < 0 || y as usize >= self.sy {
            return AIR;
        }
        self.blocks[self.idx(x, z, y as usize)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, y: usize, id: BlockId) {
        let i = self.idx(x, z, y);
        self.blocks[i] = id;
    }

    /// Unpadded `(x, y, z)` extent covered by this chunk.
    #[inline]
    pub fn interior_dims(&self) -> (usize, usize, usize) {
        (
            self.sx.saturating_sub(2 * self.padding),
            self.sy,
            self.sz.saturating_sub(2 * self.padding),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        let (ix, iy, iz) = self.interior_dims();
        ix == 0 || iy == 0 || iz == 0
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|&b| b != AIR)
    }
}
