use serde::{Deserialize, Serialize};
use tessel_geom::Vec3;

/// Horizontal chunk coordinate; chunks span the full world height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkOrigin {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkOrigin {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }
}

/// Maps chunk-local blocks to global blocks and global blocks to world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordTransform {
    pub chunk_size: i32,
    pub block_dimension: f32,
}

impl Default for CoordTransform {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            block_dimension: 1.0,
        }
    }
}

impl CoordTransform {
    #[inline]
    pub const fn new(chunk_size: i32, block_dimension: f32) -> Self {
        Self {
            chunk_size,
            block_dimension,
        }
    }

    /// Unpadded chunk-local block → global block coordinate.
    #[inline]
    pub fn chunk_block_to_global(&self, origin: ChunkOrigin, lx: i32, ly: i32, lz: i32) -> (i32, i32, i32) {
        (
            origin.cx * self.chunk_size + lx,
            ly,
            origin.cz * self.chunk_size + lz,
        )
    }

    #[inline]
    pub fn global_block_to_world(&self, p: Vec3) -> Vec3 {
        p * self.block_dimension
    }

    #[inline]
    pub fn world_to_global_block(&self, p: Vec3) -> (i32, i32, i32) {
        let g = p / self.block_dimension;
        (g.x.floor() as i32, g.y.floor() as i32, g.z.floor() as i32)
    }

    /// Chunk containing a global block column.
    #[inline]
    pub fn global_to_chunk(&self, gx: i32, gz: i32) -> ChunkOrigin {
        ChunkOrigin::new(gx.div_euclid(self.chunk_size), gz.div_euclid(self.chunk_size))
    }
}
