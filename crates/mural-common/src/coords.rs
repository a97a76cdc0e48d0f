//! Coordinate types for cell, chunk, and local positions.
//!
//! Mural works in three integer spaces: world cells (the grid the game
//! mutates), chunk coordinates (fixed-size square groups of cells used as
//! cache keys), and local coordinates (a cell's position inside its chunk).
//! Screen space is derived from these at composite time and has no type of
//! its own.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// World-space cell coordinate (one tile/wall position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct CellCoord {
    /// X coordinate in cell space
    pub x: i32,
    /// Y coordinate in cell space
    pub y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the chunk containing this cell.
    #[must_use]
    pub const fn to_chunk(self, chunk_size: u32) -> ChunkCoord {
        let size = chunk_size as i32;
        ChunkCoord {
            x: self.x.div_euclid(size),
            y: self.y.div_euclid(size),
        }
    }

    /// Returns this cell's position inside its chunk.
    #[must_use]
    pub const fn to_local(self, chunk_size: u32) -> LocalCoord {
        let size = chunk_size as i32;
        LocalCoord {
            x: self.x.rem_euclid(size) as u16,
            y: self.y.rem_euclid(size) as u16,
        }
    }
}

/// Chunk coordinate (identifies one cached region in the chunk grid).
///
/// Used only as a map key; no ordering is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell coordinate of this chunk's top-left corner.
    #[must_use]
    pub const fn origin_cell(self, chunk_size: u32) -> CellCoord {
        let size = chunk_size as i32;
        CellCoord {
            x: self.x * size,
            y: self.y * size,
        }
    }

    /// Returns the world-pixel position of this chunk's top-left corner.
    #[must_use]
    pub const fn origin_px(self, chunk_size: u32, cell_size: u32) -> (i64, i64) {
        let span = chunk_size as i64 * cell_size as i64;
        (self.x as i64 * span, self.y as i64 * span)
    }
}

/// Local coordinate within a chunk (0 to `chunk_size - 1` per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct LocalCoord {
    /// X coordinate within the chunk
    pub x: u16,
    /// Y coordinate within the chunk
    pub y: u16,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Converts to a linear row-major index.
    #[must_use]
    pub const fn to_index(self, chunk_size: u32) -> usize {
        (self.y as usize) * (chunk_size as usize) + (self.x as usize)
    }
}

/// Inclusive rectangle in chunk-coordinate space.
///
/// The viewport scan reconciles the cache against one of these each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRect {
    /// Top-left corner (inclusive)
    pub min: ChunkCoord,
    /// Bottom-right corner (inclusive)
    pub max: ChunkCoord,
}

impl ChunkRect {
    /// Creates a rectangle from inclusive corners.
    #[must_use]
    pub const fn new(min: ChunkCoord, max: ChunkCoord) -> Self {
        Self { min, max }
    }

    /// Checks whether a chunk coordinate lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
    }

    /// Number of chunk coordinates covered.
    #[must_use]
    pub const fn count(&self) -> usize {
        if self.max.x < self.min.x || self.max.y < self.min.y {
            return 0;
        }
        ((self.max.x - self.min.x + 1) as usize) * ((self.max.y - self.min.y + 1) as usize)
    }

    /// Iterates every covered coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        let min = self.min;
        let max = self.max;
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| ChunkCoord::new(x, y)))
    }
}
