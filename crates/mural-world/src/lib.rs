//! # Mural World
//!
//! Cell data model and world-facing seams for the Mural render cache:
//! - `Cell` and the tile/wall `Layer` pair
//! - The `CellSource` read seam with its not-ready sentinel
//! - `GridWorld`, an in-memory source with a drainable mutation queue
//! - The static/dynamic content classification registry

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cell;
pub mod classify;
pub mod grid;
pub mod source;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cell::*;
    pub use crate::classify::*;
    pub use crate::grid::*;
    pub use crate::source::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_marks_one_chunk() {
        // A change at (400, 300) belongs to chunk (20, 15) for 20-cell chunks.
        let mut world = GridWorld::new(8400, 2400);
        world.set_tile(400, 300, Cell::new(1));
        let changes = world.drain_changes();
        assert_eq!(changes.len(), 1);
        let chunk = mural_common::CellCoord::new(changes[0].x, changes[0].y).to_chunk(20);
        assert_eq!(chunk, mural_common::ChunkCoord::new(20, 15));
    }
}
