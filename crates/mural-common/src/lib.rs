//! # Mural Common
//!
//! Common types shared across the Mural render-cache crates:
//! - Coordinate types (cell, chunk, local) and chunk rectangles
//! - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_chunk_local_conversion() {
        let cell = CellCoord::new(100, 200);
        let chunk = cell.to_chunk(32);
        let local = cell.to_local(32);

        assert_eq!(chunk, ChunkCoord::new(3, 6));
        assert_eq!(local, LocalCoord::new(4, 8));
    }

    #[test]
    fn test_error_display() {
        let err = MuralError::BufferDisposed { x: 3, y: -2 };
        assert!(err.to_string().contains("(3, -2)"));
    }
}
