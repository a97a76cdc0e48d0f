//! The cell data source seam.
//!
//! The render cache never owns world data; it reads cells through
//! [`CellSource`]. The source distinguishes three outcomes per query: the
//! cell is empty, the cell is present, or its backing data has not been
//! streamed in yet ([`CellQuery::NotReady`]). The last one is the transient
//! condition that aborts a chunk population attempt.

use crate::cell::{Cell, Layer};

/// Result of querying one cell of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellQuery {
    /// Nothing at this position.
    Empty,
    /// The cell is present and its data is available.
    Ready(Cell),
    /// Backing data is not yet available (streamed/unloaded region).
    ///
    /// Never an error: population aborts and retries on a later pass.
    NotReady,
}

/// Read access to the world's cell grid.
///
/// Implementations must answer bounds queries without touching cell
/// storage; callers bounds-check before querying, and out-of-bounds cells
/// are simply skipped.
pub trait CellSource {
    /// World width in cells.
    fn width(&self) -> u32;

    /// World height in cells.
    fn height(&self) -> u32;

    /// Checks whether a cell coordinate lies inside the world.
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Queries one cell of one layer. Only called for in-bounds coordinates.
    fn cell(&self, layer: Layer, x: i32, y: i32) -> CellQuery;
}

/// A single-cell mutation record, emitted per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    /// Layer the mutation happened on
    pub layer: Layer,
    /// Cell X coordinate
    pub x: i32,
    /// Cell Y coordinate
    pub y: i32,
}
