//! In-memory world grid with a drainable mutation queue.
//!
//! `GridWorld` is the reference [`CellSource`]: two flat layers of cells,
//! per-cell not-ready marking to model streamed regions, and a queue of
//! [`CellChange`] records the host drains into the render cache each tick
//! (instead of a publish/subscribe event bus).

use std::collections::HashSet;

use tracing::debug;

use crate::cell::{Cell, Layer};
use crate::source::{CellChange, CellQuery, CellSource};

/// In-memory cell grid for both layers.
#[derive(Debug)]
pub struct GridWorld {
    width: u32,
    height: u32,
    tiles: Vec<Cell>,
    walls: Vec<Cell>,
    /// Cells whose backing data is not yet available.
    pending: HashSet<(i32, i32)>,
    /// Mutations recorded since the last drain.
    changes: Vec<CellChange>,
}

impl GridWorld {
    /// Creates an empty world of the given size in cells.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![Cell::default(); count],
            walls: vec![Cell::default(); count],
            pending: HashSet::new(),
            changes: Vec::new(),
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<Cell> {
        match layer {
            Layer::Tile => &mut self.tiles,
            Layer::Wall => &mut self.walls,
        }
    }

    /// Writes a cell and records the mutation. Returns false out of bounds.
    pub fn set_cell(&mut self, layer: Layer, x: i32, y: i32, cell: Cell) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        self.layer_mut(layer)[idx] = cell;
        self.changes.push(CellChange { layer, x, y });
        true
    }

    /// Writes a tile cell and records the mutation.
    pub fn set_tile(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        self.set_cell(Layer::Tile, x, y, cell)
    }

    /// Writes a wall cell and records the mutation.
    pub fn set_wall(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        self.set_cell(Layer::Wall, x, y, cell)
    }

    /// Clears a cell back to empty and records the mutation.
    pub fn clear_cell(&mut self, layer: Layer, x: i32, y: i32) -> bool {
        self.set_cell(layer, x, y, Cell::default())
    }

    /// Clears a tile cell and records the mutation.
    pub fn clear_tile(&mut self, x: i32, y: i32) -> bool {
        self.clear_cell(Layer::Tile, x, y)
    }

    /// Clears a wall cell and records the mutation.
    pub fn clear_wall(&mut self, x: i32, y: i32) -> bool {
        self.clear_cell(Layer::Wall, x, y)
    }

    /// Marks a cell's backing data as not yet available.
    pub fn mark_pending(&mut self, x: i32, y: i32) {
        self.pending.insert((x, y));
    }

    /// Marks a cell's backing data as available again.
    pub fn mark_ready(&mut self, x: i32, y: i32) {
        self.pending.remove(&(x, y));
    }

    /// Drains all mutations recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<CellChange> {
        if !self.changes.is_empty() {
            debug!("draining {} cell changes", self.changes.len());
        }
        std::mem::take(&mut self.changes)
    }

    /// Number of mutations currently queued.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }
}

impl CellSource for GridWorld {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cell(&self, layer: Layer, x: i32, y: i32) -> CellQuery {
        if self.pending.contains(&(x, y)) {
            return CellQuery::NotReady;
        }
        let Some(idx) = self.index(x, y) else {
            return CellQuery::Empty;
        };
        let cell = match layer {
            Layer::Tile => self.tiles[idx],
            Layer::Wall => self.walls[idx],
        };
        if cell.is_empty() {
            CellQuery::Empty
        } else {
            CellQuery::Ready(cell)
        }
    }
}
