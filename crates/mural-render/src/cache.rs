//! Chunk cache lifecycle.
//!
//! Owns the coordinate → chunk map and the three pieces of pending-work
//! state: first population, repopulation, and per-chunk retry budgets.
//! Every coordinate is in exactly one of three states: not loaded, loaded
//! and clean, or loaded with a pending (re)population. All mutation happens
//! on the main thread.

use std::collections::{HashMap, HashSet};

use mural_common::{CellCoord, ChunkCoord, ChunkRect};
use tracing::{debug, warn};

use crate::chunk::RenderChunk;

/// Counters describing the cache's current and per-sync state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Chunks currently loaded.
    pub loaded: usize,
    /// Chunks waiting for their first population.
    pub pending_first: usize,
    /// Chunks waiting for repopulation.
    pub pending_repopulation: usize,
    /// Chunks loaded by the last window sync.
    pub loaded_this_sync: usize,
    /// Chunks unloaded by the last window sync.
    pub unloaded_this_sync: usize,
    /// Chunks whose retry budget has been exhausted since creation.
    pub retries_exhausted: usize,
}

/// Maps chunk coordinates to cached chunks and tracks their
/// population lifecycle.
#[derive(Debug)]
pub struct ChunkCache {
    chunk_size: u32,
    chunk_px: u32,
    retry_budget: u8,
    loaded: HashMap<ChunkCoord, RenderChunk>,
    needs_populating: HashSet<ChunkCoord>,
    needs_repopulating: HashSet<ChunkCoord>,
    retry_budgets: HashMap<ChunkCoord, u8>,
    stats: CacheStats,
}

impl ChunkCache {
    /// Creates an empty cache.
    ///
    /// `chunk_size` is the chunk footprint in cells, `cell_size` the cell
    /// size in pixels, `retry_budget` the number of failed population
    /// attempts allowed per chunk before giving up.
    #[must_use]
    pub fn new(chunk_size: u32, cell_size: u32, retry_budget: u8) -> Self {
        Self {
            chunk_size,
            chunk_px: chunk_size * cell_size,
            retry_budget,
            loaded: HashMap::new(),
            needs_populating: HashSet::new(),
            needs_repopulating: HashSet::new(),
            retry_budgets: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Chunk footprint in cells.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Returns current statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats;
        stats.loaded = self.loaded.len();
        stats.pending_first = self.needs_populating.len();
        stats.pending_repopulation = self.needs_repopulating.len();
        stats
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Checks if a coordinate is loaded.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains_key(&coord)
    }

    /// Checks if a coordinate has any pending population work.
    #[must_use]
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.needs_populating.contains(&coord) || self.needs_repopulating.contains(&coord)
    }

    /// Checks if a coordinate is queued for its first population.
    #[must_use]
    pub fn pending_first(&self, coord: ChunkCoord) -> bool {
        self.needs_populating.contains(&coord)
    }

    /// Checks if a coordinate is queued for repopulation.
    #[must_use]
    pub fn pending_repopulation(&self, coord: ChunkCoord) -> bool {
        self.needs_repopulating.contains(&coord)
    }

    /// Gets a loaded chunk.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&RenderChunk> {
        self.loaded.get(&coord)
    }

    /// Gets a loaded chunk mutably.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut RenderChunk> {
        self.loaded.get_mut(&coord)
    }

    /// Iterates all loaded chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &RenderChunk> {
        self.loaded.values()
    }

    /// Reconciles the cache against the current window rectangle.
    ///
    /// Coordinates inside the window are loaded (buffer allocated, queued
    /// for first population). Loaded coordinates outside the window are
    /// unloaded, unless they still have pending population work; those stay
    /// until a batch resolves them.
    pub fn sync_window(&mut self, window: ChunkRect) {
        self.stats.loaded_this_sync = 0;
        self.stats.unloaded_this_sync = 0;

        for coord in window.iter() {
            if !self.loaded.contains_key(&coord) {
                self.load(coord);
                self.stats.loaded_this_sync += 1;
            }
        }

        let to_unload: Vec<ChunkCoord> = self
            .loaded
            .keys()
            .copied()
            .filter(|coord| !window.contains(*coord) && !self.is_pending(*coord))
            .collect();
        self.stats.unloaded_this_sync = to_unload.len();
        for coord in to_unload {
            self.unload(coord);
        }
    }

    /// Loads a coordinate: allocates its chunk and queues first population.
    pub fn load(&mut self, coord: ChunkCoord) {
        if self.loaded.contains_key(&coord) {
            return;
        }
        debug!("loading chunk ({}, {})", coord.x, coord.y);
        self.loaded.insert(coord, RenderChunk::new(coord, self.chunk_px));
        self.needs_populating.insert(coord);
    }

    /// Unloads a coordinate: drains it from every queue, then releases its
    /// buffer exactly once.
    pub fn unload(&mut self, coord: ChunkCoord) {
        self.needs_populating.remove(&coord);
        self.needs_repopulating.remove(&coord);
        self.retry_budgets.remove(&coord);
        if let Some(mut chunk) = self.loaded.remove(&coord) {
            debug!("unloading chunk ({}, {})", coord.x, coord.y);
            drop(chunk.release_buffer());
        }
    }

    /// Handles a single-cell mutation notification.
    ///
    /// Marks at most one chunk coordinate pending; if that coordinate is
    /// not loaded the notification is a no-op (the chunk will be freshly
    /// populated when it eventually loads). A mutation restores a fresh
    /// retry budget.
    pub fn mark_cell_changed(&mut self, cell: CellCoord) {
        let coord = cell.to_chunk(self.chunk_size);
        if !self.loaded.contains_key(&coord) || self.is_pending(coord) {
            return;
        }
        self.needs_repopulating.insert(coord);
        self.retry_budgets.remove(&coord);
    }

    /// Drains both queues for one throttled population batch, first
    /// populations first.
    pub fn take_batch(&mut self) -> Vec<ChunkCoord> {
        let mut batch: Vec<ChunkCoord> = self.needs_populating.drain().collect();
        batch.extend(self.needs_repopulating.drain());
        batch
    }

    /// Records a completed population attempt for a coordinate.
    pub fn record_success(&mut self, coord: ChunkCoord) {
        self.retry_budgets.remove(&coord);
    }

    /// Records a failed (data-not-ready) population attempt.
    ///
    /// Decrements the coordinate's retry budget, seeding it on first
    /// failure, and requeues into the repopulation set while budget
    /// remains. On exhaustion the coordinate is dropped from all queues; a
    /// later mutation event restores a fresh budget.
    pub fn record_failure(&mut self, coord: ChunkCoord) {
        let budget = self.retry_budgets.entry(coord).or_insert(self.retry_budget);
        *budget -= 1;
        if *budget == 0 {
            self.retry_budgets.remove(&coord);
            self.stats.retries_exhausted += 1;
            warn!(
                "chunk ({}, {}) population retries exhausted; waiting for a mutation",
                coord.x, coord.y
            );
        } else {
            self.needs_repopulating.insert(coord);
        }
    }

    /// Unloads everything.
    pub fn clear(&mut self) {
        let coords: Vec<ChunkCoord> = self.loaded.keys().copied().collect();
        for coord in coords {
            self.unload(coord);
        }
        self.needs_populating.clear();
        self.needs_repopulating.clear();
        self.retry_budgets.clear();
    }
}
