//! Per-layer population over the shared cache lifecycle.
//!
//! Both layers (tiles, walls) run the same lifecycle; the layer tag plus
//! the host's rasterizer and the classification registry are the only
//! layer-specific parts. A population batch fully re-derives each queued
//! chunk: the bitmap is cleared, every footprint cell is re-classified,
//! dynamic cells are listed instead of drawn, static cells are rasterized
//! in cached mode. Hitting a not-ready cell aborts the attempt at once and
//! requeues the chunk with its retry budget decremented; the cleared
//! bitmap guarantees nothing half-drawn is ever shown.

use mural_common::{ChunkCoord, ChunkRect, MuralResult};
use mural_world::{CellClass, CellQuery, CellSource, ClassRegistry, Layer};
use tracing::{debug, trace};

use crate::cache::ChunkCache;
use crate::chunk::DynamicPoint;
use crate::config::RenderCacheConfig;
use crate::raster::{CellDraw, CellRasterizer, DrawMode};

/// Outcome of one chunk population attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateOutcome {
    /// Every footprint cell was processed.
    Completed,
    /// A cell's backing data was not ready; the attempt was aborted.
    DataNotReady,
}

/// Counters for one population batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationStats {
    /// Chunks taken from the queues this batch.
    pub attempted: usize,
    /// Chunks fully populated this batch.
    pub completed: usize,
    /// Chunks aborted on not-ready data this batch.
    pub aborted: usize,
}

/// One layer's view of the chunk cache.
#[derive(Debug)]
pub struct LayerCache {
    layer: Layer,
    cache: ChunkCache,
}

impl LayerCache {
    /// Creates a cache for one layer.
    #[must_use]
    pub fn new(layer: Layer, config: &RenderCacheConfig) -> Self {
        Self {
            layer,
            cache: ChunkCache::new(config.chunk_size, config.cell_size, config.retry_budget),
        }
    }

    /// The layer this cache renders.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// Read access to the underlying chunk cache.
    #[must_use]
    pub const fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    /// Mutable access to the underlying chunk cache.
    pub fn cache_mut(&mut self) -> &mut ChunkCache {
        &mut self.cache
    }

    /// Reconciles the cache against the current chunk window.
    pub fn sync_window(&mut self, window: ChunkRect) {
        self.cache.sync_window(window);
    }

    /// Runs one throttled population batch.
    ///
    /// Gated on the orchestrator's tick: batches run only every
    /// `populate_interval` frames, bounding per-frame rasterization cost.
    pub fn run_population<W, R>(
        &mut self,
        tick: u64,
        world: &W,
        registry: &ClassRegistry,
        rasterizer: &R,
        config: &RenderCacheConfig,
    ) -> MuralResult<PopulationStats>
    where
        W: CellSource + ?Sized,
        R: CellRasterizer + ?Sized,
    {
        let mut stats = PopulationStats::default();
        if tick % config.populate_interval != 0 {
            return Ok(stats);
        }

        let batch = self.cache.take_batch();
        if batch.is_empty() {
            return Ok(stats);
        }
        debug!("populating {} {:?} chunks", batch.len(), self.layer);

        for coord in batch {
            stats.attempted += 1;
            match self.populate_chunk(coord, world, registry, rasterizer, config)? {
                PopulateOutcome::Completed => {
                    self.cache.record_success(coord);
                    stats.completed += 1;
                }
                PopulateOutcome::DataNotReady => {
                    self.cache.record_failure(coord);
                    stats.aborted += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Populates one chunk from scratch.
    fn populate_chunk<W, R>(
        &mut self,
        coord: ChunkCoord,
        world: &W,
        registry: &ClassRegistry,
        rasterizer: &R,
        config: &RenderCacheConfig,
    ) -> MuralResult<PopulateOutcome>
    where
        W: CellSource + ?Sized,
        R: CellRasterizer + ?Sized,
    {
        let layer = self.layer;
        let Some(chunk) = self.cache.get_mut(coord) else {
            // Unloaded between queueing and the batch; nothing to do.
            trace!("skipping population of unloaded chunk ({}, {})", coord.x, coord.y);
            return Ok(PopulateOutcome::Completed);
        };

        chunk.set_populated(false);
        chunk.clear_dynamic_points();
        chunk.buffer_mut()?.clear(crate::buffer::TRANSPARENT);

        let origin = coord.origin_cell(config.chunk_size);
        let size = config.chunk_size as i32;
        for local_y in 0..size {
            for local_x in 0..size {
                let x = origin.x + local_x;
                let y = origin.y + local_y;
                if !world.in_bounds(x, y) {
                    continue;
                }
                match world.cell(layer, x, y) {
                    CellQuery::NotReady => {
                        // Later cells stay undrawn; the buffer was cleared
                        // at the start of the attempt.
                        return Ok(PopulateOutcome::DataNotReady);
                    }
                    CellQuery::Empty => {}
                    CellQuery::Ready(cell) => match registry.classify(layer, cell) {
                        CellClass::Dynamic(kind) => {
                            chunk.push_dynamic_point(DynamicPoint { x, y, kind });
                        }
                        CellClass::Static => {
                            let draw = CellDraw {
                                layer,
                                cell,
                                x,
                                y,
                                dest_px: (
                                    local_x * config.cell_size as i32,
                                    local_y * config.cell_size as i32,
                                ),
                                mode: DrawMode::Cached,
                                tick: 0,
                                cell_size: config.cell_size,
                            };
                            rasterizer.draw_cell(&draw, chunk.buffer_mut()?)?;
                        }
                    },
                }
            }
        }

        chunk.set_populated(true);
        Ok(PopulateOutcome::Completed)
    }
}
