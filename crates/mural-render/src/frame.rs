//! Per-frame orchestration.
//!
//! One `FrameRenderer` drives both layer caches from a single main-thread
//! loop: window reconciliation, throttled population, chunk compositing,
//! the lighting pass, and live draws of dynamic points. The frame tick is
//! owned here and passed down; the only parallel work is the lighting
//! fill, which joins inside [`FrameRenderer::begin_frame`] before anything
//! reads the grid.
//!
//! Hosts call [`begin_frame`](FrameRenderer::begin_frame) once per frame,
//! then [`render`](FrameRenderer::render) once per layer draw phase; each
//! call leaves the screen composite target populated for presentation.

use mural_common::MuralResult;
use mural_world::{CellChange, CellQuery, CellSource, ClassRegistry, Layer};
use tracing::{debug, info};

use crate::buffer::{PixelBuffer, TRANSPARENT};
use crate::camera::Camera;
use crate::compose;
use crate::config::RenderCacheConfig;
use crate::layer::LayerCache;
use crate::lighting::{LightGrid, LightSampler, VisionState};
use crate::raster::{CellDraw, CellRasterizer, DrawMode};

/// Counters for the most recent frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Frame tick.
    pub tick: u64,
    /// Chunks blitted to the screen target.
    pub chunks_blitted: usize,
    /// Dynamic points drawn live.
    pub dynamic_drawn: usize,
    /// Chunks populated this frame (both layers).
    pub populated: usize,
    /// Population attempts aborted on not-ready data this frame.
    pub aborted: usize,
}

/// Drives the chunk caches, lighting, and compositing once per frame.
#[derive(Debug)]
pub struct FrameRenderer {
    config: RenderCacheConfig,
    tick: u64,
    tiles: LayerCache,
    walls: LayerCache,
    light: LightGrid,
    light_override: LightGrid,
    apply_override: bool,
    target: PixelBuffer,
    viewport: (u32, u32),
    stats: FrameStats,
}

impl FrameRenderer {
    /// Creates a renderer for the given viewport size.
    pub fn new(config: RenderCacheConfig, viewport: (u32, u32)) -> MuralResult<Self> {
        config.validate()?;
        Ok(Self {
            tick: 0,
            tiles: LayerCache::new(Layer::Tile, &config),
            walls: LayerCache::new(Layer::Wall, &config),
            light: LightGrid::new(viewport, &config),
            light_override: LightGrid::new(viewport, &config),
            apply_override: false,
            target: PixelBuffer::new(viewport.0, viewport.1),
            viewport,
            stats: FrameStats::default(),
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderCacheConfig {
        &self.config
    }

    /// The current frame tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Counters for the most recent frame.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The screen composite target left populated by [`render`](Self::render).
    #[must_use]
    pub const fn target(&self) -> &PixelBuffer {
        &self.target
    }

    /// The lighting grid (read-only outside the fill).
    #[must_use]
    pub const fn light(&self) -> &LightGrid {
        &self.light
    }

    /// One layer's cache, for inspection.
    #[must_use]
    pub const fn layer_cache(&self, layer: Layer) -> &LayerCache {
        match layer {
            Layer::Tile => &self.tiles,
            Layer::Wall => &self.walls,
        }
    }

    /// Handles a viewport resolution change: the lighting grids and the
    /// screen target are reallocated at the new size. Chunk bitmaps are
    /// fixed in world units and keep their allocations.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if self.viewport == (width, height) {
            return;
        }
        info!(
            "viewport resize {}x{} -> {width}x{height}",
            self.viewport.0, self.viewport.1
        );
        self.viewport = (width, height);
        self.light = LightGrid::new(self.viewport, &self.config);
        self.light_override = LightGrid::new(self.viewport, &self.config);
        self.target = PixelBuffer::new(width, height);
    }

    /// Starts a frame: advances the tick, reconciles targets with the
    /// camera's viewport, and fills the lighting grid (in parallel, joined
    /// before return). When any vision flag is active the override grid is
    /// filled as well and blended during compositing.
    pub fn begin_frame<S, O>(
        &mut self,
        camera: &Camera,
        sampler: &S,
        vision: VisionState,
        override_sampler: Option<&O>,
    ) where
        S: LightSampler + ?Sized,
        O: LightSampler + ?Sized,
    {
        self.tick += 1;
        self.stats = FrameStats {
            tick: self.tick,
            ..Default::default()
        };
        self.handle_resize(camera.viewport.0, camera.viewport.1);

        let margin = self.config.light_margin as i32;
        let mut origin = camera.first_visible_cell(self.config.cell_size);
        origin.x -= margin;
        origin.y -= margin;
        self.light.fill(origin, sampler);

        self.apply_override = vision.any() && override_sampler.is_some();
        if self.apply_override {
            if let Some(overrides) = override_sampler {
                self.light_override.fill(origin, overrides);
            }
        }
    }

    /// Routes drained mutation records into the matching layer cache.
    pub fn apply_changes(&mut self, changes: &[CellChange]) {
        for change in changes {
            let cell = mural_common::CellCoord::new(change.x, change.y);
            match change.layer {
                Layer::Tile => self.tiles.cache_mut().mark_cell_changed(cell),
                Layer::Wall => self.walls.cache_mut().mark_cell_changed(cell),
            }
        }
    }

    /// Renders one layer into the screen composite target.
    ///
    /// With the cache enabled: window sync, throttled population, chunk
    /// blitting, lighting, dynamic-point live draws. With the cache
    /// disabled: every visible cell is drawn live (the non-cached path),
    /// with the same lighting pass. Fatal only on a cache-consistency
    /// violation ([`mural_common::MuralError::BufferDisposed`]).
    pub fn render<W, R>(
        &mut self,
        layer: Layer,
        world: &W,
        registry: &ClassRegistry,
        rasterizer: &R,
        camera: &Camera,
    ) -> MuralResult<()>
    where
        W: CellSource + ?Sized,
        R: CellRasterizer + ?Sized,
    {
        self.target.clear(TRANSPARENT);

        if !self.config.enabled {
            return self.render_uncached(layer, world, rasterizer, camera);
        }

        let layer_cache = match layer {
            Layer::Tile => &mut self.tiles,
            Layer::Wall => &mut self.walls,
        };

        layer_cache.sync_window(camera.chunk_window(&self.config));
        let population =
            layer_cache.run_population(self.tick, world, registry, rasterizer, &self.config)?;
        self.stats.populated += population.completed;
        self.stats.aborted += population.aborted;

        self.stats.chunks_blitted +=
            compose::blit_chunks(layer_cache.cache(), camera, &self.config, &mut self.target)?;
        compose::apply_lighting(
            &mut self.target,
            &self.light,
            self.apply_override.then_some(&self.light_override),
            camera,
            &self.config,
        );
        self.stats.dynamic_drawn += compose::draw_dynamic(
            layer_cache.cache(),
            layer,
            world,
            camera,
            &self.config,
            rasterizer,
            self.tick,
            &mut self.target,
        )?;
        debug!(
            "rendered {layer:?}: {} chunks, {} dynamic points",
            self.stats.chunks_blitted, self.stats.dynamic_drawn
        );
        Ok(())
    }

    /// The pre-existing non-cached path: every visible in-bounds cell is
    /// drawn live, then lit.
    fn render_uncached<W, R>(
        &mut self,
        layer: Layer,
        world: &W,
        rasterizer: &R,
        camera: &Camera,
    ) -> MuralResult<()>
    where
        W: CellSource + ?Sized,
        R: CellRasterizer + ?Sized,
    {
        let cell_size = self.config.cell_size;
        let first = camera.first_visible_cell(cell_size);
        let last_x = ((camera.position.0 + camera.viewport.0 as f32) / cell_size as f32).floor() as i32;
        let last_y = ((camera.position.1 + camera.viewport.1 as f32) / cell_size as f32).floor() as i32;

        for y in first.y..=last_y {
            for x in first.x..=last_x {
                if !world.in_bounds(x, y) {
                    continue;
                }
                let CellQuery::Ready(cell) = world.cell(layer, x, y) else {
                    continue;
                };
                let draw = CellDraw {
                    layer,
                    cell,
                    x,
                    y,
                    dest_px: (
                        (x as f32 * cell_size as f32 - camera.position.0).floor() as i32,
                        (y as f32 * cell_size as f32 - camera.position.1).floor() as i32,
                    ),
                    mode: DrawMode::Live,
                    tick: self.tick,
                    cell_size,
                };
                rasterizer.draw_cell(&draw, &mut self.target)?;
            }
        }
        compose::apply_lighting(
            &mut self.target,
            &self.light,
            self.apply_override.then_some(&self.light_override),
            camera,
            &self.config,
        );
        Ok(())
    }
}
