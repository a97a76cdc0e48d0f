//! Viewport camera and window math.
//!
//! The camera position is the top-left corner of the screen in world
//! pixels (not a centered anchor) because chunk compositing is
//! integer-pixel based; the fractional part of the position is what the
//! lighting composite corrects for.

use mural_common::{CellCoord, ChunkCoord, ChunkRect};

use crate::config::RenderCacheConfig;

/// Camera over the world, in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Top-left corner of the screen in world pixels.
    pub position: (f32, f32),
    /// Viewport size in pixels (width, height).
    pub viewport: (u32, u32),
}

impl Camera {
    /// Creates a camera at the world origin with the given viewport.
    #[must_use]
    pub const fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: (0.0, 0.0),
            viewport: (viewport_width, viewport_height),
        }
    }

    /// Moves the camera to an absolute world-pixel position.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = (x, y);
    }

    /// Moves the camera by a delta in world pixels.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position.0 += dx;
        self.position.1 += dy;
    }

    /// Sets the viewport size in pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// The first (top-left) cell whose pixels can appear on screen.
    #[must_use]
    pub fn first_visible_cell(&self, cell_size: u32) -> CellCoord {
        let size = cell_size as f32;
        CellCoord::new(
            (self.position.0 / size).floor() as i32,
            (self.position.1 / size).floor() as i32,
        )
    }

    /// The chunk-coordinate rectangle the cache should keep loaded:
    /// the screen rectangle floor-divided by the chunk pixel span,
    /// expanded by the configured margin on every side.
    #[must_use]
    pub fn chunk_window(&self, config: &RenderCacheConfig) -> ChunkRect {
        let span = config.chunk_px() as f32;
        let margin = config.margin as i32;
        let min_x = (self.position.0 / span).floor() as i32 - margin;
        let min_y = (self.position.1 / span).floor() as i32 - margin;
        let max_x = ((self.position.0 + self.viewport.0 as f32) / span).floor() as i32 + margin;
        let max_y = ((self.position.1 + self.viewport.1 as f32) / span).floor() as i32 + margin;
        ChunkRect::new(ChunkCoord::new(min_x, min_y), ChunkCoord::new(max_x, max_y))
    }

    /// Checks whether a chunk's world-pixel rectangle intersects the screen.
    #[must_use]
    pub fn chunk_on_screen(&self, coord: ChunkCoord, config: &RenderCacheConfig) -> bool {
        let span = i64::from(config.chunk_px());
        let (ox, oy) = coord.origin_px(config.chunk_size, config.cell_size);
        let min_x = self.position.0.floor() as i64;
        let min_y = self.position.1.floor() as i64;
        let max_x = min_x + i64::from(self.viewport.0);
        let max_y = min_y + i64::from(self.viewport.1);
        ox + span > min_x && ox < max_x && oy + span > min_y && oy < max_y
    }
}
