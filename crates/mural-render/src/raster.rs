//! The cell rasterization seam.
//!
//! Mural does not know how to draw content; the host supplies a
//! [`CellRasterizer`]. The same routine serves two modes: `Cached` draws
//! into a chunk bitmap during population, `Live` draws into the screen
//! target every frame with per-frame effects (animation frame selection,
//! live light sampling).

use mural_common::MuralResult;
use mural_world::{Cell, Layer};

use crate::buffer::{pack_rgba, PixelBuffer};

/// Rasterization mode for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Population-time draw into a chunk bitmap; no per-frame effects.
    Cached,
    /// Per-frame draw of a dynamic point; animation and live effects apply.
    Live,
}

/// One cell draw request.
#[derive(Debug, Clone, Copy)]
pub struct CellDraw {
    /// Layer being drawn
    pub layer: Layer,
    /// The cell's data
    pub cell: Cell,
    /// World cell X coordinate
    pub x: i32,
    /// World cell Y coordinate
    pub y: i32,
    /// Top-left pixel position in the target buffer
    pub dest_px: (i32, i32),
    /// Cached or live draw
    pub mode: DrawMode,
    /// Frame tick, for animation frame selection in live mode
    pub tick: u64,
    /// Cell size in pixels
    pub cell_size: u32,
}

/// Draws one cell of one layer into a pixel buffer.
pub trait CellRasterizer {
    /// Draws one cell. Implementations clip against the target themselves
    /// (or use the clipped [`PixelBuffer`] primitives).
    fn draw_cell(&self, draw: &CellDraw, target: &mut PixelBuffer) -> MuralResult<()>;
}

/// Deterministic reference rasterizer.
///
/// Renders every cell as a solid color derived from its content type,
/// walls at half brightness. In live mode, animated cells cycle their
/// brightness with the frame tick so animation is observable in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatRasterizer;

impl FlatRasterizer {
    /// Creates a new flat rasterizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn base_color(layer: Layer, cell: Cell) -> [u8; 3] {
        let c = cell.content;
        let r = (c.wrapping_mul(37) >> 2) as u8 | 0x20;
        let g = (c.wrapping_mul(71) >> 2) as u8 | 0x20;
        let b = (c.wrapping_mul(113) >> 2) as u8 | 0x20;
        match layer {
            Layer::Tile => [r, g, b],
            Layer::Wall => [r / 2, g / 2, b / 2],
        }
    }
}

impl CellRasterizer for FlatRasterizer {
    fn draw_cell(&self, draw: &CellDraw, target: &mut PixelBuffer) -> MuralResult<()> {
        let [mut r, mut g, mut b] = Self::base_color(draw.layer, draw.cell);
        if draw.mode == DrawMode::Live && draw.cell.is_animated() {
            // Four-step brightness cycle standing in for animation frames
            let phase = ((draw.tick + u64::from(draw.cell.variant)) % 4) as u8;
            let boost = phase * 16;
            r = r.saturating_add(boost);
            g = g.saturating_add(boost);
            b = b.saturating_add(boost);
        }
        target.fill_rect(
            draw.dest_px.0,
            draw.dest_px.1,
            draw.cell_size,
            draw.cell_size,
            pack_rgba(r, g, b, 255),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::unpack_rgba;
    use mural_world::flags;

    fn draw(cell: Cell, layer: Layer, mode: DrawMode, tick: u64) -> u32 {
        let mut target = PixelBuffer::new(4, 4);
        let raster = FlatRasterizer::new();
        raster
            .draw_cell(
                &CellDraw {
                    layer,
                    cell,
                    x: 0,
                    y: 0,
                    dest_px: (0, 0),
                    mode,
                    tick,
                    cell_size: 4,
                },
                &mut target,
            )
            .expect("draw");
        target.get(1, 1).expect("pixel")
    }

    #[test]
    fn test_cached_draw_is_deterministic() {
        let cell = Cell::new(7);
        assert_eq!(
            draw(cell, Layer::Tile, DrawMode::Cached, 0),
            draw(cell, Layer::Tile, DrawMode::Cached, 99)
        );
    }

    #[test]
    fn test_walls_are_darker_than_tiles() {
        let cell = Cell::new(7);
        let tile = unpack_rgba(draw(cell, Layer::Tile, DrawMode::Cached, 0));
        let wall = unpack_rgba(draw(cell, Layer::Wall, DrawMode::Cached, 0));
        assert!(wall[0] < tile[0]);
    }

    #[test]
    fn test_live_animated_cells_vary_with_tick() {
        let cell = Cell::new(7).with_flag(flags::ANIMATED);
        let a = draw(cell, Layer::Tile, DrawMode::Live, 0);
        let b = draw(cell, Layer::Tile, DrawMode::Live, 1);
        assert_ne!(a, b);
        // Cycle repeats every four ticks
        assert_eq!(a, draw(cell, Layer::Tile, DrawMode::Live, 4));
    }

    #[test]
    fn test_live_static_cells_match_cached() {
        let cell = Cell::new(7);
        assert_eq!(
            draw(cell, Layer::Tile, DrawMode::Cached, 0),
            draw(cell, Layer::Tile, DrawMode::Live, 3)
        );
    }
}
