//! Frame compositing.
//!
//! Three passes build the screen image from cache state:
//! 1. blit every loaded chunk bitmap that intersects the screen,
//! 2. modulate the result through the lighting grid (with the sub-cell
//!    correction for the camera's fractional cell position, and optional
//!    vision override),
//! 3. draw every visible dynamic point live on top.

use mural_common::{CellCoord, MuralResult};
use mural_world::{CellQuery, CellSource, Layer};

use crate::buffer::{modulate, PixelBuffer};
use crate::cache::ChunkCache;
use crate::camera::Camera;
use crate::config::RenderCacheConfig;
use crate::lighting::LightGrid;
use crate::raster::{CellDraw, CellRasterizer, DrawMode};

/// Blits every loaded chunk whose world rectangle intersects the screen
/// into the target at `chunk_origin − camera_position`.
///
/// Returns the number of chunks blitted.
pub fn blit_chunks(
    cache: &ChunkCache,
    camera: &Camera,
    config: &RenderCacheConfig,
    target: &mut PixelBuffer,
) -> MuralResult<usize> {
    let mut blitted = 0;
    for chunk in cache.chunks() {
        if !camera.chunk_on_screen(chunk.coord(), config) {
            continue;
        }
        let (ox, oy) = chunk.coord().origin_px(config.chunk_size, config.cell_size);
        let dest_x = (ox as f32 - camera.position.0).floor() as i32;
        let dest_y = (oy as f32 - camera.position.1).floor() as i32;
        chunk.buffer()?.blit_into(target, dest_x, dest_y);
        blitted += 1;
    }
    Ok(blitted)
}

/// Modulates the target through the lighting grid.
///
/// Each screen pixel maps to the world cell under it; the mapping is
/// precomputed per column and per row from the camera position, so chunk
/// pixels line up with lighting cells even though the camera is not
/// cell-aligned. When an override grid is supplied (a vision-enhancing
/// state is active), the brighter of the two colors wins per cell.
pub fn apply_lighting(
    target: &mut PixelBuffer,
    light: &LightGrid,
    light_override: Option<&LightGrid>,
    camera: &Camera,
    config: &RenderCacheConfig,
) {
    let cell_size = config.cell_size as f32;
    let cols: Vec<i32> = (0..target.width())
        .map(|x| ((camera.position.0 + x as f32) / cell_size).floor() as i32)
        .collect();
    let rows: Vec<i32> = (0..target.height())
        .map(|y| ((camera.position.1 + y as f32) / cell_size).floor() as i32)
        .collect();

    let width = target.width() as usize;
    let pixels = target.pixels_mut();
    for (row, &cell_y) in rows.iter().enumerate() {
        for (col, &cell_x) in cols.iter().enumerate() {
            let cell = CellCoord::new(cell_x, cell_y);
            let mut color = light.sample_cell(cell);
            if let Some(overrides) = light_override {
                let o = overrides.sample_cell(cell);
                color = [color[0].max(o[0]), color[1].max(o[1]), color[2].max(o[2])];
            }
            let idx = row * width + col;
            pixels[idx] = modulate(pixels[idx], color);
        }
    }
}

/// Draws every dynamic point of every visible loaded chunk in live mode.
///
/// The cell is re-queried at draw time so live effects see current data;
/// a point whose cell has since emptied or gone not-ready is skipped (the
/// pending repopulation will drop it from the list).
///
/// Returns the number of points drawn.
pub fn draw_dynamic<W, R>(
    cache: &ChunkCache,
    layer: Layer,
    world: &W,
    camera: &Camera,
    config: &RenderCacheConfig,
    rasterizer: &R,
    tick: u64,
    target: &mut PixelBuffer,
) -> MuralResult<usize>
where
    W: CellSource + ?Sized,
    R: CellRasterizer + ?Sized,
{
    let mut drawn = 0;
    let cell_size = config.cell_size as f32;
    for chunk in cache.chunks() {
        if !camera.chunk_on_screen(chunk.coord(), config) {
            continue;
        }
        for point in chunk.dynamic_points() {
            if !world.in_bounds(point.x, point.y) {
                continue;
            }
            let CellQuery::Ready(cell) = world.cell(layer, point.x, point.y) else {
                continue;
            };
            let draw = CellDraw {
                layer,
                cell,
                x: point.x,
                y: point.y,
                dest_px: (
                    (point.x as f32 * cell_size - camera.position.0).floor() as i32,
                    (point.y as f32 * cell_size - camera.position.1).floor() as i32,
                ),
                mode: DrawMode::Live,
                tick,
                cell_size: config.cell_size,
            };
            rasterizer.draw_cell(&draw, target)?;
            drawn += 1;
        }
    }
    Ok(drawn)
}
