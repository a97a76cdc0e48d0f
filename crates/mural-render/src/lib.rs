//! # Mural Render
//!
//! A chunked render cache for large, mostly-static 2D cell grids.
//!
//! Instead of redrawing every visible cell every frame, fixed-size spatial
//! regions ("chunks") are rasterized once into off-screen bitmaps and
//! blitted until a mutation invalidates them:
//! - `ChunkCache` windows the loaded set against the camera and owns the
//!   dirty/repopulate lifecycle with bounded retry budgets
//! - `LayerCache` populates chunks for one layer, separating static cells
//!   (baked into the bitmap) from dynamic points (redrawn every frame)
//! - `LightGrid` is a per-cell illumination raster filled in parallel each
//!   frame and composited over the cached bitmaps, with vision overrides
//! - `FrameRenderer` orchestrates the per-frame pipeline and owns the tick
//!   that throttles population batches
//!
//! ## Concurrency
//!
//! Everything runs on the main thread except the lighting fill, which fans
//! out per-row across a worker pool and joins before the grid is read.
//! Chunk population is deliberately sequential: it draws into shared
//! render-target state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod cache;
pub mod camera;
pub mod chunk;
pub mod compose;
pub mod config;
pub mod frame;
pub mod layer;
pub mod lighting;
pub mod raster;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::buffer::*;
    pub use crate::cache::*;
    pub use crate::camera::*;
    pub use crate::chunk::*;
    pub use crate::config::*;
    pub use crate::frame::*;
    pub use crate::layer::*;
    pub use crate::lighting::*;
    pub use crate::raster::*;
}

pub use prelude::*;
