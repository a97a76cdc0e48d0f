//! A single cached chunk.

use mural_common::{ChunkCoord, MuralError, MuralResult};
use mural_world::DynamicKind;

use crate::buffer::{BufferId, PixelBuffer};

/// A cell excluded from the cached bitmap, redrawn live every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicPoint {
    /// World cell X coordinate
    pub x: i32,
    /// World cell Y coordinate
    pub y: i32,
    /// Why the cell is dynamic
    pub kind: DynamicKind,
}

/// One cached region: a fixed-size off-screen bitmap plus the cells
/// excluded from it.
///
/// The buffer is allocated exactly once when the chunk enters the window
/// and released exactly once when it leaves. Using the buffer after
/// release is a cache-consistency bug and surfaces as
/// [`MuralError::BufferDisposed`].
#[derive(Debug)]
pub struct RenderChunk {
    coord: ChunkCoord,
    buffer: Option<PixelBuffer>,
    dynamic_points: Vec<DynamicPoint>,
    populated: bool,
}

impl RenderChunk {
    /// Creates a chunk with a freshly allocated buffer.
    #[must_use]
    pub fn new(coord: ChunkCoord, chunk_px: u32) -> Self {
        Self {
            coord,
            buffer: Some(PixelBuffer::new(chunk_px, chunk_px)),
            dynamic_points: Vec::new(),
            populated: false,
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Whether a population attempt has completed for the current content.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Sets the populated flag.
    pub fn set_populated(&mut self, populated: bool) {
        self.populated = populated;
    }

    /// Read access to the bitmap.
    pub fn buffer(&self) -> MuralResult<&PixelBuffer> {
        self.buffer.as_ref().ok_or(MuralError::BufferDisposed {
            x: self.coord.x,
            y: self.coord.y,
        })
    }

    /// Write access to the bitmap.
    pub fn buffer_mut(&mut self) -> MuralResult<&mut PixelBuffer> {
        self.buffer.as_mut().ok_or(MuralError::BufferDisposed {
            x: self.coord.x,
            y: self.coord.y,
        })
    }

    /// The bitmap's allocation handle, if not yet released.
    #[must_use]
    pub fn buffer_id(&self) -> Option<BufferId> {
        self.buffer.as_ref().map(PixelBuffer::id)
    }

    /// Takes the bitmap out of the chunk. Second and later calls return
    /// `None`, so release happens at most once.
    pub fn release_buffer(&mut self) -> Option<PixelBuffer> {
        self.buffer.take()
    }

    /// The cells excluded from the bitmap.
    #[must_use]
    pub fn dynamic_points(&self) -> &[DynamicPoint] {
        &self.dynamic_points
    }

    /// Appends a dynamic point.
    pub fn push_dynamic_point(&mut self, point: DynamicPoint) {
        self.dynamic_points.push(point);
    }

    /// Clears the dynamic point list (start of a population attempt).
    pub fn clear_dynamic_points(&mut self) {
        self.dynamic_points.clear();
    }
}
