//! Cell data structures.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Cell flag bits.
pub mod flags {
    /// Content animates every frame; always classified as dynamic.
    pub const ANIMATED: u8 = 1 << 0;
    /// Content emits light (sampled live during dynamic draws).
    pub const EMITS_LIGHT: u8 = 1 << 1;
    /// Content blocks light propagation.
    pub const BLOCKS_LIGHT: u8 = 1 << 2;
}

/// One grid position of one layer.
///
/// The format is deliberately small and `Pod` so whole layers can be
/// treated as flat byte slices:
/// - `content` identifies the content type (0 = empty)
/// - `variant` selects a visual variant within the content type
/// - `flags` carries per-cell state bits (see [`flags`])
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Cell {
    /// Content type ID (0 = empty)
    pub content: u16,
    /// Visual variant within the content type
    pub variant: u8,
    /// Cell flags (see [`flags`])
    pub flags: u8,
}

impl Cell {
    /// Creates a new cell with the given content type.
    #[must_use]
    pub const fn new(content: u16) -> Self {
        Self {
            content,
            variant: 0,
            flags: 0,
        }
    }

    /// Checks if this cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content == 0
    }

    /// Checks if this cell carries the animated flag.
    #[must_use]
    pub const fn is_animated(&self) -> bool {
        self.flags & flags::ANIMATED != 0
    }

    /// Checks if this cell emits light.
    #[must_use]
    pub const fn emits_light(&self) -> bool {
        self.flags & flags::EMITS_LIGHT != 0
    }

    /// Returns the cell with a flag bit set.
    #[must_use]
    pub const fn with_flag(mut self, flag: u8) -> Self {
        self.flags |= flag;
        self
    }

    /// Returns the cell with the given variant.
    #[must_use]
    pub const fn with_variant(mut self, variant: u8) -> Self {
        self.variant = variant;
        self
    }
}

/// The two independently cached layers of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Foreground tile layer
    Tile,
    /// Background wall layer
    Wall,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<Cell>(), 4);
    }

    #[test]
    fn test_cell_default_is_empty() {
        assert!(Cell::default().is_empty());
    }

    #[test]
    fn test_cell_flags() {
        let cell = Cell::new(7)
            .with_flag(flags::ANIMATED)
            .with_flag(flags::EMITS_LIGHT);
        assert!(cell.is_animated());
        assert!(cell.emits_light());
        assert!(!Cell::new(7).is_animated());
    }

    #[test]
    fn test_cell_variant() {
        assert_eq!(Cell::new(3).with_variant(5).variant, 5);
    }
}
