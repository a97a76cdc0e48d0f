//! Static/dynamic content classification.
//!
//! Population asks, for every cell, whether its appearance can be baked
//! into the chunk bitmap (static) or must be redrawn every frame
//! (dynamic). The answer comes from an immutable base table plus a
//! runtime-extendable map, both keyed by `(layer, content)`, queried
//! through the pure [`ClassRegistry::classify`] — there is no ambient
//! global registry. Cells carrying the `ANIMATED` flag are dynamic
//! regardless of the tables (the auto-detected set).

use std::collections::HashMap;

use tracing::debug;

use crate::cell::{Cell, Layer};

/// Category of a dynamic (redrawn-every-frame) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicKind {
    /// Cycles through animation frames.
    Animated,
    /// Samples live light when drawn (glowing content).
    Luminous,
    /// Content with bespoke live drawing (particle emitters and the like).
    Special,
}

/// Classification of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    /// Rasterized once into the chunk bitmap.
    Static,
    /// Excluded from the bitmap, drawn live every frame.
    Dynamic(DynamicKind),
}

impl CellClass {
    /// Checks whether this classification is dynamic.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

/// Base table entry: `(layer, content, kind)`.
pub type BaseEntry = (Layer, u16, DynamicKind);

/// Content classification registry.
///
/// Hosts call [`register`](Self::register) once per dynamic content type at
/// content-registration time; population queries [`classify`](Self::classify)
/// for every cell it visits. Runtime registrations shadow the base table.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    base: &'static [BaseEntry],
    extra: HashMap<(Layer, u16), DynamicKind>,
}

impl ClassRegistry {
    /// Creates an empty registry (flag auto-detection only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with an immutable base table.
    #[must_use]
    pub fn with_base(base: &'static [BaseEntry]) -> Self {
        Self {
            base,
            extra: HashMap::new(),
        }
    }

    /// Registers a content type as dynamic on one layer.
    pub fn register(&mut self, layer: Layer, content: u16, kind: DynamicKind) {
        debug!("registered dynamic content {content} on {layer:?} as {kind:?}");
        self.extra.insert((layer, content), kind);
    }

    /// Number of runtime-registered entries.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.extra.len()
    }

    /// Classifies one cell of one layer.
    ///
    /// Pure lookup: runtime map first, then the base table, then the
    /// cell's own `ANIMATED` flag. Classification is re-evaluated on every
    /// repopulation, so it need not be stable across time.
    #[must_use]
    pub fn classify(&self, layer: Layer, cell: Cell) -> CellClass {
        if let Some(&kind) = self.extra.get(&(layer, cell.content)) {
            return CellClass::Dynamic(kind);
        }
        for &(l, content, kind) in self.base {
            if l == layer && content == cell.content {
                return CellClass::Dynamic(kind);
            }
        }
        if cell.is_animated() {
            return CellClass::Dynamic(DynamicKind::Animated);
        }
        CellClass::Static
    }
}
