//! Render cache configuration.
//!
//! All spatial parameters of the cache live here: chunk footprint, cell
//! pixel size, window margin, population throttle, and retry budget.
//! Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::path::Path;

use mural_common::{MuralError, MuralResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Render cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderCacheConfig {
    /// Whether the chunk cache is active. When false the non-cached
    /// renderer path is used instead; population and compositing never run.
    pub enabled: bool,
    /// Chunk footprint per axis, in cells.
    pub chunk_size: u32,
    /// Cell size per axis, in pixels.
    pub cell_size: u32,
    /// Window margin around the visible screen rectangle, in chunks.
    pub margin: u32,
    /// Population batches run once every this many frames.
    pub populate_interval: u64,
    /// Failed population attempts allowed per chunk before giving up.
    pub retry_budget: u8,
    /// Lighting grid margin around the visible cells, per side, in cells.
    pub light_margin: u32,
}

impl Default for RenderCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: 20,
            cell_size: 16,
            margin: 1,
            populate_interval: 4,
            retry_budget: 3,
            light_margin: 4,
        }
    }
}

impl RenderCacheConfig {
    /// Chunk footprint per axis, in pixels.
    #[must_use]
    pub const fn chunk_px(&self) -> u32 {
        self.chunk_size * self.cell_size
    }

    /// Validates the configuration.
    pub fn validate(&self) -> MuralResult<()> {
        if self.chunk_size == 0 {
            return Err(MuralError::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.cell_size == 0 {
            return Err(MuralError::InvalidConfig("cell_size must be > 0".into()));
        }
        if self.populate_interval == 0 {
            return Err(MuralError::InvalidConfig(
                "populate_interval must be > 0".into(),
            ));
        }
        if self.retry_budget == 0 {
            return Err(MuralError::InvalidConfig("retry_budget must be > 0".into()));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> MuralResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text).map_err(|e| MuralError::Config(e.to_string()))?;
        config.validate()?;
        info!("loaded render config from {}", path.display());
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> MuralResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| MuralError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }
}
