//! Error types for Mural.

use thiserror::Error;

/// Top-level error type for Mural operations.
#[derive(Debug, Error)]
pub enum MuralError {
    /// A chunk buffer was used after being released.
    ///
    /// Unreachable by construction (unload drains every queue before
    /// releasing a buffer); if it ever occurs it signals a cache
    /// consistency bug and is fatal, not recovered.
    #[error("chunk buffer at ({x}, {y}) used after release")]
    BufferDisposed {
        /// Chunk X coordinate
        x: i32,
        /// Chunk Y coordinate
        y: i32,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration (de)serialization failed
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Mural operations.
pub type MuralResult<T> = Result<T, MuralError>;
