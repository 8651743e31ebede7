//! Error types for mathplot.

use thiserror::Error;

/// The main error type for mathplot operations.
#[derive(Error, Debug)]
pub enum MathplotError {
    /// Parallel vertex attribute sequences have diverged in length.
    #[error("vertex buffer size mismatch: positions {positions}, normals {normals}, colors {colors}")]
    BufferSizeMismatch {
        positions: usize,
        normals: usize,
        colors: usize,
    },

    /// Data size mismatch between two related inputs.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A bounding box was requested for a model with no vertices.
    #[error("model has no vertices")]
    EmptyModel,

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for mathplot operations.
pub type Result<T> = std::result::Result<T, MathplotError>;
