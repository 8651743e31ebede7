//! Error types for the rendering backend.

use thiserror::Error;

/// Errors raised by the rendering backend.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No suitable GPU adapter was found.
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    /// Device request failed.
    #[error("device request failed: {0}")]
    DeviceRequest(String),

    /// Surface creation or configuration failed.
    #[error("surface error: {0}")]
    Surface(String),

    /// A colour-only buffer update was attempted with a changed size.
    #[error("colour buffer size changed: expected {expected} bytes, got {actual}")]
    ColourSizeChanged { expected: u64, actual: u64 },

    /// GPU readback failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,

    /// Image encoding error.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for render operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
