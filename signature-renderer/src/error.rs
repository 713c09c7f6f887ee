//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering or export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Export was requested before anything was drawn.
    #[error("Canvas is empty: nothing to export")]
    EmptyCanvas,

    /// Drawing surface could not be created.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Raster encoding failed.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Requested output format is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
