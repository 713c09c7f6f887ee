//! Error types for signature capture.

use thiserror::Error;

/// Result type for signature capture operations.
pub type SignatureResult<T> = Result<T, SignatureError>;

/// Errors that can occur while configuring or driving a signature canvas.
///
/// Capture itself (`begin`/`extend`/`end`/`clear`) never fails; only
/// configuration and (de)serialization report errors.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Color string matched neither a known name nor a hex literal.
    #[error("Unparseable color: {0}")]
    UnparseableColor(String),

    /// A configuration value is outside its accepted range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Event or stroke serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
