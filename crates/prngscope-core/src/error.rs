//! Error types for prngscope-core.

use thiserror::Error;

/// Errors raised while configuring, generating or packing a sequence.
#[derive(Error, Debug)]
pub enum Error {
    /// Seed, size or a sequence value outside what the caller may supply.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generator parameters are unusable or the recurrence overflowed.
    #[error("generation error: {0}")]
    Generation(String),

    /// A run configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for prngscope-core operations.
pub type Result<T> = std::result::Result<T, Error>;
