//! Error types shared across the raster-catalog workspace.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Primary error type for store operations.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid key name: {0} (key names must be alphanumeric)")]
    InvalidKeyName(String),

    #[error("Key tuple has {got} values, store expects {expected}")]
    KeyLengthMismatch { got: usize, expected: usize },

    #[error("Store has not been initialized with key names")]
    StoreUninitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
