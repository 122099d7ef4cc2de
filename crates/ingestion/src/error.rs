//! Error types for the ingestion crate.

use std::path::PathBuf;

use thiserror::Error;

use raster_common::{KeyTuple, RasterError};

use crate::pattern::PatternError;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Invalid glob derived from pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Given pattern matches no files")]
    NoFilesFound,

    #[error("Files matched the pattern's wildcards but none matched its key layout")]
    NoMatchingFiles,

    #[error("Pattern leads to duplicate key '{key}' for {} and {}", .first.display(), .second.display())]
    DuplicateKey {
        key: KeyTuple,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Key '{0}' not found in pattern keys")]
    KeyNotInPattern(String),

    #[error("Key tuple '{key}' has {got} values, catalog declares {expected} key names")]
    MalformedKeyTuple {
        key: KeyTuple,
        got: usize,
        expected: usize,
    },

    #[error("Store has incompatible key names {store:?}, pattern produced {catalog:?}")]
    SchemaMismatch {
        store: Vec<String>,
        catalog: Vec<String>,
    },

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] RasterError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
