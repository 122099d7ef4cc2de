//! Raster file ingestion library.
//!
//! Provides core logic for discovering raster files via a placeholder
//! path pattern and ingesting the resulting key→path catalog into a
//! dataset store.
//!
//! # Architecture
//!
//! - Pattern compilation: a template like `/data/{name}/{band}.tif`
//!   becomes a glob (cheap filesystem enumeration) plus an anchored
//!   regex (key extraction from the glob candidates).
//! - Matching: glob hits are run through the regex to build a catalog
//!   of key tuples to canonical file paths, rejecting ambiguity.
//! - Filtering: the catalog can be narrowed by existing store keys
//!   and by file modification time.
//! - Orchestration: one store insert per surviving entry, sequential,
//!   after validating key-schema compatibility.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod ingester;
pub mod matcher;
pub mod pattern;

// Re-exports
pub use catalog::Catalog;
pub use error::{IngestionError, Result};
pub use ingester::{IngestOptions, Ingester, IngestionResult};
pub use matcher::match_files;
pub use pattern::{compile, CompiledPattern, PatternError};
