//! Storage abstractions for raster-catalog services.
//!
//! Provides the `RasterStore` trait consumed by the ingestion
//! orchestrator and its SQLite implementation. The store maps key
//! tuples to raster file paths plus an optional metadata document;
//! metadata left unset is computed lazily on first read by the
//! serving layer, which is outside this crate.

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteStore;
pub use store::RasterStore;
