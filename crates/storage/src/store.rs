//! Store trait consumed by the ingestion orchestrator.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use raster_common::{KeyTuple, RasterResult};

/// Dataset store contract.
///
/// A store is addressed by an ordered list of key names declared at
/// creation time; every dataset is identified by one key tuple of the
/// same length. The connection scope behind a store handle is acquired
/// once and reused for the whole batch.
#[async_trait]
pub trait RasterStore: Send + Sync {
    /// Initialize a fresh store with the given key names.
    async fn create(&self, key_names: &[String]) -> RasterResult<()>;

    /// Declared key names, or `None` if the store was never created.
    async fn key_names(&self) -> RasterResult<Option<Vec<String>>>;

    /// Snapshot of all key tuples currently present.
    async fn existing_keys(&self) -> RasterResult<HashSet<KeyTuple>>;

    /// Insert or overwrite one dataset.
    ///
    /// With `skip_metadata` the metadata column is left unset and the
    /// serving layer computes it lazily on first read.
    async fn insert(&self, key: &KeyTuple, path: &Path, skip_metadata: bool) -> RasterResult<()>;
}
