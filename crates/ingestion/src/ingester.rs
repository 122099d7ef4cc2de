//! Ingestion orchestrator: one store insert per catalog entry.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use raster_common::KeyTuple;
use storage::RasterStore;

use crate::catalog::Catalog;
use crate::error::{IngestionError, Result};
use crate::filter;

/// Options for one ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Leave per-dataset metadata unset; the serving layer computes it
    /// lazily on first read.
    pub skip_metadata: bool,
    /// Drop entries whose key is already in the store.
    pub skip_existing: bool,
    /// Drop entries whose file modification time is not strictly
    /// after this cutoff.
    pub ignore_older_than: Option<DateTime<Utc>>,
}

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionResult {
    /// Datasets inserted (or overwritten) in the store.
    pub inserted: usize,
    /// Entries dropped by the existing-key filter.
    pub skipped_existing: usize,
    /// Entries dropped by the age filter.
    pub skipped_stale: usize,
}

/// Drives a catalog into a dataset store.
///
/// The store handle is opened once per batch; inserts run
/// sequentially in catalog iteration order. There is no atomicity
/// across the batch: interruption or a failed insert leaves every
/// already-inserted dataset in place.
pub struct Ingester<S> {
    store: S,
}

impl<S: RasterStore> Ingester<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest a catalog.
    ///
    /// Initializes a fresh store with the catalog's key names, or
    /// aborts before any insert if an existing store declares a
    /// different key schema. `on_item` is called after each insert
    /// with (done, total, key) for progress reporting.
    pub async fn ingest(
        &self,
        catalog: Catalog,
        options: &IngestOptions,
        mut on_item: impl FnMut(usize, usize, &KeyTuple),
    ) -> Result<IngestionResult> {
        match self.store.key_names().await? {
            None => {
                info!(keys = ?catalog.key_names(), "Initializing fresh store");
                self.store.create(catalog.key_names()).await?;
            }
            Some(names) if names != catalog.key_names() => {
                return Err(IngestionError::SchemaMismatch {
                    store: names,
                    catalog: catalog.key_names().to_vec(),
                });
            }
            Some(_) => {}
        }

        let mut catalog = catalog;
        let mut skipped_existing = 0;
        let mut skipped_stale = 0;

        if options.skip_existing {
            let existing = self.store.existing_keys().await?;
            let before = catalog.len();
            catalog = filter::retain_missing(&catalog, &existing);
            skipped_existing = before - catalog.len();
            debug!(skipped = skipped_existing, "Applied existing-key filter");
        }

        if let Some(cutoff) = options.ignore_older_than {
            let before = catalog.len();
            catalog = filter::retain_modified_after(&catalog, cutoff)?;
            skipped_stale = before - catalog.len();
            debug!(skipped = skipped_stale, cutoff = %cutoff, "Applied age filter");
        }

        let total = catalog.len();
        let mut inserted = 0;
        for (key, path) in catalog.iter() {
            self.store.insert(key, path, options.skip_metadata).await?;
            inserted += 1;
            on_item(inserted, total, key);
        }

        info!(inserted, skipped_existing, skipped_stale, "Ingestion batch complete");

        Ok(IngestionResult {
            inserted,
            skipped_existing,
            skipped_stale,
        })
    }
}
