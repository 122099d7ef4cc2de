//! Catalog filters applied between matching and ingestion.
//!
//! Both filters run against the catalog produced *after* any key
//! reordering, so callers reason about the final key layout.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use raster_common::KeyTuple;

use crate::catalog::Catalog;
use crate::error::Result;

/// Drop entries whose key is already present in the store snapshot.
///
/// The snapshot is taken once before iteration; an empty snapshot
/// returns the input unchanged.
pub fn retain_missing(catalog: &Catalog, existing: &HashSet<KeyTuple>) -> Catalog {
    catalog.retain(|key, _| !existing.contains(key))
}

/// Drop entries whose file was not modified strictly after `cutoff`.
///
/// Each file is stat'ed once; a failed stat is a fatal I/O error.
pub fn retain_modified_after(catalog: &Catalog, cutoff: DateTime<Utc>) -> Result<Catalog> {
    let mut stale: HashSet<KeyTuple> = HashSet::new();
    for (key, path) in catalog.iter() {
        let modified: DateTime<Utc> = std::fs::metadata(path)?.modified()?.into();
        if modified <= cutoff {
            stale.insert(key.clone());
        }
    }
    Ok(catalog.retain(|key, _| !stale.contains(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use chrono::Duration;

    fn two_file_catalog() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        let mut entries = BTreeMap::new();
        for band in ["red", "green"] {
            let path = dir.path().join(format!("{band}.tif"));
            std::fs::write(&path, b"raster").unwrap();
            entries.insert(KeyTuple::from([band]), path);
        }
        let catalog = Catalog::new(vec!["band".to_string()], entries).unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_retain_missing_with_empty_snapshot_is_identity() {
        let (_dir, catalog) = two_file_catalog();
        let filtered = retain_missing(&catalog, &HashSet::new());
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn test_retain_missing_with_full_snapshot_is_empty() {
        let (_dir, catalog) = two_file_catalog();
        let existing: HashSet<KeyTuple> = catalog.iter().map(|(k, _)| k.clone()).collect();
        let filtered = retain_missing(&catalog, &existing);
        assert!(filtered.is_empty());
        assert_eq!(filtered.key_names(), ["band"]);
    }

    #[test]
    fn test_retain_missing_drops_only_present_keys() {
        let (_dir, catalog) = two_file_catalog();
        let mut existing = HashSet::new();
        existing.insert(KeyTuple::from(["red"]));
        let filtered = retain_missing(&catalog, &existing);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.get(&KeyTuple::from(["green"])).is_some());
    }

    #[test]
    fn test_age_filter_cutoff_older_than_all_is_identity() {
        let (_dir, catalog) = two_file_catalog();
        let cutoff = Utc::now() - Duration::hours(1);
        let filtered = retain_modified_after(&catalog, cutoff).unwrap();
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn test_age_filter_cutoff_newer_than_all_is_empty() {
        let (_dir, catalog) = two_file_catalog();
        let cutoff = Utc::now() + Duration::hours(1);
        let filtered = retain_modified_after(&catalog, cutoff).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_age_filter_missing_file_is_fatal() {
        let (dir, catalog) = two_file_catalog();
        std::fs::remove_file(dir.path().join("red.tif")).unwrap();
        let cutoff = Utc::now() - Duration::hours(1);
        let err = retain_modified_after(&catalog, cutoff).unwrap_err();
        assert!(matches!(err, crate::error::IngestionError::FileRead(_)));
    }
}
