//! Key→path catalogs produced by matching a pattern.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use raster_common::KeyTuple;

use crate::error::{IngestionError, Result};

/// Ordered key names plus the key-tuple→path mapping for one matching
/// pass over the filesystem.
///
/// Invariants: every tuple has exactly one value per key name, and
/// tuples are unique. Catalogs are immutable; reordering and filtering
/// produce new catalogs. Iteration order (sorted by tuple) is the
/// order datasets are inserted into the store.
#[derive(Debug, Clone)]
pub struct Catalog {
    key_names: Vec<String>,
    entries: BTreeMap<KeyTuple, PathBuf>,
}

impl Catalog {
    /// Build a catalog, enforcing the tuple-length invariant.
    pub fn new(key_names: Vec<String>, entries: BTreeMap<KeyTuple, PathBuf>) -> Result<Self> {
        let expected = key_names.len();
        for key in entries.keys() {
            if key.len() != expected {
                return Err(IngestionError::MalformedKeyTuple {
                    key: key.clone(),
                    got: key.len(),
                    expected,
                });
            }
        }
        Ok(Self { key_names, entries })
    }

    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyTuple, &PathBuf)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &KeyTuple) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    /// New catalog with the same key names and a subset of entries.
    pub fn retain(&self, mut predicate: impl FnMut(&KeyTuple, &Path) -> bool) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(key, path)| predicate(key, path))
            .map(|(key, path)| (key.clone(), path.clone()))
            .collect();
        Self {
            key_names: self.key_names.clone(),
            entries,
        }
    }

    /// Move `name` to the last key position, permuting every tuple the
    /// same way. Used to put the compositing key (e.g. `band`) last.
    pub fn promote_key(&self, name: &str) -> Result<Self> {
        let index = self
            .key_names
            .iter()
            .position(|k| k == name)
            .ok_or_else(|| IngestionError::KeyNotInPattern(name.to_string()))?;

        let mut key_names = self.key_names.clone();
        let moved = key_names.remove(index);
        key_names.push(moved);

        let entries = self
            .entries
            .iter()
            .map(|(key, path)| (key.promote_to_last(index), path.clone()))
            .collect();

        Ok(Self { key_names, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(keys: &[&str], entries: &[(&[&str], &str)]) -> Catalog {
        let map = entries
            .iter()
            .map(|(key, path)| {
                (
                    KeyTuple::new(key.iter().map(|v| v.to_string()).collect()),
                    PathBuf::from(path),
                )
            })
            .collect();
        Catalog::new(keys.iter().map(|k| k.to_string()).collect(), map).unwrap()
    }

    #[test]
    fn test_rejects_wrong_tuple_length() {
        let mut entries = BTreeMap::new();
        entries.insert(KeyTuple::from(["a", "b"]), PathBuf::from("/x.tif"));
        let err = Catalog::new(vec!["name".to_string()], entries).unwrap_err();
        assert!(matches!(err, IngestionError::MalformedKeyTuple { .. }));
    }

    #[test]
    fn test_promote_key_permutes_names_and_tuples() {
        let cat = catalog(
            &["name", "date", "band"],
            &[
                (&["gfs", "2024", "red"], "/a.tif"),
                (&["gfs", "2024", "green"], "/b.tif"),
            ],
        );

        let promoted = cat.promote_key("date").unwrap();
        assert_eq!(promoted.key_names(), ["name", "band", "date"]);
        assert_eq!(
            promoted.get(&KeyTuple::from(["gfs", "red", "2024"])),
            Some(Path::new("/a.tif"))
        );
        assert_eq!(promoted.len(), 2);
    }

    #[test]
    fn test_promote_preserves_entry_set() {
        let cat = catalog(
            &["name", "band"],
            &[(&["p", "red"], "/p/red.tif"), (&["p", "green"], "/p/green.tif")],
        );

        // Promoting the already-last key is a no-op.
        let promoted = cat.promote_key("band").unwrap();
        assert_eq!(promoted.key_names(), ["name", "band"]);
        let before: Vec<_> = cat.iter().map(|(k, p)| (k.clone(), p.clone())).collect();
        let after: Vec<_> = promoted.iter().map(|(k, p)| (k.clone(), p.clone())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_promote_unknown_key_fails() {
        let cat = catalog(&["name"], &[(&["a"], "/a.tif")]);
        let err = cat.promote_key("band").unwrap_err();
        assert!(matches!(err, IngestionError::KeyNotInPattern(k) if k == "band"));
    }

    #[test]
    fn test_retain_keeps_key_names() {
        let cat = catalog(
            &["band"],
            &[(&["red"], "/red.tif"), (&["green"], "/green.tif")],
        );
        let narrowed = cat.retain(|key, _| key.values()[0] == "red");
        assert_eq!(narrowed.key_names(), ["band"]);
        assert_eq!(narrowed.len(), 1);
    }
}
