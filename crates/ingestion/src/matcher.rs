//! File matcher: glob enumeration plus regex key extraction.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use raster_common::KeyTuple;

use crate::catalog::Catalog;
use crate::error::{IngestionError, Result};
use crate::pattern::CompiledPattern;

/// Match a compiled pattern against the filesystem.
///
/// Distinguishes "the glob found nothing" from "the glob found files
/// but none fit the key layout", since the two need different fixes.
/// Candidate paths are canonicalized before being recorded so the
/// catalog never holds two spellings of the same file.
pub fn match_files(pattern: &CompiledPattern) -> Result<Catalog> {
    let mut glob_hits = 0usize;
    let mut entries: BTreeMap<KeyTuple, PathBuf> = BTreeMap::new();

    for candidate in glob::glob(pattern.glob())? {
        let path = match candidate {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable glob candidate");
                continue;
            }
        };
        glob_hits += 1;

        let Some(key) = pattern.extract(&path.to_string_lossy()) else {
            debug!(path = %path.display(), "Glob candidate does not match key layout");
            continue;
        };

        let canonical = path.canonicalize()?;
        if let Some(previous) = entries.get(&key) {
            // Two spellings of one physical file are harmless; two
            // distinct files collapsing to one key are not.
            if *previous == canonical {
                continue;
            }
            return Err(IngestionError::DuplicateKey {
                key,
                first: previous.clone(),
                second: canonical,
            });
        }
        entries.insert(key, canonical);
    }

    if glob_hits == 0 {
        return Err(IngestionError::NoFilesFound);
    }
    if entries.is_empty() {
        return Err(IngestionError::NoMatchingFiles);
    }

    Catalog::new(pattern.key_names().to_vec(), entries)
}
