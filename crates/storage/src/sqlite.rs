//! SQLite-backed dataset store.
//!
//! One file per store. The `keys` table records the declared key
//! names in order; the `datasets` table has one TEXT column per key
//! name and is primary-keyed on the full tuple, so inserting an
//! existing key overwrites the previous dataset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;
use tracing::debug;

use raster_common::{KeyTuple, RasterError, RasterResult};

use crate::store::RasterStore;

/// SQLite dataset store.
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
    // Cached after open/create so inserts don't re-query the schema.
    key_names: RwLock<Option<Vec<String>>>,
}

impl SqliteStore {
    /// Open (creating the file if missing) a store at `path`.
    ///
    /// The pool holds a single connection: batches are sequential and
    /// the open cost is paid once per invocation.
    pub async fn open(path: &Path) -> RasterResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| RasterError::Database(format!("Failed to open {}: {}", path.display(), e)))?;

        let store = Self {
            pool,
            path: path.to_path_buf(),
            key_names: RwLock::new(None),
        };

        let names = store.load_key_names().await?;
        *store.key_names.write().await = names;

        Ok(store)
    }

    /// Filesystem path of the store, as opened.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_key_names(&self) -> RasterResult<Option<Vec<String>>> {
        let keys_table = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'keys'")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RasterError::Database(format!("Schema lookup failed: {}", e)))?;

        if keys_table.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query("SELECT name FROM keys ORDER BY idx")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RasterError::Database(format!("Failed to read key names: {}", e)))?;

        let names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RasterError::Database(format!("Failed to read key names: {}", e)))?;

        Ok(Some(names))
    }

    async fn require_key_names(&self) -> RasterResult<Vec<String>> {
        self.key_names
            .read()
            .await
            .clone()
            .ok_or(RasterError::StoreUninitialized)
    }
}

#[async_trait]
impl RasterStore for SqliteStore {
    async fn create(&self, key_names: &[String]) -> RasterResult<()> {
        for name in key_names {
            validate_key_name(name)?;
        }

        let key_columns = quoted_columns(key_names);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RasterError::Database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("CREATE TABLE keys (idx INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)")
            .execute(&mut *tx)
            .await
            .map_err(|e| RasterError::Database(format!("Failed to create keys table: {}", e)))?;

        for (idx, name) in key_names.iter().enumerate() {
            sqlx::query("INSERT INTO keys (idx, name) VALUES (?, ?)")
                .bind(idx as i64)
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(|e| RasterError::Database(format!("Failed to record key name: {}", e)))?;
        }

        let create_datasets = format!(
            "CREATE TABLE datasets ({} TEXT NOT NULL, path TEXT NOT NULL, \
             metadata TEXT, ingested_at TEXT NOT NULL, PRIMARY KEY ({}))",
            key_columns.join(" TEXT NOT NULL, "),
            key_columns.join(", "),
        );
        sqlx::query(&create_datasets)
            .execute(&mut *tx)
            .await
            .map_err(|e| RasterError::Database(format!("Failed to create datasets table: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| RasterError::Database(format!("Failed to commit schema: {}", e)))?;

        debug!(path = %self.path.display(), keys = ?key_names, "Created store");
        *self.key_names.write().await = Some(key_names.to_vec());

        Ok(())
    }

    async fn key_names(&self) -> RasterResult<Option<Vec<String>>> {
        Ok(self.key_names.read().await.clone())
    }

    async fn existing_keys(&self) -> RasterResult<HashSet<KeyTuple>> {
        let names = self.require_key_names().await?;
        let sql = format!("SELECT {} FROM datasets", quoted_columns(&names).join(", "));

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RasterError::Database(format!("Failed to list datasets: {}", e)))?;

        let mut keys = HashSet::with_capacity(rows.len());
        for row in rows {
            let values = (0..names.len())
                .map(|i| row.try_get::<String, _>(i))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| RasterError::Database(format!("Failed to decode key tuple: {}", e)))?;
            keys.insert(KeyTuple::new(values));
        }

        Ok(keys)
    }

    async fn insert(&self, key: &KeyTuple, path: &Path, skip_metadata: bool) -> RasterResult<()> {
        let names = self.require_key_names().await?;
        if key.len() != names.len() {
            return Err(RasterError::KeyLengthMismatch {
                got: key.len(),
                expected: names.len(),
            });
        }

        let metadata = if skip_metadata {
            None
        } else {
            Some(file_metadata(path)?)
        };

        let key_columns = quoted_columns(&names);
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO datasets ({cols}, path, metadata, ingested_at) \
             VALUES ({placeholders}, ?, ?, ?) \
             ON CONFLICT ({cols}) DO UPDATE SET \
             path = excluded.path, metadata = excluded.metadata, ingested_at = excluded.ingested_at",
            cols = key_columns.join(", "),
            placeholders = placeholders,
        );

        let mut query = sqlx::query(&sql);
        for value in key.values() {
            query = query.bind(value);
        }
        query = query
            .bind(path.to_string_lossy().into_owned())
            .bind(metadata)
            .bind(Utc::now().to_rfc3339());

        query
            .execute(&self.pool)
            .await
            .map_err(|e| RasterError::Database(format!("Insert failed for {}: {}", key, e)))?;

        Ok(())
    }
}

/// Reject key names unsafe to interpolate as column identifiers.
fn validate_key_name(name: &str) -> RasterResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(RasterError::InvalidKeyName(name.to_string()));
    }
    Ok(())
}

fn quoted_columns(names: &[String]) -> Vec<String> {
    names.iter().map(|n| format!("\"{}\"", n)).collect()
}

/// Cheap per-file metadata document (no raster decoding).
fn file_metadata(path: &Path) -> RasterResult<String> {
    let meta = std::fs::metadata(path)?;
    let modified: DateTime<Utc> = meta.modified()?.into();

    Ok(serde_json::json!({
        "size": meta.len(),
        "modified": modified.to_rfc3339(),
    })
    .to_string())
}
