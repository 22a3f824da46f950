//! Flat-file snapshot backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::record::{split_key, RawRecord};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A flat-file storage backend.
///
/// The durable form is a single JSON file holding a map from
/// `"{kind}.{id}"` to the entity's wire-format field map. `persist`
/// rewrites the whole snapshot. Intended for local and offline use
/// without a database dependency.
///
/// # Durability
///
/// - `persist()` writes, flushes, and calls `File::sync_all()`
/// - A missing snapshot file on open is not an error; the store starts
///   empty
///
/// # Concurrency
///
/// There is no file locking. Two processes persisting to the same path
/// race, and the last writer wins.
///
/// # Example
///
/// ```no_run
/// use parish_storage::{FieldMap, FileBackend, RawRecord, StorageBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("parish.json")).unwrap();
/// backend.upsert(&RawRecord::new("member", "m-1", FieldMap::new())).unwrap();
/// backend.persist().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    records: BTreeMap<String, RawRecord>,
    closed: bool,
}

impl FileBackend {
    /// Opens a snapshot file, loading its records if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or does
    /// not contain a JSON object of record maps.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let records = match std::fs::read(path) {
            Ok(bytes) => parse_snapshot(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            records,
            closed: false,
        })
    }

    /// Opens a snapshot file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be read.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

fn parse_snapshot(bytes: &[u8]) -> StorageResult<BTreeMap<String, RawRecord>> {
    let snapshot: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|err| StorageError::Corrupted(format!("snapshot is not valid JSON: {err}")))?;

    let mut records = BTreeMap::new();
    for (key, value) in snapshot {
        let Some((kind, id)) = split_key(&key) else {
            return Err(StorageError::Corrupted(format!(
                "snapshot key `{key}` is not of the form kind.id"
            )));
        };
        let Value::Object(fields) = value else {
            return Err(StorageError::Corrupted(format!(
                "snapshot entry `{key}` is not an object"
            )));
        };
        records.insert(key.clone(), RawRecord::new(kind, id, fields));
    }
    Ok(records)
}

impl StorageBackend for FileBackend {
    fn load_all(&self) -> StorageResult<Vec<RawRecord>> {
        self.ensure_open()?;
        Ok(self.records.values().cloned().collect())
    }

    fn upsert(&mut self, record: &RawRecord) -> StorageResult<()> {
        self.ensure_open()?;
        self.records.insert(record.key(), record.clone());
        Ok(())
    }

    fn remove(&mut self, kind: &str, id: &str) -> StorageResult<()> {
        self.ensure_open()?;
        self.records.remove(&format!("{kind}.{id}"));
        Ok(())
    }

    fn persist(&mut self) -> StorageResult<()> {
        self.ensure_open()?;

        let mut snapshot = Map::new();
        for (key, record) in &self.records {
            snapshot.insert(key.clone(), Value::Object(record.fields.clone()));
        }

        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| StorageError::Corrupted(format!("snapshot encoding failed: {err}")))?;

        let mut file = File::create(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }

    fn close(&mut self) -> StorageResult<()> {
        self.closed = true;
        Ok(())
    }
}
