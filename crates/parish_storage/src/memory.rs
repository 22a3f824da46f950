//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::record::RawRecord;
use std::collections::BTreeMap;

/// An in-memory storage backend.
///
/// This backend keeps all records in a map and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// `persist` is a no-op; the staged state is the stored state.
///
/// # Example
///
/// ```rust
/// use parish_storage::{FieldMap, MemoryBackend, RawRecord, StorageBackend};
///
/// let mut backend = MemoryBackend::new();
/// backend.upsert(&RawRecord::new("member", "m-1", FieldMap::new())).unwrap();
/// assert_eq!(backend.load_all().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: BTreeMap<String, RawRecord>,
    closed: bool,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory backend holding pre-existing records.
    ///
    /// Useful for testing the engine's reload path.
    #[must_use]
    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.key(), r)).collect(),
            closed: false,
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the backend holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        Ok(())
    }
}

impl StorageBackend for MemoryBackend {
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
        self.ensure_open()
    }

    fn close(&mut self) -> StorageResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;
    use serde_json::json;

    fn record(kind: &str, id: &str) -> RawRecord {
        let mut fields = FieldMap::new();
        fields.insert("type_tag".into(), json!(kind));
        fields.insert("id".into(), json!(id));
        RawRecord::new(kind, id, fields)
    }

    #[test]
    fn upsert_and_load() {
        let mut backend = MemoryBackend::new();
        backend.upsert(&record("member", "m-1")).unwrap();
        backend.upsert(&record("event", "e-1")).unwrap();

        let records = backend.load_all().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn upsert_overwrites_same_key() {
        let mut backend = MemoryBackend::new();
        let mut first = record("member", "m-1");
        first.fields.insert("status".into(), json!("active"));
        backend.upsert(&first).unwrap();

        let mut second = record("member", "m-1");
        second.fields.insert("status".into(), json!("inactive"));
        backend.upsert(&second).unwrap();

        let records = backend.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields["status"], json!("inactive"));
    }

    #[test]
    fn remove_missing_is_ok() {
        let mut backend = MemoryBackend::new();
        backend.remove("member", "nope").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn seeded_backend_serves_reload() {
        let backend = MemoryBackend::with_records(vec![record("group", "g-1")]);
        let records = backend.load_all().unwrap();
        assert_eq!(records[0].key(), "group.g-1");
    }

    #[test]
    fn closed_backend_rejects_operations() {
        let mut backend = MemoryBackend::new();
        backend.close().unwrap();

        assert!(matches!(backend.load_all(), Err(StorageError::Closed)));
        assert!(matches!(
            backend.upsert(&record("member", "m-1")),
            Err(StorageError::Closed)
        ));
        // Closing twice is fine
        backend.close().unwrap();
    }
}
