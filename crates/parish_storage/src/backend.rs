//! Storage backend trait definition.

use crate::error::StorageResult;
use crate::record::RawRecord;

/// A persistence backend for the Parish entity store.
///
/// Backends are **record stores**. They hold the durable form of every
/// tracked entity, keyed by `"{kind}.{id}"`, and they stage mutations
/// until an explicit [`persist`](StorageBackend::persist). The engine
/// above owns entity semantics: validation, uniqueness, and kind
/// dispatch never happen here.
///
/// # Invariants
///
/// - `upsert` followed by `persist` makes the record durable
/// - `remove` followed by `persist` makes the deletion durable
/// - `load_all` returns every record the last `persist` made durable,
///   plus staged mutations
/// - After `close`, every operation fails with
///   [`StorageError::Closed`](crate::StorageError::Closed)
///
/// Backends are driven behind the engine's lock, one call at a time, so
/// they need `Send` but not `Sync`.
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing
/// - [`super::FileBackend`] - JSON snapshot file
/// - [`super::SqliteBackend`] - Relational schema, one table per kind
pub trait StorageBackend: Send {
    /// Loads every stored record.
    ///
    /// Called once at engine startup before any read is served. The
    /// order of the returned records carries no meaning.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or is
    /// structurally malformed.
    fn load_all(&self) -> StorageResult<Vec<RawRecord>>;

    /// Stages a record insert or overwrite under its `"{kind}.{id}"` key.
    ///
    /// Re-upserting an existing key overwrites the staged record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be staged, for example when
    /// the relational backend has no table for the record's kind.
    fn upsert(&mut self, record: &RawRecord) -> StorageResult<()>;

    /// Stages the removal of the record under `"{kind}.{id}"`.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be staged.
    fn remove(&mut self, kind: &str, id: &str) -> StorageResult<()>;

    /// Durably commits all staged mutations.
    ///
    /// For the snapshot backend this rewrites the whole file; for the
    /// relational backend this commits the open transaction. After this
    /// returns successfully, the staged state survives process
    /// termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails. Staged mutations stay
    /// pending; the call is not retried automatically.
    fn persist(&mut self) -> StorageResult<()>;

    /// Closes the backend, discarding staged mutations.
    ///
    /// Closing an already closed backend is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the underlying resource fails.
    fn close(&mut self) -> StorageResult<()>;
}
