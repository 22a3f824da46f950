//! The entity store engine.

use crate::config::StoreConfig;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::kind::Kind;
use crate::query::Query;
use crate::stats::{StatsSnapshot, StoreStats};
use parish_storage::{RawRecord, StorageBackend};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// The entity store.
///
/// Serves every read from an in-memory map keyed `"{tag}.{id}"` and
/// writes each mutation through to the configured backend, where it
/// stays staged until [`persist`](Store::persist). There is no global
/// instance; callers construct a store and pass it around explicitly.
///
/// All methods take `&self`; the store is safe to share behind an
/// `Arc` across threads.
pub struct Store {
    config: StoreConfig,
    entities: RwLock<BTreeMap<String, Entity>>,
    backend: Mutex<Box<dyn StorageBackend>>,
    stats: StoreStats,
    open: AtomicBool,
}

impl Store {
    /// Opens the configured backend and loads every persisted record.
    ///
    /// Records that no longer decode, for example after a schema
    /// change or with a `type_tag` this build does not know, are
    /// skipped with a warning rather than failing the whole open.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened or read.
    pub fn open(config: StoreConfig) -> CoreResult<Self> {
        let backend = config.build_backend()?;
        Self::from_parts(config, backend)
    }

    pub(crate) fn from_parts(
        config: StoreConfig,
        backend: Box<dyn StorageBackend>,
    ) -> CoreResult<Self> {
        let records = backend.load_all()?;

        let mut entities = BTreeMap::new();
        for record in records {
            let key = record.key();
            match Entity::from_map(record.fields) {
                Ok(entity) => {
                    entities.insert(entity.key(), entity);
                }
                Err(err) => {
                    warn!("skipping record {key}: {err}");
                }
            }
        }
        debug!(
            "opened store on {} with {} entities",
            config.describe(),
            entities.len()
        );

        Ok(Self {
            config,
            entities: RwLock::new(entities),
            backend: Mutex::new(backend),
            stats: StoreStats::default(),
            open: AtomicBool::new(true),
        })
    }

    /// Returns every tracked entity, keyed `"{tag}.{id}"`.
    ///
    /// With a kind given, only that kind's entities are returned. Keys
    /// order entities within a kind by id; there is no meaningful
    /// order across kinds.
    #[must_use]
    pub fn all(&self, kind: Option<Kind>) -> BTreeMap<String, Entity> {
        self.stats.record_read();
        let entities = self.entities.read();
        match kind {
            None => entities.clone(),
            Some(kind) => {
                let prefix = format!("{}.", kind.tag());
                entities
                    .iter()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(key, entity)| (key.clone(), entity.clone()))
                    .collect()
            }
        }
    }

    /// Looks up one entity by kind and id.
    #[must_use]
    pub fn get(&self, kind: Kind, id: &str) -> Option<Entity> {
        self.stats.record_read();
        self.entities.read().get(&kind.key(id)).cloned()
    }

    /// Registers an entity under its key, overwriting any previous
    /// version, and stages it in the backend.
    ///
    /// The store does not enforce uniqueness of anything but the key;
    /// entity-level rules like unique emails belong to the caller.
    /// Durability requires a later [`persist`](Store::persist).
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the backend
    /// rejects the record.
    pub fn add(&self, entity: Entity) -> CoreResult<Entity> {
        self.ensure_open()?;
        let fields = entity.to_map()?;
        let record = RawRecord::new(entity.kind().tag(), entity.id(), fields);

        let mut entities = self.entities.write();
        self.backend.lock().upsert(&record)?;
        entities.insert(entity.key(), entity.clone());
        self.stats.record_write();
        Ok(entity)
    }

    /// Deletes an entity and stages the removal in the backend.
    ///
    /// Removing an entity that is not tracked is not an error. Nothing
    /// cascades; records referencing the removed id keep their dangling
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the backend
    /// rejects the removal.
    pub fn remove(&self, entity: &Entity) -> CoreResult<()> {
        self.ensure_open()?;
        let mut entities = self.entities.write();
        self.backend.lock().remove(entity.kind().tag(), entity.id())?;
        entities.remove(&entity.key());
        self.stats.record_write();
        Ok(())
    }

    /// Durably commits every staged mutation.
    ///
    /// Until this returns successfully, mutations live only in memory
    /// and the backend's staging area.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the backend
    /// commit fails. Staged mutations stay pending; the call is safe
    /// to retry.
    pub fn persist(&self) -> CoreResult<()> {
        self.ensure_open()?;
        self.backend.lock().persist()?;
        self.stats.record_persist();
        Ok(())
    }

    /// Returns the number of tracked entities, optionally of one kind.
    #[must_use]
    pub fn count(&self, kind: Option<Kind>) -> usize {
        self.stats.record_read();
        let entities = self.entities.read();
        match kind {
            None => entities.len(),
            Some(kind) => {
                let prefix = format!("{}.", kind.tag());
                entities.keys().filter(|key| key.starts_with(&prefix)).count()
            }
        }
    }

    /// Starts a filtered query over one kind.
    #[must_use]
    pub fn query(&self, kind: Kind) -> Query<'_> {
        Query::new(self, kind)
    }

    /// Returns a snapshot of the operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns `false` once the store has been shut down.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Persists staged mutations and closes the backend.
    ///
    /// Idempotent; the second and later calls do nothing. After
    /// shutdown every mutation fails with
    /// [`CoreError::StoreClosed`]; reads keep serving the in-memory
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if the final persist or the backend close
    /// fails.
    pub fn shutdown(&self) -> CoreResult<()> {
        if self
            .open
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }
        let mut backend = self.backend.lock();
        backend.persist()?;
        self.stats.record_persist();
        backend.close()?;
        debug!("store shut down");
        Ok(())
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::StoreClosed);
        }
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        // Dropping without shutdown discards staged mutations.
        if self.open.swap(false, Ordering::AcqRel) {
            let _ = self.backend.lock().close();
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.config.describe())
            .field("entities", &self.entities.read().len())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
