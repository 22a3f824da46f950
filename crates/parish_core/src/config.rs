//! Store configuration.

use crate::error::{CoreError, CoreResult};
use crate::model;
use parish_storage::{FileBackend, MemoryBackend, SqliteBackend, StorageBackend};
use std::env;
use std::path::PathBuf;

/// Which durable backend a store writes through to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// JSON snapshot file rewritten on every persist.
    File {
        /// Path of the snapshot file.
        path: PathBuf,
    },
    /// SQLite database, one table per entity kind.
    Sqlite {
        /// Path of the database file.
        path: PathBuf,
    },
    /// No durability, for tests and demos.
    Memory,
}

/// Configuration for opening a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The durable backend to write through to.
    pub backend: BackendConfig,

    /// Whether to discard existing data on open.
    pub reset_on_open: bool,
}

impl StoreConfig {
    /// Creates a file-backed configuration.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::File { path: path.into() },
            reset_on_open: false,
        }
    }

    /// Creates a SQLite-backed configuration.
    #[must_use]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::Sqlite { path: path.into() },
            reset_on_open: false,
        }
    }

    /// Creates an in-memory configuration.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: BackendConfig::Memory,
            reset_on_open: false,
        }
    }

    /// Sets whether existing data is discarded on open.
    #[must_use]
    pub const fn with_reset(mut self, value: bool) -> Self {
        self.reset_on_open = value;
        self
    }

    /// Builds a configuration from the process environment.
    ///
    /// `PARISH_BACKEND` selects `file` (default), `sqlite`, or
    /// `memory`; `PARISH_FILE_PATH` and `PARISH_DB_PATH` override the
    /// default paths; `PARISH_ENV=test` discards existing data on open.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] for an unrecognized backend name.
    pub fn from_env() -> CoreResult<Self> {
        let backend = match env::var("PARISH_BACKEND").as_deref() {
            Ok("sqlite") => {
                let path = env::var("PARISH_DB_PATH").unwrap_or_else(|_| "parish.db".to_owned());
                BackendConfig::Sqlite { path: path.into() }
            }
            Ok("memory") => BackendConfig::Memory,
            Ok("file") | Err(_) => {
                let path =
                    env::var("PARISH_FILE_PATH").unwrap_or_else(|_| "parish.json".to_owned());
                BackendConfig::File { path: path.into() }
            }
            Ok(other) => {
                return Err(CoreError::config(format!("unknown backend '{other}'")));
            }
        };
        let reset_on_open = env::var("PARISH_ENV").as_deref() == Ok("test");
        Ok(Self {
            backend,
            reset_on_open,
        })
    }

    /// Returns a short human-readable description of the backend.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.backend {
            BackendConfig::File { path } => format!("file:{}", path.display()),
            BackendConfig::Sqlite { path } => format!("sqlite:{}", path.display()),
            BackendConfig::Memory => "memory".to_owned(),
        }
    }

    /// Opens the configured backend.
    pub(crate) fn build_backend(&self) -> CoreResult<Box<dyn StorageBackend>> {
        Ok(match &self.backend {
            BackendConfig::File { path } => {
                if self.reset_on_open {
                    match std::fs::remove_file(path) {
                        Ok(()) => {}
                        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                        Err(err) => return Err(CoreError::Storage(err.into())),
                    }
                }
                Box::new(FileBackend::open_with_create_dirs(path)?)
            }
            BackendConfig::Sqlite { path } => {
                Box::new(SqliteBackend::open(path, model::table_specs(), self.reset_on_open)?)
            }
            BackendConfig::Memory => Box::new(MemoryBackend::new()),
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}
