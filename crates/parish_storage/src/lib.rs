//! # Parish Storage
//!
//! Storage backend trait and implementations for Parish.
//!
//! This crate provides the persistence layer under the Parish entity
//! store. Backends are **record stores**: they accept flat wire-format
//! records keyed by kind and id, and they do not interpret entity
//! semantics beyond the column descriptors they are given.
//!
//! ## Design Principles
//!
//! - Backends move whole records (kind, id, field map), never bytes
//! - Durability is explicit: mutations buffer until [`StorageBackend::persist`]
//! - The engine above owns validation, uniqueness, and kind dispatch
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - Single JSON snapshot file, for local/offline use
//! - [`SqliteBackend`] - One table per kind, transactional persist

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod record;
mod schema;
mod sqlite;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use record::{split_key, FieldMap, RawRecord};
pub use schema::{ColumnSpec, ColumnType, TableSpec};
pub use sqlite::SqliteBackend;
