//! # Parish Core
//!
//! Entity store and domain models for Parish.
//!
//! This crate provides:
//! - The entity base contract: identity, audit timestamps, and flat
//!   wire-format maps with a `type_tag` discriminator
//! - Nine record kinds (members, users, departments, groups, events,
//!   attendance, financial records, roles, permissions) with field
//!   validation
//! - The [`Store`] engine: in-memory entity map in front of a swappable
//!   [`parish_storage`] backend, with explicit persist and a tolerant
//!   reload protocol
//! - Composable equality and date-range queries
//!
//! ## Example
//!
//! ```rust
//! use parish_core::{Entity, Kind, Store, StoreConfig};
//! use serde_json::json;
//!
//! let store = Store::open(StoreConfig::memory()).unwrap();
//!
//! let map = json!({
//!     "type_tag": "department",
//!     "name": "Music",
//!     "description": "Choirs and instrumentalists",
//! });
//! let entity = Entity::from_map(map.as_object().unwrap().clone()).unwrap();
//! let id = entity.id().to_owned();
//!
//! store.add(entity).unwrap();
//! store.persist().unwrap();
//! assert!(store.get(Kind::Department, &id).is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod kind;
mod meta;
pub mod model;
mod query;
mod stats;
mod store;
mod validate;

pub use config::{BackendConfig, StoreConfig};
pub use entity::Entity;
pub use error::{CoreError, CoreResult, FieldIssue, ValidationError};
pub use kind::Kind;
pub use meta::Meta;
pub use model::table_specs;
pub use parish_storage::{FieldMap, StorageError};
pub use query::Query;
pub use stats::StatsSnapshot;
pub use store::Store;
pub use validate::Validator;
