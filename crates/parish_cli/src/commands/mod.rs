//! CLI command implementations.

pub mod create;
pub mod delete;
pub mod inspect;
pub mod list;
pub mod show;
pub mod update;
pub mod verify;
