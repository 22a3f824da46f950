//! Operation handlers, one module per resource family.
//!
//! Each module contributes an `impl` block on
//! [`Service`](crate::Service) with the operations of its resource,
//! gated by role per the access table in the crate docs.

pub mod attendance;
pub mod auth;
pub mod departments;
pub mod events;
pub mod finance;
pub mod groups;
pub mod members;
pub mod roles;
pub mod users;
