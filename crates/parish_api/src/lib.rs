//! # Parish API
//!
//! Role-gated service layer over the [`parish_core`] entity store.
//!
//! [`Service`] exposes one method per operation of the administrative
//! surface: member, user, department, group, event, attendance,
//! finance, role, and permission management, plus register/login and
//! token verification. Every method takes an explicit
//! [`RequestContext`] and checks it against the operation's allow-list
//! before touching storage.
//!
//! There is no HTTP framework here. A web layer maps requests onto
//! these methods and [`ApiError::status_code`] onto response codes.
//!
//! ## Access table
//!
//! | Resource    | View         | Manage      |
//! |-------------|--------------|-------------|
//! | members     | everyone \*  | leadership \* |
//! | users       | leadership † | admins      |
//! | departments | everyone     | admins      |
//! | groups      | leadership   | admins      |
//! | events      | everyone     | leadership  |
//! | attendance  | leadership   | leadership  |
//! | finance     | leadership   | leadership  |
//! | roles       | admins       | admins      |
//! | permissions | admins       | admins      |
//!
//! \* member-role callers may fetch, update, and delete only the
//! member record their account links to; listing and creating stay
//! with leadership.
//!
//! † listing user accounts is admins-only; fetching one is open to
//! leadership.
//!
//! ## Example
//!
//! ```rust
//! use parish_api::{RequestContext, Service};
//! use parish_core::{model::UserRole, Store, StoreConfig};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::open(StoreConfig::memory()).unwrap());
//! let service = Service::new(store, b"secret-key".to_vec());
//!
//! let admin = RequestContext::new("u-1", UserRole::Admin);
//! let body = json!({
//!     "first_name": "Ama",
//!     "last_name": "Mensah",
//!     "email": "ama@example.com",
//!     "phone_number": "0244123456",
//! });
//! let created = service
//!     .create_member(&admin, body.as_object().unwrap().clone())
//!     .unwrap();
//! assert_eq!(created["type_tag"], json!("member"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod error;
mod gate;
mod password;
mod routes;
mod service;
mod token;

pub use context::RequestContext;
pub use error::{ApiError, ApiResult};
pub use gate::authorize;
pub use routes::attendance::AttendanceSearch;
pub use routes::auth::{LoginRequest, RegisterRequest, Session};
pub use service::Service;
pub use token::TokenSigner;
