//! The access-control gate.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use parish_core::model::UserRole;

/// Allow-list for admin-only operations.
pub(crate) const ADMINS: &[UserRole] = &[UserRole::Admin];

/// Allow-list for leadership operations.
pub(crate) const LEADERSHIP: &[UserRole] = &[UserRole::Admin, UserRole::Pastor];

/// Allow-list for operations open to every signed-in role.
pub(crate) const EVERYONE: &[UserRole] = &[UserRole::Admin, UserRole::Pastor, UserRole::Member];

/// Permits the call when the caller's role is on the allow-list.
///
/// Stateless and side-effect free; evaluated before any storage
/// access. `action` names the operation for the rejection message.
///
/// # Errors
///
/// Returns [`ApiError::Authorization`] when the role is not allowed.
pub fn authorize(ctx: &RequestContext, action: &str, allowed: &[UserRole]) -> ApiResult<()> {
    if allowed.contains(&ctx.role) {
        return Ok(());
    }
    Err(ApiError::Authorization(format!(
        "role `{}` may not {action}",
        ctx.role
    )))
}
