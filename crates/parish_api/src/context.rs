//! Authenticated request context.

use parish_core::model::UserRole;

/// Who is calling, carried explicitly into every service method.
///
/// Built by [`Service::verify_token`](crate::Service::verify_token)
/// from a presented token, or directly in tests. There is no ambient
/// "current user"; handlers receive the context as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Id of the calling user account.
    pub user_id: String,
    /// Role the call is authorized as.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a context from its parts.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
