//! Error types for the service layer.

use parish_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur in service operations.
///
/// Each variant maps to one HTTP status through
/// [`status_code`](ApiError::status_code); a web layer needs no other
/// knowledge of the failure taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Credentials or token could not be verified.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Caller's role is not on the operation's allow-list.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not durably commit.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Internal failure not attributable to the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Authentication(_) => 401,
            ApiError::Authorization(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Persistence(_) | ApiError::Internal(_) => 500,
        }
    }

    /// Returns true if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Creates a not-found error naming the missing thing.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ApiError::Validation(v),
            CoreError::UnknownKind { tag } => {
                ApiError::Validation(ValidationError::single("type_tag", format!("unknown kind `{tag}`")))
            }
            CoreError::Storage(err) => ApiError::Persistence(err.to_string()),
            CoreError::StoreClosed => ApiError::Persistence(err.to_string()),
            CoreError::Codec(_) | CoreError::Config { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation(ValidationError::single("name", "is required")).status_code(),
            400
        );
        assert_eq!(ApiError::Authentication("bad token".into()).status_code(), 401);
        assert_eq!(ApiError::Authorization("member".into()).status_code(), 403);
        assert_eq!(ApiError::not_found("member m-1").status_code(), 404);
        assert_eq!(ApiError::conflict("email taken").status_code(), 409);
        assert_eq!(ApiError::Persistence("disk full".into()).status_code(), 500);
    }

    #[test]
    fn client_errors_are_4xx() {
        assert!(ApiError::not_found("user u-1").is_client_error());
        assert!(!ApiError::Internal("bug".into()).is_client_error());
    }

    #[test]
    fn core_errors_convert() {
        let err: ApiError = CoreError::unknown_kind("sermon").into();
        assert_eq!(err.status_code(), 400);

        let err: ApiError = CoreError::StoreClosed.into();
        assert_eq!(err.status_code(), 500);
    }
}
