//! Error types for Parish core.

use parish_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more entity fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Wire-format encoding or decoding failure.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A `type_tag` value outside the closed kind set.
    #[error("unknown entity kind `{tag}`")]
    UnknownKind {
        /// The unrecognized tag.
        tag: String,
    },

    /// Invalid store configuration.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// The store has been shut down.
    #[error("store is closed")]
    StoreClosed,
}

impl CoreError {
    /// Creates an unknown-kind error.
    pub fn unknown_kind(tag: impl Into<String>) -> Self {
        Self::UnknownKind { tag: tag.into() }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// A single offending field inside a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire-format field name.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

/// Field-level validation failure.
///
/// Collects every offending field of one entity so callers can surface
/// all of them in a single rejection.
#[derive(Debug, Clone, Default, Error)]
#[error("validation failed: {}", render_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

fn render_issues(issues: &[FieldIssue]) -> String {
    let parts: Vec<String> = issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect();
    parts.join("; ")
}

impl ValidationError {
    /// Creates an empty error to be filled by a validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error for a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    /// Records one offending field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if no field has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the recorded issues.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Wraps a wire-format decode failure.
    ///
    /// Missing-field reports keep the field name; everything else is
    /// attributed to the request body as a whole.
    pub(crate) fn from_decode(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        let field = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
            .unwrap_or("body")
            .to_owned();
        Self::single(field, message)
    }
}
