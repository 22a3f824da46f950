//! Identity and audit timestamps shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The base contract fields every record carries.
///
/// Embedded (flattened) into each entity struct, so the wire format
/// shows `id`, `created_at`, and `updated_at` as top-level keys with
/// timestamps rendered as ISO-8601 strings.
///
/// # Invariants
///
/// - `id` is assigned at creation and never changes
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Unique id within the entity's kind, a UUID v4 string.
    pub id: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation via [`Meta::touch`].
    pub updated_at: DateTime<Utc>,
}

impl Meta {
    /// Creates fresh metadata: a new id and `created_at == updated_at`.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: fresh_id(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at`.
    ///
    /// Clamped to `created_at` so the ordering invariant holds even if
    /// the wall clock steps backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a fresh entity id.
pub(crate) fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meta_has_equal_timestamps() {
        let meta = Meta::new();
        assert_eq!(meta.created_at, meta.updated_at);
        assert!(!meta.id.is_empty());
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = Meta::new();
        let b = Meta::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn touch_keeps_ordering() {
        let mut meta = Meta::new();
        let created = meta.created_at;
        meta.touch();
        assert_eq!(meta.created_at, created);
        assert!(meta.updated_at >= meta.created_at);
    }
}
