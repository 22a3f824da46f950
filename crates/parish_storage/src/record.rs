//! Wire-format records exchanged between the engine and the backends.

use serde_json::{Map, Value};

/// A flat field map in the entity wire format.
///
/// Keys are field names; values are JSON scalars (strings, numbers,
/// booleans) with timestamps rendered as ISO-8601 strings. The
/// `type_tag` key carries the kind discriminator.
pub type FieldMap = Map<String, Value>;

/// A single persisted record.
///
/// Records are keyed by `"{kind}.{id}"` in the store's key space. The
/// `fields` map is the full wire form of the entity, including its
/// `type_tag`, `id`, and timestamp fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Kind tag of the entity (e.g. `"member"`).
    pub kind: String,
    /// Unique id within the kind.
    pub id: String,
    /// Flat wire-format field map.
    pub fields: FieldMap,
}

impl RawRecord {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            fields,
        }
    }

    /// Returns the store key `"{kind}.{id}"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}", self.kind, self.id)
    }
}

/// Splits a store key into its kind and id parts.
///
/// Kind tags never contain a dot, so the first dot is the separator.
/// Returns `None` for keys without a separator.
///
/// # Example
///
/// ```rust
/// use parish_storage::split_key;
///
/// assert_eq!(split_key("member.42"), Some(("member", "42")));
/// assert_eq!(split_key("garbage"), None);
/// ```
#[must_use]
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_key_joins_kind_and_id() {
        let record = RawRecord::new("member", "abc-123", FieldMap::new());
        assert_eq!(record.key(), "member.abc-123");
    }

    #[test]
    fn split_key_roundtrip() {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), json!("Choir"));
        let record = RawRecord::new("group", "g-1", fields);

        let key = record.key();
        let (kind, id) = split_key(&key).unwrap();
        assert_eq!(kind, "group");
        assert_eq!(id, "g-1");
    }

    #[test]
    fn split_key_keeps_dots_in_id() {
        assert_eq!(split_key("event.a.b"), Some(("event", "a.b")));
    }
}
