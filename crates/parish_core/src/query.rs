//! Composable entity queries.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::kind::Kind;
use crate::store::Store;
use chrono::NaiveDate;
use parish_storage::FieldMap;
use serde_json::Value;

/// A filtered read over one entity kind.
///
/// Filters compose by conjunction and compare against the entity's
/// wire map, so any wire field name works. Built by
/// [`Store::query`]; terminal calls are [`run`](Query::run),
/// [`first`](Query::first), and [`count`](Query::count).
///
/// # Example
///
/// ```rust
/// use parish_core::{Entity, Kind, Store, StoreConfig};
/// use serde_json::json;
///
/// let store = Store::open(StoreConfig::memory()).unwrap();
/// let map = json!({
///     "type_tag": "attendance",
///     "member_id": "m-1",
///     "event_id": "e-1",
/// });
/// store
///     .add(Entity::from_map(map.as_object().unwrap().clone()).unwrap())
///     .unwrap();
///
/// let present = store
///     .query(Kind::Attendance)
///     .eq("event_id", "e-1")
///     .eq("status", "present")
///     .run()
///     .unwrap();
/// assert_eq!(present.len(), 1);
/// ```
#[derive(Debug)]
pub struct Query<'a> {
    store: &'a Store,
    kind: Kind,
    filters: Vec<Filter>,
}

#[derive(Debug)]
enum Filter {
    Eq {
        field: String,
        value: Value,
    },
    DateBetween {
        field: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Filter {
    fn matches(&self, fields: &FieldMap) -> bool {
        match self {
            Filter::Eq { field, value } => fields.get(field) == Some(value),
            Filter::DateBetween { field, start, end } => fields
                .get(field)
                .and_then(Value::as_str)
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
                .is_some_and(|date| date >= *start && date <= *end),
        }
    }
}

impl<'a> Query<'a> {
    pub(crate) fn new(store: &'a Store, kind: Kind) -> Self {
        Self {
            store,
            kind,
            filters: Vec::new(),
        }
    }

    /// Keeps entities whose wire field equals `value` exactly.
    ///
    /// Entities without the field never match.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Keeps entities whose date field lies in `[start, end]`, inclusive.
    ///
    /// Entities without the field, or with a value that is not a date,
    /// never match.
    #[must_use]
    pub fn date_between(mut self, field: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        self.filters.push(Filter::DateBetween {
            field: field.into(),
            start,
            end,
        });
        self
    }

    /// Runs the query, returning matches in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity cannot be rendered to its wire map.
    pub fn run(self) -> CoreResult<Vec<Entity>> {
        let mut matches = Vec::new();
        for entity in self.store.all(Some(self.kind)).into_values() {
            let fields = entity.to_map()?;
            if self.filters.iter().all(|filter| filter.matches(&fields)) {
                matches.push(entity);
            }
        }
        Ok(matches)
    }

    /// Runs the query, returning the first match in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity cannot be rendered to its wire map.
    pub fn first(self) -> CoreResult<Option<Entity>> {
        Ok(self.run()?.into_iter().next())
    }

    /// Runs the query, returning the number of matches.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity cannot be rendered to its wire map.
    pub fn count(self) -> CoreResult<usize> {
        Ok(self.run()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use serde_json::json;

    fn add(store: &Store, value: Value) {
        let map = value.as_object().unwrap().clone();
        store.add(Entity::from_map(map).unwrap()).unwrap();
    }

    fn seeded() -> Store {
        let store = Store::open(StoreConfig::memory()).unwrap();
        add(
            &store,
            json!({
                "type_tag": "attendance",
                "id": "a-1",
                "member_id": "m-1",
                "event_id": "e-1",
                "date": "2026-03-01",
            }),
        );
        add(
            &store,
            json!({
                "type_tag": "attendance",
                "id": "a-2",
                "member_id": "m-2",
                "event_id": "e-1",
                "status": "absent",
                "date": "2026-03-08",
            }),
        );
        add(
            &store,
            json!({
                "type_tag": "attendance",
                "id": "a-3",
                "member_id": "m-1",
                "event_id": "e-2",
                "date": "2026-03-15",
            }),
        );
        store
    }

    #[test]
    fn equality_filters_compose() {
        let store = seeded();
        let hits = store
            .query(Kind::Attendance)
            .eq("event_id", "e-1")
            .eq("status", "present")
            .run()
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "a-1");
    }

    #[test]
    fn date_range_is_inclusive() {
        let store = seeded();
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let hits = store
            .query(Kind::Attendance)
            .date_between("date", start, end)
            .run()
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn results_come_back_in_key_order() {
        let store = seeded();
        let ids: Vec<String> = store
            .query(Kind::Attendance)
            .eq("member_id", "m-1")
            .run()
            .unwrap()
            .iter()
            .map(|e| e.id().to_owned())
            .collect();
        assert_eq!(ids, ["a-1", "a-3"]);
    }

    #[test]
    fn missing_field_never_matches() {
        let store = seeded();
        let count = store
            .query(Kind::Attendance)
            .eq("remarks", "late arrival")
            .count()
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn first_returns_none_on_no_match() {
        let store = seeded();
        let hit = store
            .query(Kind::Attendance)
            .eq("event_id", "e-9")
            .first()
            .unwrap();
        assert!(hit.is_none());
    }
}
