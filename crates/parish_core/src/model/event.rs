//! Church events and services.

use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use chrono::{NaiveDate, NaiveTime};
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A scheduled event such as a service, workshop, or outreach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Event name.
    pub name: String,
    /// What the event is about.
    #[serde(default)]
    pub description: String,
    /// First day of the event.
    pub start_date: NaiveDate,
    /// Last day, for events spanning more than one day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Time the event starts.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Time the event ends.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Where the event takes place.
    #[serde(default)]
    pub location: String,
    /// Free-form category such as `service` or `workshop`.
    #[serde(default)]
    pub event_type: String,
    /// Whether attendees must register beforehand.
    #[serde(default)]
    pub is_registration_required: bool,
    /// Whether the event repeats.
    #[serde(default)]
    pub is_recurring: bool,
    /// Repeat pattern such as `weekly`, when recurring.
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
}

impl Event {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require("name", &self.name);
        if let Some(end) = self.end_date {
            v.date_order("end_date", self.start_date, end);
        }
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("name"),
    ColumnSpec::text("description"),
    ColumnSpec::text("start_date"),
    ColumnSpec::opt_text("end_date"),
    ColumnSpec::opt_text("start_time"),
    ColumnSpec::opt_text("end_time"),
    ColumnSpec::text("location"),
    ColumnSpec::text("event_type"),
    ColumnSpec::boolean("is_registration_required"),
    ColumnSpec::boolean("is_recurring"),
    ColumnSpec::opt_text("recurrence_pattern"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            meta: Meta::new(),
            name: "Harvest Service".into(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(),
            end_date: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(12, 30, 0),
            location: "Main auditorium".into(),
            event_type: "service".into(),
            is_registration_required: false,
            is_recurring: false,
            recurrence_pattern: None,
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(event().validate().is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut e = event();
        e.end_date = NaiveDate::from_ymd_opt(2026, 9, 5);
        let err = e.validate().unwrap_err();
        assert_eq!(err.issues()[0].field, "end_date");
    }

    #[test]
    fn single_day_event_may_end_on_start_date() {
        let mut e = event();
        e.end_date = Some(e.start_date);
        assert!(e.validate().is_ok());
    }

    #[test]
    fn flags_default_to_false() {
        let value = serde_json::json!({
            "id": "e-1",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "name": "Prayer Meeting",
            "start_date": "2026-03-04"
        });
        let e: Event = serde_json::from_value(value).unwrap();
        assert!(!e.is_registration_required);
        assert!(!e.is_recurring);
        assert!(e.start_time.is_none());
    }
}
