//! Event attendance records.

use super::today;
use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use chrono::NaiveDate;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// One member's attendance at one event.
///
/// The (event, member) pair is unique; duplicates are rejected by the
/// caller before `add`, not by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Member who attended.
    pub member_id: String,
    /// Event attended.
    pub event_id: String,
    /// Whether the member was there, `present` unless stated.
    #[serde(default)]
    pub status: AttendanceStatus,
    /// Day of attendance, today unless stated.
    #[serde(default = "today")]
    pub date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Whether the attendee was a visiting guest.
    #[serde(default)]
    pub is_guest: bool,
}

/// Whether a member attended an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Attended.
    #[default]
    Present,
    /// Did not attend.
    Absent,
}

impl AttendanceStatus {
    /// Returns the wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl Attendance {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require("member_id", &self.member_id);
        v.require("event_id", &self.event_id);
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("member_id"),
    ColumnSpec::text("event_id"),
    ColumnSpec::text("status"),
    ColumnSpec::text("date"),
    ColumnSpec::opt_text("remarks"),
    ColumnSpec::boolean("is_guest"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_required() {
        let a = Attendance {
            meta: Meta::new(),
            member_id: String::new(),
            event_id: " ".into(),
            status: AttendanceStatus::default(),
            date: today(),
            remarks: None,
            is_guest: false,
        };
        let err = a.validate().unwrap_err();
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn defaults_mark_a_present_member() {
        let value = serde_json::json!({
            "id": "a-1",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
            "member_id": "m-1",
            "event_id": "e-1"
        });
        let a: Attendance = serde_json::from_value(value).unwrap();
        assert_eq!(a.status, AttendanceStatus::Present);
        assert!(!a.is_guest);
        assert_eq!(a.date, today());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"late\"").is_err());
    }
}
