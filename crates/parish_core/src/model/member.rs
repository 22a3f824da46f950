//! Church member records.

use super::today;
use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use chrono::NaiveDate;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A registered member of the congregation.
///
/// Email addresses are unique across members; the uniqueness check is
/// the caller's responsibility before `add`, the store itself does not
/// enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email, unique across members.
    pub email: String,
    /// Contact phone, digits only.
    pub phone_number: String,
    /// Postal or residential address.
    #[serde(default)]
    pub address: String,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Marital status.
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    /// Membership status, `active` unless stated.
    #[serde(default)]
    pub status: MemberStatus,
    /// Role within the congregation, `member` unless stated.
    #[serde(default)]
    pub role: MemberRole,
    /// Date the person joined, today unless stated.
    #[serde(default = "today")]
    pub date_joined: NaiveDate,
    /// Department the member serves in, if any.
    #[serde(default)]
    pub department_id: Option<String>,
    /// Group the member belongs to, if any.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Gender of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

/// Marital status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    /// Never married.
    Single,
    /// Married.
    Married,
    /// Divorced.
    Divorced,
    /// Widowed.
    Widowed,
}

/// Membership status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// In active fellowship.
    #[default]
    Active,
    /// Not currently active.
    Inactive,
    /// Suspended by leadership.
    Suspended,
}

impl MemberStatus {
    /// Returns the wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Suspended => "suspended",
        }
    }
}

/// Role a member plays within the congregation.
///
/// Distinct from [`UserRole`](super::UserRole): this describes church
/// service, not API access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Ordinary member.
    #[default]
    Member,
    /// Group or department leader.
    Leader,
    /// Administrative staff.
    Admin,
    /// Pastor.
    Pastor,
}

impl Member {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require("first_name", &self.first_name);
        v.require("last_name", &self.last_name);
        v.require_email("email", &self.email);
        v.require_phone("phone_number", &self.phone_number);
        if let Some(dob) = self.date_of_birth {
            v.not_in_future("date_of_birth", dob);
        }
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("first_name"),
    ColumnSpec::text("last_name"),
    ColumnSpec::text("email"),
    ColumnSpec::text("phone_number"),
    ColumnSpec::text("address"),
    ColumnSpec::opt_text("date_of_birth"),
    ColumnSpec::opt_text("gender"),
    ColumnSpec::opt_text("marital_status"),
    ColumnSpec::text("status"),
    ColumnSpec::text("role"),
    ColumnSpec::text("date_joined"),
    ColumnSpec::opt_text("department_id"),
    ColumnSpec::opt_text("group_id"),
];
