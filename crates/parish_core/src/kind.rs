//! The closed set of entity kinds.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminator for an entity's concrete type.
///
/// The set is closed: persisted records resolve through
/// [`Kind::from_tag`], and tags outside the set are rejected explicitly
/// rather than dispatched by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// A registered member of the congregation.
    Member,
    /// A login account.
    User,
    /// An organizational department.
    Department,
    /// A fellowship or ministry group.
    Group,
    /// A scheduled event or service.
    Event,
    /// One member's attendance at one event.
    Attendance,
    /// An income or expense entry.
    FinancialRecord,
    /// A named access role.
    Role,
    /// A named capability grantable to a role.
    Permission,
}

impl Kind {
    /// All kinds, in key-space order.
    pub const ALL: [Kind; 9] = [
        Kind::Member,
        Kind::User,
        Kind::Department,
        Kind::Group,
        Kind::Event,
        Kind::Attendance,
        Kind::FinancialRecord,
        Kind::Role,
        Kind::Permission,
    ];

    /// Returns the wire tag, as carried in `type_tag` fields and store
    /// keys.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Kind::Member => "member",
            Kind::User => "user",
            Kind::Department => "department",
            Kind::Group => "group",
            Kind::Event => "event",
            Kind::Attendance => "attendance",
            Kind::FinancialRecord => "financial_record",
            Kind::Role => "role",
            Kind::Permission => "permission",
        }
    }

    /// Returns the relational table name for this kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Kind::Member => "members",
            Kind::User => "users",
            Kind::Department => "departments",
            Kind::Group => "groups",
            Kind::Event => "events",
            Kind::Attendance => "attendance",
            Kind::FinancialRecord => "financial_records",
            Kind::Role => "roles",
            Kind::Permission => "permissions",
        }
    }

    /// Resolves a wire tag to a kind, or `None` for unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns the store key `"{tag}.{id}"` for an id of this kind.
    #[must_use]
    pub fn key(self, id: &str) -> String {
        format!("{}.{id}", self.tag())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Kind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_tag(s).ok_or_else(|| CoreError::unknown_kind(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(Kind::from_tag("Member"), None);
        assert_eq!(Kind::from_tag("widget"), None);
        assert!("widget".parse::<Kind>().is_err());
    }

    #[test]
    fn keys_use_tag_prefix() {
        assert_eq!(Kind::Member.key("abc"), "member.abc");
        assert_eq!(Kind::FinancialRecord.key("f-1"), "financial_record.f-1");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Kind::FinancialRecord).unwrap();
        assert_eq!(json, "\"financial_record\"");
        let kind: Kind = serde_json::from_str("\"attendance\"").unwrap();
        assert_eq!(kind, Kind::Attendance);
    }
}
