//! Entity models for every record kind.
//!
//! Each model embeds [`Meta`](crate::Meta) for identity and timestamps,
//! derives the wire format via serde, and checks its own field rules
//! with `validate()`. Column descriptors for the relational backend
//! live next to each model and are collected by [`table_specs`].

mod attendance;
mod department;
mod event;
mod finance;
mod group;
mod member;
mod permission;
mod role;
mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use department::Department;
pub use event::Event;
pub use finance::{FinancialRecord, RecordType};
pub use group::Group;
pub use member::{Gender, MaritalStatus, Member, MemberRole, MemberStatus};
pub use permission::Permission;
pub use role::Role;
pub use user::{User, UserRole};

use crate::kind::Kind;
use chrono::{NaiveDate, Utc};
use parish_storage::TableSpec;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn default_true() -> bool {
    true
}

const TABLE_SPECS: &[TableSpec] = &[
    TableSpec::new(Kind::Member.tag(), Kind::Member.table(), member::COLUMNS),
    TableSpec::new(Kind::User.tag(), Kind::User.table(), user::COLUMNS),
    TableSpec::new(
        Kind::Department.tag(),
        Kind::Department.table(),
        department::COLUMNS,
    ),
    TableSpec::new(Kind::Group.tag(), Kind::Group.table(), group::COLUMNS),
    TableSpec::new(Kind::Event.tag(), Kind::Event.table(), event::COLUMNS),
    TableSpec::new(
        Kind::Attendance.tag(),
        Kind::Attendance.table(),
        attendance::COLUMNS,
    ),
    TableSpec::new(
        Kind::FinancialRecord.tag(),
        Kind::FinancialRecord.table(),
        finance::COLUMNS,
    ),
    TableSpec::new(Kind::Role.tag(), Kind::Role.table(), role::COLUMNS),
    TableSpec::new(
        Kind::Permission.tag(),
        Kind::Permission.table(),
        permission::COLUMNS,
    ),
];

/// Table descriptors for every kind, consumed by the relational backend.
#[must_use]
pub fn table_specs() -> &'static [TableSpec] {
    TABLE_SPECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_cover_every_kind() {
        assert_eq!(table_specs().len(), Kind::ALL.len());
        for kind in Kind::ALL {
            assert!(table_specs().iter().any(|spec| spec.kind == kind.tag()));
        }
    }

    #[test]
    fn specs_never_list_meta_columns() {
        for spec in table_specs() {
            for column in spec.columns {
                assert!(
                    !matches!(column.name, "id" | "created_at" | "updated_at" | "type_tag"),
                    "{} lists reserved column {}",
                    spec.kind,
                    column.name
                );
            }
        }
    }
}
