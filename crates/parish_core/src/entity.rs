//! The entity base contract.
//!
//! Every record kind shares one wire shape: a flat JSON object carrying
//! a `type_tag` discriminator, the [`Meta`] identity fields, and the
//! kind-specific fields. [`Entity`] is the closed sum of those kinds
//! and the only type the store traffics in.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::kind::Kind;
use crate::meta::{self, Meta};
use crate::model::{
    Attendance, Department, Event, FinancialRecord, Group, Member, Permission, Role, User,
};
use chrono::{SecondsFormat, Utc};
use parish_storage::FieldMap;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record of any kind.
///
/// Serializes to the flat wire object with a `type_tag` discriminator;
/// the same encoding is used for API responses and the file backend's
/// snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type_tag", rename_all = "snake_case")]
pub enum Entity {
    /// A church member.
    Member(Member),
    /// A login account.
    User(User),
    /// A ministry department.
    Department(Department),
    /// A fellowship group.
    Group(Group),
    /// A scheduled event.
    Event(Event),
    /// An attendance record.
    Attendance(Attendance),
    /// A financial record.
    FinancialRecord(FinancialRecord),
    /// A named role.
    Role(Role),
    /// A named permission.
    Permission(Permission),
}

impl Entity {
    /// Builds an entity from its wire map.
    ///
    /// Unknown keys are ignored. A missing `id` or timestamp is freshly
    /// generated; supplied ones are preserved. A map without
    /// `created_at` and `updated_at` gets the same instant for both.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when `type_tag` or a required
    /// field is missing or malformed, and [`CoreError::UnknownKind`]
    /// when `type_tag` is outside the closed kind set.
    pub fn from_map(mut fields: FieldMap) -> CoreResult<Self> {
        {
            let Some(tag) = fields.get("type_tag").and_then(Value::as_str) else {
                return Err(ValidationError::single("type_tag", "is required").into());
            };
            if Kind::from_tag(tag).is_none() {
                return Err(CoreError::unknown_kind(tag));
            }
        }
        ensure_meta(&mut fields);
        serde_json::from_value(Value::Object(fields))
            .map_err(|err| ValidationError::from_decode(&err).into())
    }

    /// Renders the entity as its flat wire map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if the entity cannot be encoded.
    pub fn to_map(&self) -> CoreResult<FieldMap> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Codec(serde_json::Error::custom(
                "entity did not encode to a map",
            ))),
            Err(err) => Err(CoreError::Codec(err)),
        }
    }

    /// Applies a partial update.
    ///
    /// Patch entries overwrite the current fields; `id`, `type_tag`,
    /// and the timestamps are pinned and silently skipped. On success
    /// `updated_at` is refreshed. On failure the entity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the patched map no longer
    /// decodes.
    pub fn merge(&mut self, patch: &FieldMap) -> CoreResult<()> {
        let mut merged = self.to_map()?;
        for (field, value) in patch {
            if matches!(
                field.as_str(),
                "id" | "type_tag" | "created_at" | "updated_at"
            ) {
                continue;
            }
            merged.insert(field.clone(), value.clone());
        }
        let mut next = Entity::from_map(merged)?;
        next.meta_mut().touch();
        *self = next;
        Ok(())
    }

    /// Returns the kind of this entity.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Entity::Member(_) => Kind::Member,
            Entity::User(_) => Kind::User,
            Entity::Department(_) => Kind::Department,
            Entity::Group(_) => Kind::Group,
            Entity::Event(_) => Kind::Event,
            Entity::Attendance(_) => Kind::Attendance,
            Entity::FinancialRecord(_) => Kind::FinancialRecord,
            Entity::Role(_) => Kind::Role,
            Entity::Permission(_) => Kind::Permission,
        }
    }

    /// Returns the identity and audit timestamps.
    #[must_use]
    pub fn meta(&self) -> &Meta {
        match self {
            Entity::Member(m) => &m.meta,
            Entity::User(u) => &u.meta,
            Entity::Department(d) => &d.meta,
            Entity::Group(g) => &g.meta,
            Entity::Event(e) => &e.meta,
            Entity::Attendance(a) => &a.meta,
            Entity::FinancialRecord(f) => &f.meta,
            Entity::Role(r) => &r.meta,
            Entity::Permission(p) => &p.meta,
        }
    }

    /// Returns the identity and audit timestamps for mutation.
    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            Entity::Member(m) => &mut m.meta,
            Entity::User(u) => &mut u.meta,
            Entity::Department(d) => &mut d.meta,
            Entity::Group(g) => &mut g.meta,
            Entity::Event(e) => &mut e.meta,
            Entity::Attendance(a) => &mut a.meta,
            Entity::FinancialRecord(f) => &mut f.meta,
            Entity::Role(r) => &mut r.meta,
            Entity::Permission(p) => &mut p.meta,
        }
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.meta().id
    }

    /// Returns the store key, `"{tag}.{id}"`.
    #[must_use]
    pub fn key(&self) -> String {
        self.kind().key(self.id())
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.meta_mut().touch();
    }

    /// Checks the kind-specific field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Entity::Member(m) => m.validate(),
            Entity::User(u) => u.validate(),
            Entity::Department(d) => d.validate(),
            Entity::Group(g) => g.validate(),
            Entity::Event(e) => e.validate(),
            Entity::Attendance(a) => a.validate(),
            Entity::FinancialRecord(f) => f.validate(),
            Entity::Role(r) => r.validate(),
            Entity::Permission(p) => p.validate(),
        }
    }
}

/// Fills in absent identity fields, preserving supplied ones.
///
/// With neither timestamp present both get the same instant. With one
/// present the other copies it, keeping `updated_at >= created_at`.
fn ensure_meta(fields: &mut FieldMap) {
    if !fields.contains_key("id") {
        fields.insert("id".to_owned(), Value::String(meta::fresh_id()));
    }
    match (
        fields.get("created_at").cloned(),
        fields.get("updated_at").cloned(),
    ) {
        (None, None) => {
            let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
            fields.insert("created_at".to_owned(), now.clone());
            fields.insert("updated_at".to_owned(), now);
        }
        (Some(created), None) => {
            fields.insert("updated_at".to_owned(), created);
        }
        (None, Some(updated)) => {
            fields.insert("created_at".to_owned(), updated);
        }
        (Some(_), Some(_)) => {}
    }
}

impl From<Member> for Entity {
    fn from(value: Member) -> Self {
        Entity::Member(value)
    }
}

impl From<User> for Entity {
    fn from(value: User) -> Self {
        Entity::User(value)
    }
}

impl From<Department> for Entity {
    fn from(value: Department) -> Self {
        Entity::Department(value)
    }
}

impl From<Group> for Entity {
    fn from(value: Group) -> Self {
        Entity::Group(value)
    }
}

impl From<Event> for Entity {
    fn from(value: Event) -> Self {
        Entity::Event(value)
    }
}

impl From<Attendance> for Entity {
    fn from(value: Attendance) -> Self {
        Entity::Attendance(value)
    }
}

impl From<FinancialRecord> for Entity {
    fn from(value: FinancialRecord) -> Self {
        Entity::FinancialRecord(value)
    }
}

impl From<Role> for Entity {
    fn from(value: Role) -> Self {
        Entity::Role(value)
    }
}

impl From<Permission> for Entity {
    fn from(value: Permission) -> Self {
        Entity::Permission(value)
    }
}
