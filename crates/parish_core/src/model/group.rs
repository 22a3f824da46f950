//! Fellowship groups.

use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A fellowship group such as a youth or women's group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Group name.
    pub name: String,
    /// What the group is about.
    #[serde(default)]
    pub description: String,
    /// Member heading the group, if assigned.
    #[serde(default)]
    pub head: Option<String>,
    /// Department the group belongs to, if any.
    #[serde(default)]
    pub department_id: Option<String>,
}

impl Group {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require("name", &self.name);
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("name"),
    ColumnSpec::text("description"),
    ColumnSpec::opt_text("head"),
    ColumnSpec::opt_text("department_id"),
];
