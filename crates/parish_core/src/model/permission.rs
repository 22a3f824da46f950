//! Named permissions.

use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A named capability, optionally attached to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Permission name.
    pub name: String,
    /// What the permission allows.
    #[serde(default)]
    pub description: String,
    /// Role the permission belongs to, if any.
    #[serde(default)]
    pub role_id: Option<String>,
}

impl Permission {
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
    ColumnSpec::opt_text("role_id"),
];
