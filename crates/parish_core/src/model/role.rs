//! Named access roles.

use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A named role that permissions can be attached to.
///
/// Role names are unique; the uniqueness check happens at the caller
/// before `add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Role name, unique across roles.
    pub name: String,
    /// What the role grants.
    #[serde(default)]
    pub description: String,
}

impl Role {
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

pub(crate) const COLUMNS: &[ColumnSpec] =
    &[ColumnSpec::text("name"), ColumnSpec::text("description")];
