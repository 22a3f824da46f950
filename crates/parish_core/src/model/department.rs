//! Ministry departments.

use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A serving department such as ushering or media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Department name.
    pub name: String,
    /// What the department does.
    #[serde(default)]
    pub description: String,
    /// Member heading the department, if assigned.
    #[serde(default)]
    pub head: Option<String>,
}

impl Department {
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
];
