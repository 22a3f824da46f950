//! Financial records.

use super::today;
use crate::error::ValidationError;
use crate::meta::Meta;
use crate::validate::Validator;
use chrono::NaiveDate;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};

/// A single income or expense transaction.
///
/// Records may be tied to an event, department, or group through the
/// optional id fields; none of the links is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Whether money came in or went out.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Amount in the congregation's currency, never negative.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// Category such as `tithe`, `offering`, or `salaries`.
    pub category: String,
    /// Day of the transaction, today unless stated.
    #[serde(default = "today")]
    pub date: NaiveDate,
    /// Who gave, for income records.
    #[serde(default)]
    pub donor: Option<String>,
    /// Event the record belongs to, if any.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Department the record belongs to, if any.
    #[serde(default)]
    pub department_id: Option<String>,
    /// Group the record belongs to, if any.
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Direction of a financial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl RecordType {
    /// Returns the wire form of the record type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        }
    }
}

impl FinancialRecord {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.non_negative("amount", self.amount);
        v.require("description", &self.description);
        v.require("category", &self.category);
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("type"),
    ColumnSpec::real("amount"),
    ColumnSpec::text("description"),
    ColumnSpec::text("category"),
    ColumnSpec::text("date"),
    ColumnSpec::opt_text("donor"),
    ColumnSpec::opt_text("event_id"),
    ColumnSpec::opt_text("department_id"),
    ColumnSpec::opt_text("group_id"),
];
