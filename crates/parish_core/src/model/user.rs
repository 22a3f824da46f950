//! Login accounts.

use super::default_true;
use crate::error::{CoreError, ValidationError};
use crate::meta::Meta;
use crate::validate::Validator;
use parish_storage::ColumnSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account that can sign in to the system.
///
/// `password_hash` holds a salted digest, never a plain password. Both
/// `username` and `email` are unique across users; callers check that
/// before `add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: Meta,
    /// Sign-in name, unique across users.
    pub username: String,
    /// Contact email, unique across users.
    pub email: String,
    /// Salted password digest in `salt$hexdigest` form.
    pub password_hash: String,
    /// Access level, `member` unless stated.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the account may sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the email address has been confirmed.
    #[serde(default)]
    pub is_verified: bool,
    /// Given name, if provided.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name, if provided.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact phone, if provided.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Member record this account belongs to, if any.
    #[serde(default)]
    pub member_id: Option<String>,
}

/// Access level of a login account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access.
    Admin,
    /// Leadership access to congregation records.
    Pastor,
    /// Self-service access only.
    #[default]
    Member,
}

impl UserRole {
    /// Returns the wire form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Pastor => "pastor",
            UserRole::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "pastor" => Ok(UserRole::Pastor),
            "member" => Ok(UserRole::Member),
            other => Err(CoreError::config(format!("unknown role '{other}'"))),
        }
    }
}

impl User {
    /// Checks the field rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require("username", &self.username);
        let trimmed = self.username.trim();
        if !trimmed.is_empty() && (trimmed.len() < 4 || trimmed.len() > 50) {
            v.push("username", "must be between 4 and 50 characters");
        }
        v.require_email("email", &self.email);
        v.require("password_hash", &self.password_hash);
        v.finish()
    }
}

pub(crate) const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::text("username"),
    ColumnSpec::text("email"),
    ColumnSpec::text("password_hash"),
    ColumnSpec::text("role"),
    ColumnSpec::boolean("is_active"),
    ColumnSpec::boolean("is_verified"),
    ColumnSpec::opt_text("first_name"),
    ColumnSpec::opt_text("last_name"),
    ColumnSpec::opt_text("phone_number"),
    ColumnSpec::opt_text("member_id"),
];
