//! Field validation helpers.

use crate::error::ValidationError;
use chrono::{NaiveDate, Utc};

/// Accumulates field checks into one [`ValidationError`].
///
/// Models run every check and fail with all offending fields at once,
/// so a caller fixing a form sees the complete problem list.
///
/// # Example
///
/// ```rust
/// use parish_core::Validator;
///
/// let mut v = Validator::new();
/// v.require("first_name", "Ama");
/// v.require_email("email", "not-an-email");
/// let err = v.finish().unwrap_err();
/// assert_eq!(err.issues()[0].field, "email");
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    error: ValidationError,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an arbitrary issue.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.error.push(field, message);
    }

    /// Requires a non-empty value after trimming.
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.error.push(field, "must not be empty");
        }
    }

    /// Requires a plausible email address.
    pub fn require_email(&mut self, field: &'static str, value: &str) {
        if !is_valid_email(value) {
            self.error.push(field, "not a valid email address");
        }
    }

    /// Requires a digits-only phone number of at least ten digits.
    pub fn require_phone(&mut self, field: &'static str, value: &str) {
        if !is_valid_phone(value) {
            self.error
                .push(field, "must contain only digits, at least 10");
        }
    }

    /// Rejects dates after today.
    pub fn not_in_future(&mut self, field: &'static str, date: NaiveDate) {
        if date > Utc::now().date_naive() {
            self.error.push(field, "must not be in the future");
        }
    }

    /// Rejects an end date earlier than its start date.
    pub fn date_order(&mut self, field: &'static str, start: NaiveDate, end: NaiveDate) {
        if end < start {
            self.error.push(field, "must not be before the start date");
        }
    }

    /// Rejects negative amounts.
    pub fn non_negative(&mut self, field: &'static str, amount: f64) {
        if amount < 0.0 {
            self.error.push(field, "must not be negative");
        }
    }

    /// Returns `Ok` when no check failed, or the accumulated error.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] listing every offending field.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.error.is_empty() {
            Ok(())
        } else {
            Err(self.error)
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.len() >= 3
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_valid_phone(value: &str) -> bool {
    value.len() >= 10 && value.chars().all(|c| c.is_ascii_digit())
}
