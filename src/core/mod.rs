//! Core business logic - framework-agnostic insert, select, update and delete
//! operations for every table, plus the relation aggregates built on top.

pub mod details;
pub mod equipment_type;
pub mod expense;
pub mod invoice;
pub mod organization;
pub mod project;
pub mod seed;
pub mod user;

use crate::errors::{Error, Result};

/// Trims a required text field and rejects it if nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Trims optional text, treating blank input as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Amounts are integer cents and may not be negative.
pub(crate) const fn non_negative_cents(amount: i64) -> Result<i64> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Formats integer cents as a decimal string, e.g. `12345` -> `"123.45"`.
#[must_use]
pub fn format_cents(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
