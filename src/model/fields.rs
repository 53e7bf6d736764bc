//! Helpers used by the entry drafts to turn raw text fields into committed values.

use crate::error::ValidationError;
use crate::model::Amount;
use std::str::FromStr;

/// Returns the trimmed text, or `MissingRequiredField` if it is blank.
pub(crate) fn required_text(
    record: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingRequiredField { record, field });
    }
    Ok(trimmed.to_string())
}

/// Returns `None` for blank text, otherwise the trimmed text.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses a required, non-negative amount.
pub(crate) fn required_amount(
    record: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<Amount, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { record, field });
    }
    parse_amount(record, field, raw)
}

/// Parses an optional, non-negative amount; blank text is zero.
pub(crate) fn optional_amount(
    record: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<Amount, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(Amount::ZERO);
    }
    parse_amount(record, field, raw)
}

fn parse_amount(
    record: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<Amount, ValidationError> {
    let invalid = || ValidationError::InvalidNumericField {
        record,
        field,
        value: raw.to_string(),
    };
    let amount = Amount::from_str(raw).map_err(|_| invalid())?;
    if amount.is_negative() {
        return Err(invalid());
    }
    Ok(amount)
}
