//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize the
//! write-side checks so every entity enforces the same rules.

use crate::{EngineError, ResultEngine, transactions::DEFAULT_CURRENCY};

/// Trim a required text field, rejecting blank values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank values become `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Upper-case a three letter currency code, defaulting to USD.
pub(crate) fn normalize_currency(value: Option<&str>) -> ResultEngine<String> {
    let Some(code) = normalize_optional_text(value) else {
        return Ok(DEFAULT_CURRENCY.to_string());
    };
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EngineError::InvalidName(format!(
            "invalid currency code: {code}"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Amounts are never negative.
pub(crate) fn ensure_non_negative(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor < 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

pub(crate) fn ensure_positive(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}
