//! Form validation.
//!
//! Validators never fail fast: every field is checked and each problem is
//! recorded as a [`ValidationError`] with the field path, so a form can show
//! all messages at once. A failed result is re-checked only when the
//! validator is called again.

mod asset_form;
mod proposal_form;
mod trade_form;

pub use asset_form::{AssetDraft, CreateAssetRequest, WizardStep};
pub use proposal_form::{ProposalForm, ProposalRequest};
pub use trade_form::{ListingForm, ListingPurchaseForm, ListingRequest, PurchaseForm, TradeQuote};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::UnitsError;

/// Result of validating a form or configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the input is valid
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    /// Non-fatal findings
    pub warnings: Vec<ValidationWarning>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// First error recorded for `field`
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn has_error(&self, field: &str, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.field == field && e.code == code)
    }
}

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field path that caused the error
    pub field: String,
    pub message: String,
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: ValidationErrorCode,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    /// Field is required but missing
    Required,
    /// Value is out of valid range
    OutOfRange,
    /// Invalid format (e.g., fractional shares)
    InvalidFormat,
    TooLong,
    /// Value contradicts another field
    Inconsistent,
    /// Per-user purchase limit would be exceeded
    LimitExceeded,
    /// Generic validation failure
    Invalid,
}

/// A validation warning (non-fatal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Field checks shared by the form validators. Those returning a value hand it
// back only when it passed, so dependent checks can be skipped.

pub(crate) fn require_text(
    result: &mut ValidationResult,
    field: &str,
    label: &str,
    value: &str,
    max_len: usize,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        result.add_error(ValidationError::new(
            field,
            format!("{} is required", label),
            ValidationErrorCode::Required,
        ));
    } else if trimmed.chars().count() > max_len {
        result.add_error(ValidationError::new(
            field,
            format!("{} must be at most {} characters", label, max_len),
            ValidationErrorCode::TooLong,
        ));
    }
}

pub(crate) fn require_value(
    result: &mut ValidationResult,
    field: &str,
    label: &str,
    value: Option<Decimal>,
) -> Option<Decimal> {
    if value.is_none() {
        result.add_error(ValidationError::new(
            field,
            format!("{} is required", label),
            ValidationErrorCode::Required,
        ));
    }
    value
}

pub(crate) fn require_positive(
    result: &mut ValidationResult,
    field: &str,
    label: &str,
    value: Option<Decimal>,
) -> Option<Decimal> {
    let value = require_value(result, field, label, value)?;
    if value <= Decimal::ZERO {
        result.add_error(ValidationError::new(
            field,
            format!("{} must be greater than 0", label),
            ValidationErrorCode::OutOfRange,
        ));
        return None;
    }
    Some(value)
}

pub(crate) fn require_whole(
    result: &mut ValidationResult,
    field: &str,
    label: &str,
    value: Decimal,
) -> bool {
    if value.fract().is_zero() {
        true
    } else {
        result.add_error(ValidationError::new(
            field,
            format!("{} must be a whole number of shares", label),
            ValidationErrorCode::InvalidFormat,
        ));
        false
    }
}

pub(crate) fn require_non_negative(
    result: &mut ValidationResult,
    field: &str,
    label: &str,
    value: Option<Decimal>,
) {
    if value.is_some_and(|v| v < Decimal::ZERO) {
        result.add_error(ValidationError::new(
            field,
            format!("{} cannot be negative", label),
            ValidationErrorCode::OutOfRange,
        ));
    }
}

/// Accept a converted amount only when it is at least one raw unit.
///
/// A positive input smaller than the raw resolution converts to `0`, which
/// the contract reads as free or unlimited.
pub(crate) fn require_raw(
    result: &mut ValidationResult,
    field: &str,
    too_small: &str,
    raw: Result<u128, UnitsError>,
) -> Option<u128> {
    match raw {
        Ok(0) => {
            result.add_error(ValidationError::new(
                field,
                too_small,
                ValidationErrorCode::OutOfRange,
            ));
            None
        }
        Ok(value) => Some(value),
        Err(e) => {
            result.add_error(ValidationError::new(
                field,
                e.to_string(),
                ValidationErrorCode::Invalid,
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_merge_propagates_failure() {
        let mut result = ValidationResult::success();
        let mut other = ValidationResult::success();
        other.add_error(ValidationError::new(
            "name",
            "Name is required",
            ValidationErrorCode::Required,
        ));
        other.add_warning(ValidationWarning::new("price", "Price is unusually high"));

        result.merge(other);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.has_error("name", ValidationErrorCode::Required));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut result = ValidationResult::success();
        result.add_warning(ValidationWarning::new("x", "heads up"));
        assert!(result.valid);
    }

    #[test]
    fn test_field_checks() {
        let mut result = ValidationResult::success();
        require_text(&mut result, "name", "Name", "   ", 10);
        require_text(&mut result, "title", "Title", "a very long title", 5);
        assert_eq!(require_positive(&mut result, "price", "Price", Some(dec!(0))), None);
        assert!(!require_whole(&mut result, "shares", "Shares", dec!(1.5)));
        require_non_negative(&mut result, "cost", "Cost", Some(dec!(-1)));

        assert!(result.has_error("name", ValidationErrorCode::Required));
        assert!(result.has_error("title", ValidationErrorCode::TooLong));
        assert!(result.has_error("price", ValidationErrorCode::OutOfRange));
        assert!(result.has_error("shares", ValidationErrorCode::InvalidFormat));
        assert!(result.has_error("cost", ValidationErrorCode::OutOfRange));
        assert_eq!(result.errors.len(), 5);
    }

    #[test]
    fn test_require_raw() {
        let mut result = ValidationResult::success();
        assert_eq!(require_raw(&mut result, "price", "Price is too small", Ok(7)), Some(7));
        assert!(result.valid);

        assert_eq!(require_raw(&mut result, "price", "Price is too small", Ok(0)), None);
        assert!(result.has_error("price", ValidationErrorCode::OutOfRange));
        assert_eq!(result.error_for("price").unwrap().message, "Price is too small");

        let overflow = Err(UnitsError::Overflow("1e40".to_string()));
        assert_eq!(require_raw(&mut result, "total", "Total is too small", overflow), None);
        assert!(result.has_error("total", ValidationErrorCode::Invalid));
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("amount", "Amount is required", ValidationErrorCode::Required);
        assert_eq!(err.to_string(), "amount: Amount is required");
    }
}
