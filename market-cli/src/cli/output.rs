//! Shared output helpers.

use anyhow::Result;
use serde::Serialize;

use market_common::validation::ValidationResult;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print every error and warning of a validation result.
pub fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        println!("  ✗ {:<28} {}", error.field, error.message);
    }
    for warning in &result.warnings {
        println!("  ! {:<28} {}", warning.field, warning.message);
    }
}

/// Print a failed validation and turn it into an error.
pub fn reject(json: bool, what: &str, result: &ValidationResult) -> Result<()> {
    if json {
        print_json(result)?;
    } else {
        println!("{} is invalid:", what);
        print_validation(result);
    }
    anyhow::bail!("{} failed validation with {} error(s)", what, result.errors.len())
}
