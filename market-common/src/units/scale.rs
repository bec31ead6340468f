//! Integer scale conversions (basis points, weight units, wei).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Basis points in one percent
pub const BASIS_POINTS_PER_PERCENT: u32 = 100;

/// Basis points in 100%
pub const MAX_BASIS_POINTS: u32 = 10_000;

/// Decimal places of the weighted-model ownership unit
pub const WEIGHT_DECIMALS: u32 = 16;

/// Weight units in one percent (1e16)
pub const WEIGHT_PER_PERCENT: u128 = 10_000_000_000_000_000;

/// Weight units in 100% (1e18)
pub const FULL_WEIGHT: u128 = 100 * WEIGHT_PER_PERCENT;

/// Decimals of the native token and of every wei-scaled price
pub const TOKEN_DECIMALS: u32 = 18;

/// Largest scale a `Decimal` can carry
const MAX_SCALE: u32 = 28;

/// Errors from unit conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// Value does not fit the target representation
    #[error("value {0} is out of range")]
    Overflow(String),

    /// Contract amounts are unsigned
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),

    /// Scale larger than a decimal can hold
    #[error("unsupported number of decimals: {0}")]
    UnsupportedDecimals(u32),

    /// User input is not a number
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// Convert basis points to a percentage (`250` → `2.5`).
pub fn basis_points_to_percentage(bps: u32) -> Decimal {
    Decimal::new(i64::from(bps), 2)
}

/// Convert a percentage to whole basis points.
///
/// Rounds half away from zero below 0.01% and clamps to `[0, 10000]`.
pub fn percentage_to_basis_points(percentage: Decimal) -> u32 {
    if percentage.is_sign_negative() {
        return 0;
    }
    match percentage.checked_mul(Decimal::from(BASIS_POINTS_PER_PERCENT)) {
        Some(bps) => bps
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .map_or(MAX_BASIS_POINTS, |b| b.min(MAX_BASIS_POINTS)),
        None => MAX_BASIS_POINTS,
    }
}

/// Convert a raw integer with `decimals` implied places to a decimal.
pub fn format_units(raw: u128, decimals: u32) -> Result<Decimal, UnitsError> {
    if decimals > MAX_SCALE {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    let signed = i128::try_from(raw).map_err(|_| UnitsError::Overflow(raw.to_string()))?;
    Decimal::try_from_i128_with_scale(signed, decimals)
        .map(|d| d.normalize())
        .map_err(|_| UnitsError::Overflow(raw.to_string()))
}

/// Convert a decimal to a raw integer with `decimals` implied places.
///
/// Digits below the last implied place are truncated.
pub fn parse_units(value: Decimal, decimals: u32) -> Result<u128, UnitsError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(UnitsError::Negative(value));
    }
    if decimals > MAX_SCALE {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    let overflow = || UnitsError::Overflow(value.to_string());
    let factor = 10u128.checked_pow(decimals).ok_or_else(overflow)?;

    // Split so the multiplication never leaves the decimal range.
    let whole = value.trunc().to_u128().ok_or_else(overflow)?;
    let fraction = value.fract();
    let fraction_factor = Decimal::from_u128(factor).ok_or_else(overflow)?;
    let scaled_fraction = fraction
        .checked_mul(fraction_factor)
        .ok_or_else(overflow)?
        .trunc()
        .to_u128()
        .ok_or_else(overflow)?;

    whole
        .checked_mul(factor)
        .and_then(|w| w.checked_add(scaled_fraction))
        .ok_or_else(overflow)
}

/// Weight units to percentage (`25e16` → `25`).
pub fn weight_to_percentage(weight: u128) -> Result<Decimal, UnitsError> {
    format_units(weight, WEIGHT_DECIMALS)
}

/// Percentage to weight units (`25` → `25e16`).
pub fn percentage_to_weight(percentage: Decimal) -> Result<u128, UnitsError> {
    parse_units(percentage, WEIGHT_DECIMALS)
}

/// Parse user-entered decimal text.
///
/// Accepts surrounding whitespace and `,`/`_` digit separators.
pub fn try_parse_decimal_input(input: &str) -> Result<Decimal, UnitsError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Err(UnitsError::InvalidNumber(input.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| UnitsError::InvalidNumber(input.to_string()))
}

/// Parse user-entered decimal text, defaulting to zero.
pub fn parse_decimal_input(input: &str) -> Decimal {
    try_parse_decimal_input(input).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basis_points_to_percentage() {
        assert_eq!(basis_points_to_percentage(0), dec!(0));
        assert_eq!(basis_points_to_percentage(1), dec!(0.01));
        assert_eq!(basis_points_to_percentage(250), dec!(2.5));
        assert_eq!(basis_points_to_percentage(10_000), dec!(100));
    }

    #[test]
    fn test_percentage_to_basis_points_rounding() {
        assert_eq!(percentage_to_basis_points(dec!(2.5)), 250);
        assert_eq!(percentage_to_basis_points(dec!(0.005)), 1);
        assert_eq!(percentage_to_basis_points(dec!(0.004)), 0);
        assert_eq!(percentage_to_basis_points(dec!(-3)), 0);
        assert_eq!(percentage_to_basis_points(dec!(150)), MAX_BASIS_POINTS);
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(100_000_000_000_000_000, 18).unwrap(), dec!(0.1));
        assert_eq!(format_units(0, 18).unwrap(), dec!(0));
        assert_eq!(format_units(25 * WEIGHT_PER_PERCENT, WEIGHT_DECIMALS).unwrap(), dec!(25));
        assert!(matches!(format_units(1, 29), Err(UnitsError::UnsupportedDecimals(29))));
        assert!(matches!(format_units(u128::MAX, 18), Err(UnitsError::Overflow(_))));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units(dec!(0.1), 18).unwrap(), 100_000_000_000_000_000);
        assert_eq!(parse_units(dec!(1500), 18).unwrap(), 1_500 * 10u128.pow(18));
        assert_eq!(parse_units(dec!(12.5), WEIGHT_DECIMALS).unwrap(), 125 * 10u128.pow(15));
        assert!(matches!(parse_units(dec!(-1), 18), Err(UnitsError::Negative(_))));
    }

    #[test]
    fn test_parse_units_large_whole_part() {
        // 100 billion tokens overflows a plain decimal multiplication
        let raw = parse_units(dec!(100000000000.25), 18).unwrap();
        assert_eq!(raw, 100_000_000_000_250_000_000_000_000_000);
    }

    #[test]
    fn test_weight_conversions() {
        assert_eq!(percentage_to_weight(dec!(100)).unwrap(), FULL_WEIGHT);
        assert_eq!(weight_to_percentage(FULL_WEIGHT).unwrap(), dec!(100));
        assert_eq!(weight_to_percentage(5 * 10u128.pow(15)).unwrap(), dec!(0.5));
    }

    #[test]
    fn test_decimal_input_parsing() {
        assert_eq!(parse_decimal_input(" 1,000.50 "), dec!(1000.50));
        assert_eq!(parse_decimal_input("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal_input(""), Decimal::ZERO);
        assert!(try_parse_decimal_input("1.2.3").is_err());
        assert_eq!(try_parse_decimal_input("0.25").unwrap(), dec!(0.25));
    }
}
