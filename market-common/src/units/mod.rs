//! Unit conversion helpers.
//!
//! Contracts speak in integers: basis points, weight units (`1e16` = 1%) and
//! wei-scaled token amounts (18 decimals). The UI speaks in percentages and
//! decimal strings. Everything crossing that boundary goes through here.
//!
//! # Example
//!
//! ```
//! use market_common::units::{basis_points_to_percentage, percentage_to_basis_points};
//! use rust_decimal::Decimal;
//!
//! let pct = basis_points_to_percentage(250);
//! assert_eq!(pct, Decimal::new(25, 1)); // 2.5%
//! assert_eq!(percentage_to_basis_points(pct), 250);
//! ```

mod format;
mod scale;

pub use format::{
    format_decimal, format_percentage, format_shares, format_token_amount, format_usd,
    gateway_url, group_thousands, round_display, usd_estimate, DISPLAY_DECIMALS,
};
pub use scale::{
    basis_points_to_percentage, format_units, parse_decimal_input, parse_units,
    percentage_to_basis_points, percentage_to_weight, try_parse_decimal_input,
    weight_to_percentage, UnitsError, BASIS_POINTS_PER_PERCENT, FULL_WEIGHT, MAX_BASIS_POINTS,
    TOKEN_DECIMALS, WEIGHT_DECIMALS, WEIGHT_PER_PERCENT,
};
