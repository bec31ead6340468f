//! Ownership model tag and unit conversions tied to it.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EntityError;
use crate::units::{self, UnitsError, FULL_WEIGHT};

/// On-chain asset identifier
pub type AssetId = u64;

/// Ownership representation of an asset.
///
/// The contract encodes it as `0` (Fixed) and `1` (Weighted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelKind {
    /// Whole shares out of a fixed supply
    #[default]
    Fixed,
    /// Weight units of a total value, `1e16` = 1%
    Weighted,
}

impl ModelKind {
    /// Contract tag
    pub fn tag(&self) -> u8 {
        match self {
            ModelKind::Fixed => 0,
            ModelKind::Weighted => 1,
        }
    }

    /// Units in the whole asset, when the model defines one
    pub fn full_units(&self) -> Option<u128> {
        match self {
            ModelKind::Fixed => None,
            ModelKind::Weighted => Some(FULL_WEIGHT),
        }
    }

    /// Label for quantities of this model
    pub fn unit_label(&self) -> &'static str {
        match self {
            ModelKind::Fixed => "shares",
            ModelKind::Weighted => "%",
        }
    }

    /// Contract units as a display quantity: shares, or percentage points.
    ///
    /// Saturates at `Decimal::MAX` for amounts outside the decimal range.
    pub fn display_quantity(&self, units: u128) -> Decimal {
        let quantity = match self {
            ModelKind::Fixed => Decimal::from_u128(units),
            ModelKind::Weighted => units::weight_to_percentage(units).ok(),
        };
        quantity.unwrap_or(Decimal::MAX)
    }

    /// Display quantity back to contract units.
    ///
    /// Fixed quantities are truncated to whole shares.
    pub fn units_from_quantity(&self, quantity: Decimal) -> Result<u128, UnitsError> {
        match self {
            ModelKind::Fixed => units::parse_units(quantity, 0),
            ModelKind::Weighted => units::percentage_to_weight(quantity),
        }
    }

    /// Cost of `units` at `price_per_unit` (per share, or per percentage point).
    pub fn cost(&self, units: u128, price_per_unit: Decimal) -> Option<Decimal> {
        self.display_quantity(units).checked_mul(price_per_unit)
    }

    /// Human-readable quantity, e.g. `"1,000 shares"` or `"12.50%"`
    pub fn describe(&self, units: u128) -> String {
        match self {
            ModelKind::Fixed => format!("{} shares", units::format_shares(units)),
            ModelKind::Weighted => units::format_percentage(self.display_quantity(units)),
        }
    }
}

impl TryFrom<u8> for ModelKind {
    type Error = EntityError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ModelKind::Fixed),
            1 => Ok(ModelKind::Weighted),
            other => Err(EntityError::invalid(
                "Asset",
                format!("unknown ownership model tag {}", other),
            )),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Fixed => write!(f, "FIXED"),
            ModelKind::Weighted => write!(f, "WEIGHTED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WEIGHT_PER_PERCENT;
    use rust_decimal_macros::dec;

    #[test]
    fn test_model_tags() {
        assert_eq!(ModelKind::try_from(0).unwrap(), ModelKind::Fixed);
        assert_eq!(ModelKind::try_from(1).unwrap(), ModelKind::Weighted);
        assert!(ModelKind::try_from(2).is_err());
        assert_eq!(ModelKind::Weighted.tag(), 1);
    }

    #[test]
    fn test_display_quantity() {
        assert_eq!(ModelKind::Fixed.display_quantity(250), dec!(250));
        assert_eq!(
            ModelKind::Weighted.display_quantity(15 * WEIGHT_PER_PERCENT / 10),
            dec!(1.5)
        );
    }

    #[test]
    fn test_units_from_quantity() {
        assert_eq!(ModelKind::Fixed.units_from_quantity(dec!(12)).unwrap(), 12);
        assert_eq!(
            ModelKind::Weighted.units_from_quantity(dec!(2.5)).unwrap(),
            25 * WEIGHT_PER_PERCENT / 10
        );
    }

    #[test]
    fn test_cost() {
        assert_eq!(ModelKind::Fixed.cost(250, dec!(0.1)), Some(dec!(25)));
        assert_eq!(
            ModelKind::Weighted.cost(2 * WEIGHT_PER_PERCENT, dec!(15)),
            Some(dec!(30))
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(ModelKind::Fixed.describe(1500), "1,500 shares");
        assert_eq!(ModelKind::Weighted.describe(WEIGHT_PER_PERCENT / 2), "0.50%");
    }
}
