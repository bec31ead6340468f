use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::assets::{Asset, AssetId, ModelKind};
use crate::units::round_display;

/// `part / whole` as a display-rounded percentage, capped at 100.
///
/// Returns zero for an empty whole.
pub fn percent_of(part: u128, whole: u128) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    let part = Decimal::from_u128(part.min(whole)).unwrap_or(Decimal::MAX);
    let whole = Decimal::from_u128(whole).unwrap_or(Decimal::MAX);
    round_display(part / whole * Decimal::ONE_HUNDRED)
}

/// Figures shown for an asset on cards and detail pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetStats {
    pub asset_id: AssetId,
    pub model: ModelKind,
    pub total_units: u128,
    pub sold_units: u128,
    pub available_units: u128,
    pub sold_percentage: Decimal,
    pub available_percentage: Decimal,
    pub total_value: Decimal,
    /// Value of the units still for sale
    pub available_value: Decimal,
    /// Per share (Fixed) or per percentage point (Weighted)
    pub price_per_unit: Decimal,
    pub price_per_percent: Decimal,
}

impl AssetStats {
    pub fn compute(asset: &Asset) -> Self {
        let model = &asset.model;
        let kind = model.kind();
        let total_units = model.total_units();
        let sold_units = model.sold_units().min(total_units);
        let available_units = model.available_units();

        let sold_percentage = percent_of(sold_units, total_units);
        let available_percentage = if total_units == 0 {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED - sold_percentage
        };

        let total_value = model.total_value();
        let price_per_unit = model.price_per_unit();

        Self {
            asset_id: asset.id,
            model: kind,
            total_units,
            sold_units,
            available_units,
            sold_percentage,
            available_percentage,
            total_value: round_display(total_value),
            available_value: round_display(
                kind.cost(available_units, price_per_unit)
                    .unwrap_or(Decimal::MAX),
            ),
            price_per_unit,
            price_per_percent: total_value / Decimal::ONE_HUNDRED,
        }
    }

    /// Nothing left for the primary sale
    pub fn is_sold_out(&self) -> bool {
        self.available_units == 0
    }
}
