use rust_decimal::Decimal;
use serde::Serialize;

use super::asset_stats::percent_of;
use crate::assets::{Address, Asset, AssetId, Listing, ModelKind, Position};
use crate::units::{round_display, usd_estimate};

/// A position as shown in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionView {
    pub asset_id: AssetId,
    pub asset_name: String,
    pub model: ModelKind,
    pub units: u128,
    /// `"120 shares"` or `"2.50%"`
    pub holding: String,
    pub ownership_percentage: Decimal,
    pub estimated_value: Decimal,
}

impl PositionView {
    pub fn compute(position: &Position, asset: &Asset) -> Self {
        let kind = asset.kind();
        let estimated_value = asset.cost_of(position.amount).unwrap_or(Decimal::MAX);

        Self {
            asset_id: asset.id,
            asset_name: asset.name.clone(),
            model: kind,
            units: position.amount,
            holding: kind.describe(position.amount),
            ownership_percentage: percent_of(position.amount, asset.model.total_units()),
            estimated_value: round_display(estimated_value),
        }
    }
}

/// A secondary-market listing as shown in the market grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub listing_id: u64,
    pub asset_id: AssetId,
    pub asset_name: String,
    pub seller: Address,
    pub model: ModelKind,
    pub units: u128,
    pub quantity: String,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
    /// Asking price relative to the primary price; `None` when the asset has no
    /// primary price or the ratio leaves the decimal range
    pub premium_percentage: Option<Decimal>,
    pub allow_partial: bool,
}

impl ListingView {
    pub fn compute(listing: &Listing, asset: &Asset) -> Self {
        let kind = asset.kind();
        let primary = asset.model.price_per_unit();
        let premium_percentage = if primary.is_zero() {
            None
        } else {
            listing
                .price_per_unit
                .checked_sub(primary)
                .and_then(|diff| diff.checked_div(primary))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(round_display)
        };

        Self {
            listing_id: listing.id,
            asset_id: asset.id,
            asset_name: asset.name.clone(),
            seller: listing.seller.clone(),
            model: kind,
            units: listing.amount,
            quantity: kind.describe(listing.amount),
            price_per_unit: listing.price_per_unit,
            total_price: round_display(
                kind.cost(listing.amount, listing.price_per_unit)
                    .unwrap_or(Decimal::MAX),
            ),
            premium_percentage,
            allow_partial: listing.allow_partial,
        }
    }
}

/// All of one owner's positions with totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub owner: Address,
    pub positions: Vec<PositionView>,
    pub total_value: Decimal,
    pub usd_estimate: Decimal,
}

impl PortfolioSummary {
    /// Build from `(position, asset)` pairs; empty positions are skipped.
    pub fn compute<'a, I>(owner: Address, holdings: I, usd_rate: Decimal) -> Self
    where
        I: IntoIterator<Item = (&'a Position, &'a Asset)>,
    {
        let positions: Vec<PositionView> = holdings
            .into_iter()
            .filter(|(position, _)| !position.is_empty())
            .map(|(position, asset)| PositionView::compute(position, asset))
            .collect();

        let total_value = positions
            .iter()
            .fold(Decimal::ZERO, |acc, p| {
                acc.checked_add(p.estimated_value).unwrap_or(Decimal::MAX)
            });

        Self {
            owner,
            positions,
            total_value,
            usd_estimate: round_display(usd_estimate(total_value, usd_rate)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
