use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::address::Address;
use super::raw_amount;
use super::types::{AssetId, ModelKind};
use crate::error::ContractError;
use crate::units::{self, FULL_WEIGHT, TOKEN_DECIMALS};

/// Asset record in the shape the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAsset {
    pub id: AssetId,
    pub asset_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `0` = Fixed, `1` = Weighted
    pub model: u8,
    /// Total shares (Fixed) or total value in wei (Weighted)
    #[serde(with = "raw_amount")]
    pub total: u128,
    /// Wei per share (Fixed). Weighted assets derive their price from `total`.
    #[serde(with = "raw_amount", default)]
    pub price_per_unit: u128,
    /// Shares (Fixed) or weight units (Weighted) already sold
    #[serde(with = "raw_amount")]
    pub sold: u128,
    #[serde(with = "raw_amount", default)]
    pub min_purchase: u128,
    /// `0` means unlimited
    #[serde(with = "raw_amount", default)]
    pub max_purchase: u128,
    pub active: bool,
    pub creator: String,
    #[serde(default)]
    pub image_cid: Option<String>,
}

/// Ownership representation with the fields that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetModel {
    Fixed {
        total_shares: u128,
        sold_shares: u128,
        price_per_share: Decimal,
    },
    Weighted {
        total_value: Decimal,
        sold_weight: u128,
    },
}

impl AssetModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            AssetModel::Fixed { .. } => ModelKind::Fixed,
            AssetModel::Weighted { .. } => ModelKind::Weighted,
        }
    }

    /// Units making up the whole asset
    pub fn total_units(&self) -> u128 {
        match self {
            AssetModel::Fixed { total_shares, .. } => *total_shares,
            AssetModel::Weighted { .. } => FULL_WEIGHT,
        }
    }

    pub fn sold_units(&self) -> u128 {
        match self {
            AssetModel::Fixed { sold_shares, .. } => *sold_shares,
            AssetModel::Weighted { sold_weight, .. } => *sold_weight,
        }
    }

    /// Units still for sale; zero when the chain reports more sold than exists
    pub fn available_units(&self) -> u128 {
        self.total_units().saturating_sub(self.sold_units())
    }

    /// Price of one share, or of one percentage point
    pub fn price_per_unit(&self) -> Decimal {
        match self {
            AssetModel::Fixed {
                price_per_share, ..
            } => *price_per_share,
            AssetModel::Weighted { total_value, .. } => *total_value / Decimal::ONE_HUNDRED,
        }
    }

    /// Value of the whole asset
    pub fn total_value(&self) -> Decimal {
        match self {
            AssetModel::Fixed {
                total_shares,
                price_per_share,
                ..
            } => ModelKind::Fixed
                .cost(*total_shares, *price_per_share)
                .unwrap_or(Decimal::MAX),
            AssetModel::Weighted { total_value, .. } => *total_value,
        }
    }
}

/// Per-user purchase bounds in model units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PurchaseLimits {
    pub min: u128,
    /// `0` means unlimited
    pub max: u128,
}

/// A tokenized asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: AssetId,
    pub asset_type: String,
    pub name: String,
    pub description: String,
    pub model: AssetModel,
    pub limits: PurchaseLimits,
    pub active: bool,
    pub creator: Address,
    pub image_cid: Option<String>,
}

impl Asset {
    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    /// Cost of buying `units` from the primary sale
    pub fn cost_of(&self, units: u128) -> Option<Decimal> {
        self.kind().cost(units, self.model.price_per_unit())
    }
}

impl TryFrom<RawAsset> for Asset {
    type Error = ContractError;

    fn try_from(raw: RawAsset) -> Result<Self, Self::Error> {
        let kind = ModelKind::try_from(raw.model)?;
        let decode = |e: units::UnitsError| {
            ContractError::Decode(format!("asset {}: {}", raw.id, e))
        };

        let model = match kind {
            ModelKind::Fixed => AssetModel::Fixed {
                total_shares: raw.total,
                sold_shares: raw.sold,
                price_per_share: units::format_units(raw.price_per_unit, TOKEN_DECIMALS)
                    .map_err(decode)?,
            },
            ModelKind::Weighted => AssetModel::Weighted {
                total_value: units::format_units(raw.total, TOKEN_DECIMALS).map_err(decode)?,
                sold_weight: raw.sold,
            },
        };

        if model.sold_units() > model.total_units() {
            warn!(
                asset_id = raw.id,
                sold = %raw.sold,
                total = %model.total_units(),
                "Asset reports more sold than its total"
            );
        }

        let creator = Address::parse(&raw.creator)?;

        Ok(Asset {
            id: raw.id,
            asset_type: raw.asset_type,
            name: raw.name,
            description: raw.description,
            model,
            limits: PurchaseLimits {
                min: raw.min_purchase,
                max: raw.max_purchase,
            },
            active: raw.active,
            creator,
            image_cid: raw.image_cid.filter(|cid| !cid.trim().is_empty()),
        })
    }
}
