use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::raw_amount;
use super::types::AssetId;
use crate::error::ContractError;
use crate::units::{self, TOKEN_DECIMALS};

/// A user's holding of one asset, in model units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub asset_id: AssetId,
    pub owner: Address,
    #[serde(with = "raw_amount")]
    pub amount: u128,
}

impl Position {
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }
}

/// Secondary-market listing in the shape the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub id: u64,
    pub asset_id: AssetId,
    pub seller: String,
    #[serde(with = "raw_amount")]
    pub amount: u128,
    /// Wei per share, or per percentage point for weighted assets
    #[serde(with = "raw_amount")]
    pub price_per_unit: u128,
    #[serde(default)]
    pub allow_partial: bool,
    pub active: bool,
}

/// Secondary-market offer for part or all of a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: u64,
    pub asset_id: AssetId,
    pub seller: Address,
    /// Units offered, in the asset's model units
    pub amount: u128,
    /// Asking price per share, or per percentage point
    pub price_per_unit: Decimal,
    pub allow_partial: bool,
    pub active: bool,
}

impl TryFrom<RawListing> for Listing {
    type Error = ContractError;

    fn try_from(raw: RawListing) -> Result<Self, Self::Error> {
        let price_per_unit = units::format_units(raw.price_per_unit, TOKEN_DECIMALS)
            .map_err(|e| ContractError::Decode(format!("listing {}: {}", raw.id, e)))?;

        Ok(Listing {
            id: raw.id,
            asset_id: raw.asset_id,
            seller: Address::parse(&raw.seller)?,
            amount: raw.amount,
            price_per_unit,
            allow_partial: raw.allow_partial,
            active: raw.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_listing() {
        let raw = RawListing {
            id: 3,
            asset_id: 1,
            seller: "0xBEEF000000000000000000000000000000000002".to_string(),
            amount: 40,
            price_per_unit: 120_000_000_000_000_000,
            allow_partial: true,
            active: true,
        };
        let listing = Listing::try_from(raw).unwrap();
        assert_eq!(listing.price_per_unit, dec!(0.12));
        assert_eq!(listing.seller.as_str(), "0xbeef000000000000000000000000000000000002");
    }

    #[test]
    fn test_decode_listing_bad_seller() {
        let raw = RawListing {
            id: 3,
            asset_id: 1,
            seller: "nobody".to_string(),
            amount: 40,
            price_per_unit: 1,
            allow_partial: false,
            active: true,
        };
        assert!(matches!(Listing::try_from(raw), Err(ContractError::Entity(_))));
    }
}
