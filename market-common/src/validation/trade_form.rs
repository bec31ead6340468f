use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    require_positive, require_raw, require_whole, ValidationError, ValidationErrorCode,
    ValidationResult,
};
use crate::assets::{raw_amount, Address, Asset, AssetId, Listing, ModelKind};
use crate::limits;
use crate::units::{self, DISPLAY_DECIMALS, TOKEN_DECIMALS};

/// Priced quantity ready to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeQuote {
    /// Contract units: shares or weight units
    pub units: u128,
    /// `"25 shares"` or `"2.50%"`
    pub quantity: String,
    /// Total cost in tokens
    pub cost: Decimal,
}

/// Primary purchase form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseForm {
    /// Shares, or percentage points for weighted assets
    pub amount: Option<Decimal>,
    /// Units the buyer already holds
    #[serde(with = "raw_amount")]
    pub current_holding: u128,
    /// Buyer's token balance, when known
    pub balance: Option<Decimal>,
}

impl PurchaseForm {
    pub fn validate(&self, asset: &Asset) -> Result<TradeQuote, ValidationResult> {
        let mut result = ValidationResult::success();
        let kind = asset.kind();

        if !asset.active {
            result.add_error(ValidationError::new(
                "asset",
                "This asset is not open for purchase",
                ValidationErrorCode::Invalid,
            ));
        }

        let Some(units) = read_units(&mut result, kind, self.amount) else {
            return Err(result);
        };

        let available = asset.model.available_units();
        if units > available {
            result.add_error(ValidationError::new(
                "amount",
                format!("Only {} available", kind.describe(available)),
                ValidationErrorCode::OutOfRange,
            ));
        } else if units < asset.limits.min && units != available {
            // Buying out the remainder is allowed below the minimum
            result.add_error(ValidationError::new(
                "amount",
                format!("Minimum purchase is {}", kind.describe(asset.limits.min)),
                ValidationErrorCode::OutOfRange,
            ));
        }

        let check = limits::check_asset_purchase(asset, self.current_holding, units);
        if !check.can_purchase {
            result.add_error(ValidationError::new(
                "amount",
                check.reason.unwrap_or_default(),
                ValidationErrorCode::LimitExceeded,
            ));
        }

        let quote = price(&mut result, kind, units, asset.model.price_per_unit(), self.balance);
        finish(result, quote)
    }
}

/// Sell modal: list part of a position on the secondary market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    /// Shares, or percentage points for weighted assets
    pub amount: Option<Decimal>,
    /// Asking price per share, or per percentage point
    pub price_per_unit: Option<Decimal>,
    pub allow_partial: bool,
}

/// Contract-ready arguments for creating a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub asset_id: AssetId,
    #[serde(with = "raw_amount")]
    pub amount: u128,
    /// Wei
    #[serde(with = "raw_amount")]
    pub price_per_unit: u128,
    pub allow_partial: bool,
}

impl ListingForm {
    /// Validate against the seller's current holding of `asset`.
    pub fn validate(&self, asset: &Asset, holding: u128) -> Result<ListingRequest, ValidationResult> {
        let mut result = ValidationResult::success();
        let kind = asset.kind();

        if holding == 0 {
            result.add_error(ValidationError::new(
                "amount",
                "You hold no position in this asset",
                ValidationErrorCode::Invalid,
            ));
        }

        let amount = read_units(&mut result, kind, self.amount);
        if let Some(units) = amount {
            if holding > 0 && units > holding {
                result.add_error(ValidationError::new(
                    "amount",
                    format!("You can list at most {}", kind.describe(holding)),
                    ValidationErrorCode::OutOfRange,
                ));
            }
        }

        let price_wei = require_positive(
            &mut result,
            "price_per_unit",
            "Price per unit",
            self.price_per_unit,
        )
        .and_then(|price| {
            require_raw(
                &mut result,
                "price_per_unit",
                "Price per unit is below the smallest token unit",
                units::parse_units(price, TOKEN_DECIMALS),
            )
        });

        match (amount, price_wei) {
            (Some(amount), Some(price_per_unit)) if result.valid => Ok(ListingRequest {
                asset_id: asset.id,
                amount,
                price_per_unit,
                allow_partial: self.allow_partial,
            }),
            _ => Err(result),
        }
    }
}

/// Secondary buy of an existing listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPurchaseForm {
    pub buyer: Address,
    /// Shares or percentage points; `None` buys the whole listing
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Units of the asset the buyer already holds
    #[serde(with = "raw_amount", default)]
    pub current_holding: u128,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl ListingPurchaseForm {
    pub fn validate(&self, listing: &Listing, asset: &Asset) -> Result<TradeQuote, ValidationResult> {
        let mut result = ValidationResult::success();
        let kind = asset.kind();

        if !listing.active {
            result.add_error(ValidationError::new(
                "listing",
                "This listing is no longer active",
                ValidationErrorCode::Invalid,
            ));
        }
        if listing.seller == self.buyer {
            result.add_error(ValidationError::new(
                "buyer",
                "You cannot buy your own listing",
                ValidationErrorCode::Invalid,
            ));
        }

        let units = match self.amount {
            None => Some(listing.amount),
            Some(_) => read_units(&mut result, kind, self.amount),
        };
        let Some(units) = units else {
            return Err(result);
        };

        if units > listing.amount {
            result.add_error(ValidationError::new(
                "amount",
                format!("Only {} listed", kind.describe(listing.amount)),
                ValidationErrorCode::OutOfRange,
            ));
        } else if units < listing.amount && !listing.allow_partial {
            result.add_error(ValidationError::new(
                "amount",
                "This listing must be bought in full",
                ValidationErrorCode::Inconsistent,
            ));
        }

        let check = limits::can_purchase(kind, self.current_holding, units, asset.limits.max);
        if !check.can_purchase {
            result.add_error(ValidationError::new(
                "amount",
                check.reason.unwrap_or_default(),
                ValidationErrorCode::LimitExceeded,
            ));
        }

        let quote = price(&mut result, kind, units, listing.price_per_unit, self.balance);
        finish(result, quote)
    }
}

/// Read an entered quantity as contract units.
fn read_units(result: &mut ValidationResult, kind: ModelKind, amount: Option<Decimal>) -> Option<u128> {
    let amount = require_positive(result, "amount", "Amount", amount)?;
    if kind == ModelKind::Fixed && !require_whole(result, "amount", "Amount", amount) {
        return None;
    }
    require_raw(
        result,
        "amount",
        "Amount is below the smallest tradable unit",
        kind.units_from_quantity(amount),
    )
}

fn price(
    result: &mut ValidationResult,
    kind: ModelKind,
    units: u128,
    price_per_unit: Decimal,
    balance: Option<Decimal>,
) -> Option<TradeQuote> {
    let Some(cost) = kind.cost(units, price_per_unit) else {
        result.add_error(ValidationError::new(
            "amount",
            "Amount is too large to price",
            ValidationErrorCode::OutOfRange,
        ));
        return None;
    };

    if let Some(balance) = balance {
        if cost > balance {
            result.add_error(ValidationError::new(
                "balance",
                format!(
                    "Insufficient balance: cost {} exceeds balance {}",
                    units::format_decimal(cost, DISPLAY_DECIMALS),
                    units::format_decimal(balance, DISPLAY_DECIMALS)
                ),
                ValidationErrorCode::OutOfRange,
            ));
        }
    }

    Some(TradeQuote {
        units,
        quantity: kind.describe(units),
        cost,
    })
}

fn finish(result: ValidationResult, quote: Option<TradeQuote>) -> Result<TradeQuote, ValidationResult> {
    match quote {
        Some(quote) if result.valid => Ok(quote),
        _ => Err(result),
    }
}
