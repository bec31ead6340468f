use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    require_non_negative, require_positive, require_raw, require_text, require_value,
    require_whole, ValidationError, ValidationErrorCode, ValidationResult,
};
use crate::assets::{raw_amount, ModelKind};
use crate::units::{self, UnitsError, TOKEN_DECIMALS};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ASSET_TYPE_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Steps of the asset-creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Tokenization,
    Details,
    /// Re-checks every earlier step
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::BasicInfo,
        WizardStep::Tokenization,
        WizardStep::Details,
        WizardStep::Review,
    ];

    pub fn next(&self) -> Option<Self> {
        match self {
            WizardStep::BasicInfo => Some(WizardStep::Tokenization),
            WizardStep::Tokenization => Some(WizardStep::Details),
            WizardStep::Details => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            WizardStep::BasicInfo => None,
            WizardStep::Tokenization => Some(WizardStep::BasicInfo),
            WizardStep::Details => Some(WizardStep::Tokenization),
            WizardStep::Review => Some(WizardStep::Details),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::BasicInfo => write!(f, "Basic info"),
            WizardStep::Tokenization => write!(f, "Tokenization"),
            WizardStep::Details => write!(f, "Details"),
            WizardStep::Review => write!(f, "Review"),
        }
    }
}

/// Asset-creation form as the user fills it in.
///
/// Quantities are in display units: shares for Fixed assets, percentage
/// points for Weighted ones. Prices and values are in whole tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDraft {
    pub name: String,
    pub asset_type: String,
    pub description: String,
    pub model: ModelKind,
    pub total_shares: Option<Decimal>,
    pub price_per_share: Option<Decimal>,
    pub total_value: Option<Decimal>,
    /// Shares (Fixed) or percentage (Weighted)
    pub min_purchase: Option<Decimal>,
    /// Empty means unlimited
    pub max_purchase: Option<Decimal>,
    pub annual_cost: Option<Decimal>,
    /// Percent per year
    pub expected_yield: Option<Decimal>,
    pub image_cid: Option<String>,
}

/// Contract-ready arguments for creating an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssetRequest {
    pub asset_type: String,
    pub name: String,
    pub description: String,
    pub model: u8,
    /// Shares (Fixed) or wei value (Weighted)
    #[serde(with = "raw_amount")]
    pub total: u128,
    /// Wei per share; zero for Weighted
    #[serde(with = "raw_amount")]
    pub price_per_unit: u128,
    #[serde(with = "raw_amount")]
    pub min_purchase: u128,
    /// `0` means unlimited
    #[serde(with = "raw_amount")]
    pub max_purchase: u128,
    #[serde(with = "raw_amount")]
    pub annual_cost: u128,
    pub expected_yield_bps: u32,
    pub image_cid: Option<String>,
}

impl AssetDraft {
    /// Validate the fields belonging to `step`.
    pub fn validate_step(&self, step: WizardStep) -> ValidationResult {
        let mut result = ValidationResult::success();
        match step {
            WizardStep::BasicInfo => self.check_basic_info(&mut result),
            WizardStep::Tokenization => match self.model {
                ModelKind::Fixed => self.check_fixed(&mut result),
                ModelKind::Weighted => self.check_weighted(&mut result),
            },
            WizardStep::Details => self.check_details(&mut result),
            WizardStep::Review => {
                for step in [
                    WizardStep::BasicInfo,
                    WizardStep::Tokenization,
                    WizardStep::Details,
                ] {
                    result.merge(self.validate_step(step));
                }
            }
        }
        result
    }

    /// Validate the whole draft.
    pub fn validate(&self) -> ValidationResult {
        self.validate_step(WizardStep::Review)
    }

    fn check_basic_info(&self, result: &mut ValidationResult) {
        require_text(result, "name", "Name", &self.name, MAX_NAME_LEN);
        require_text(
            result,
            "asset_type",
            "Asset type",
            &self.asset_type,
            MAX_ASSET_TYPE_LEN,
        );
        require_text(
            result,
            "description",
            "Description",
            &self.description,
            MAX_DESCRIPTION_LEN,
        );
    }

    fn check_fixed(&self, result: &mut ValidationResult) {
        let total = require_positive(result, "total_shares", "Total shares", self.total_shares)
            .filter(|t| require_whole(result, "total_shares", "Total shares", *t));
        if let Some(price) = require_positive(
            result,
            "price_per_share",
            "Price per share",
            self.price_per_share,
        ) {
            require_raw(
                result,
                "price_per_share",
                "Price per share is below the smallest token unit",
                units::parse_units(price, TOKEN_DECIMALS),
            );
        }

        let min = require_value(result, "min_purchase", "Minimum purchase", self.min_purchase)
            .filter(|m| require_whole(result, "min_purchase", "Minimum purchase", *m))
            .filter(|m| {
                let ok = *m >= Decimal::ONE;
                if !ok {
                    result.add_error(ValidationError::new(
                        "min_purchase",
                        "Minimum purchase must be at least 1 share",
                        ValidationErrorCode::OutOfRange,
                    ));
                }
                ok
            });

        if let (Some(min), Some(total)) = (min, total) {
            if min > total {
                result.add_error(ValidationError::new(
                    "min_purchase",
                    "Minimum purchase cannot exceed total shares",
                    ValidationErrorCode::Inconsistent,
                ));
            }
        }

        let Some(max) = self.max_purchase else {
            return;
        };
        if !require_whole(result, "max_purchase", "Maximum purchase", max) {
            return;
        }
        if max < Decimal::ONE {
            result.add_error(ValidationError::new(
                "max_purchase",
                "Maximum purchase must be at least 1 share; leave it empty for no limit",
                ValidationErrorCode::OutOfRange,
            ));
            return;
        }
        if min.is_some_and(|min| max < min) {
            result.add_error(ValidationError::new(
                "max_purchase",
                "Maximum purchase cannot be less than the minimum",
                ValidationErrorCode::Inconsistent,
            ));
        }
        if total.is_some_and(|total| max > total) {
            result.add_error(ValidationError::new(
                "max_purchase",
                "Maximum purchase cannot exceed total shares",
                ValidationErrorCode::Inconsistent,
            ));
        }
    }

    fn check_weighted(&self, result: &mut ValidationResult) {
        if let Some(value) = require_positive(result, "total_value", "Total value", self.total_value) {
            require_raw(
                result,
                "total_value",
                "Total value is below the smallest token unit",
                units::parse_units(value, TOKEN_DECIMALS),
            );
        }

        let in_percent_range = |v: Decimal| v > Decimal::ZERO && v <= Decimal::ONE_HUNDRED;

        let min = require_value(result, "min_purchase", "Minimum purchase", self.min_purchase)
            .filter(|m| {
                let ok = in_percent_range(*m);
                if !ok {
                    result.add_error(ValidationError::new(
                        "min_purchase",
                        "Minimum purchase must be greater than 0% and at most 100%",
                        ValidationErrorCode::OutOfRange,
                    ));
                }
                ok
            })
            .filter(|m| {
                require_raw(
                    result,
                    "min_purchase",
                    "Minimum purchase is below the smallest tradable unit",
                    units::percentage_to_weight(*m),
                )
                .is_some()
            });

        let Some(max) = self.max_purchase else {
            return;
        };
        if !in_percent_range(max) {
            result.add_error(ValidationError::new(
                "max_purchase",
                "Maximum purchase must be greater than 0% and at most 100%",
                ValidationErrorCode::OutOfRange,
            ));
            return;
        }
        // A zero weight would read as unlimited
        let representable = require_raw(
            result,
            "max_purchase",
            "Maximum purchase is below the smallest tradable unit",
            units::percentage_to_weight(max),
        )
        .is_some();
        if representable && min.is_some_and(|min| max < min) {
            result.add_error(ValidationError::new(
                "max_purchase",
                "Maximum purchase cannot be less than the minimum",
                ValidationErrorCode::Inconsistent,
            ));
        }
    }

    fn check_details(&self, result: &mut ValidationResult) {
        require_non_negative(
            result,
            "annual_cost",
            "Estimated annual cost",
            self.annual_cost,
        );
        if let Some(cost) = self.annual_cost.filter(|c| *c > Decimal::ZERO) {
            require_raw(
                result,
                "annual_cost",
                "Estimated annual cost is below the smallest token unit",
                units::parse_units(cost, TOKEN_DECIMALS),
            );
        }
        if self
            .expected_yield
            .is_some_and(|y| y < Decimal::ZERO || y > Decimal::ONE_HUNDRED)
        {
            result.add_error(ValidationError::new(
                "expected_yield",
                "Expected yield must be between 0% and 100%",
                ValidationErrorCode::OutOfRange,
            ));
        }
    }

    /// Validate the draft and convert it to contract arguments.
    pub fn into_request(self) -> Result<CreateAssetRequest, ValidationResult> {
        let mut result = self.validate();
        if !result.valid {
            return Err(result);
        }

        let min = self.min_purchase.unwrap_or_default();
        let (total, price_per_unit, min_purchase, max_purchase) = match self.model {
            ModelKind::Fixed => (
                to_raw(
                    &mut result,
                    "total_shares",
                    units::parse_units(self.total_shares.unwrap_or_default(), 0),
                ),
                to_raw(
                    &mut result,
                    "price_per_share",
                    units::parse_units(self.price_per_share.unwrap_or_default(), TOKEN_DECIMALS),
                ),
                to_raw(&mut result, "min_purchase", units::parse_units(min, 0)),
                match self.max_purchase {
                    Some(max) => to_raw(&mut result, "max_purchase", units::parse_units(max, 0)),
                    None => 0,
                },
            ),
            ModelKind::Weighted => (
                to_raw(
                    &mut result,
                    "total_value",
                    units::parse_units(self.total_value.unwrap_or_default(), TOKEN_DECIMALS),
                ),
                0,
                to_raw(&mut result, "min_purchase", units::percentage_to_weight(min)),
                // 100% is stored as unlimited
                match self.max_purchase {
                    Some(max) if max < Decimal::ONE_HUNDRED => {
                        to_raw(&mut result, "max_purchase", units::percentage_to_weight(max))
                    }
                    _ => 0,
                },
            ),
        };
        let annual_cost = to_raw(
            &mut result,
            "annual_cost",
            units::parse_units(self.annual_cost.unwrap_or_default(), TOKEN_DECIMALS),
        );

        if !result.valid {
            return Err(result);
        }

        Ok(CreateAssetRequest {
            asset_type: self.asset_type.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            model: self.model.tag(),
            total,
            price_per_unit,
            min_purchase,
            max_purchase,
            annual_cost,
            expected_yield_bps: units::percentage_to_basis_points(
                self.expected_yield.unwrap_or_default(),
            ),
            image_cid: self
                .image_cid
                .map(|cid| cid.trim().to_string())
                .filter(|cid| !cid.is_empty()),
        })
    }
}

fn to_raw(result: &mut ValidationResult, field: &str, value: Result<u128, UnitsError>) -> u128 {
    value.unwrap_or_else(|e| {
        result.add_error(ValidationError::new(
            field,
            e.to_string(),
            ValidationErrorCode::Invalid,
        ));
        0
    })
}
