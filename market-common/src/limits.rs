//! Holding/limit calculator.
//!
//! Decides whether a prospective trade keeps a user's holding within an
//! asset's per-user maximum. The primary purchase and the secondary market
//! both go through [`can_purchase`], so the rounding of the rejection message
//! is the same everywhere.
//!
//! # Rules
//!
//! - `max == 0` is unlimited
//! - for weighted assets, `max >= 100%` is unlimited as well
//! - otherwise the trade is allowed iff `current + trade <= max`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::{Asset, ModelKind};
use crate::units::{self, round_display, DISPLAY_DECIMALS};

/// Outcome of a purchase limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCheck {
    pub can_purchase: bool,
    pub reason: Option<String>,
}

impl PurchaseCheck {
    pub fn allowed() -> Self {
        Self {
            can_purchase: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            can_purchase: false,
            reason: Some(reason.into()),
        }
    }
}

/// True when `max` places no bound on holdings for this model.
pub fn is_unlimited(model: ModelKind, max: u128) -> bool {
    if max == 0 {
        return true;
    }
    model.full_units().is_some_and(|full| max >= full)
}

/// Units a user may still acquire; `None` when unlimited.
pub fn remaining_allowance(model: ModelKind, current: u128, max: u128) -> Option<u128> {
    if is_unlimited(model, max) {
        None
    } else {
        Some(max.saturating_sub(current))
    }
}

/// Check whether buying `trade` units on top of `current` respects `max`.
pub fn can_purchase(model: ModelKind, current: u128, trade: u128, max: u128) -> PurchaseCheck {
    if is_unlimited(model, max) {
        return PurchaseCheck::allowed();
    }

    let within = current
        .checked_add(trade)
        .is_some_and(|after| after <= max);
    if within {
        return PurchaseCheck::allowed();
    }

    let remaining = max.saturating_sub(current);
    let reason = if remaining == 0 {
        format!(
            "You already hold the maximum of {} per user for this asset",
            model.describe(max)
        )
    } else if round_display(model.display_quantity(remaining)).is_zero() {
        // Too small to show at display precision
        format!(
            "Purchase exceeds the maximum of {} per user. You can buy less than {} more",
            model.describe(max),
            units::format_percentage(Decimal::new(1, DISPLAY_DECIMALS))
        )
    } else {
        format!(
            "Purchase exceeds the maximum of {} per user. You can buy at most {} more",
            model.describe(max),
            model.describe(remaining)
        )
    };
    PurchaseCheck::rejected(reason)
}

/// [`can_purchase`] against an asset's own limits.
pub fn check_asset_purchase(asset: &Asset, current: u128, trade: u128) -> PurchaseCheck {
    can_purchase(asset.kind(), current, trade, asset.limits.max)
}
