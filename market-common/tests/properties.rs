//! Property tests for unit conversion, purchase limits and the creation form.

use market_common::assets::{Address, Asset, AssetModel, ModelKind, PurchaseLimits};
use market_common::limits::can_purchase;
use market_common::stats::AssetStats;
use market_common::units::{
    basis_points_to_percentage, percentage_to_basis_points, FULL_WEIGHT, WEIGHT_PER_PERCENT,
};
use market_common::validation::{AssetDraft, ValidationErrorCode, WizardStep};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Strategies
// ============================================================================

fn model_kinds() -> impl Strategy<Value = ModelKind> {
    prop_oneof![Just(ModelKind::Fixed), Just(ModelKind::Weighted)]
}

/// Non-zero per-user maximum that is a real bound for the model
fn bounded_max(kind: ModelKind) -> BoxedStrategy<u128> {
    match kind {
        ModelKind::Fixed => (1u128..1_000_000_000_000).boxed(),
        ModelKind::Weighted => (1u128..FULL_WEIGHT).boxed(),
    }
}

fn limit_cases() -> impl Strategy<Value = (ModelKind, u128, u128, u128)> {
    model_kinds().prop_flat_map(|kind| {
        let upper = kind.full_units().unwrap_or(1_000_000_000_000);
        (Just(kind), 0..=upper, 0..=upper, bounded_max(kind))
    })
}

fn fixed_draft(total: u64, min: u64) -> AssetDraft {
    AssetDraft {
        name: "Harbor Loft".to_string(),
        asset_type: "Real Estate".to_string(),
        description: "Two-bedroom loft".to_string(),
        model: ModelKind::Fixed,
        total_shares: Some(Decimal::from(total)),
        price_per_share: Some(dec!(0.1)),
        min_purchase: Some(Decimal::from(min)),
        ..Default::default()
    }
}

fn weighted_draft(min_bps: u32, max_bps: u32) -> AssetDraft {
    AssetDraft {
        name: "Vineyard".to_string(),
        asset_type: "Agriculture".to_string(),
        description: "Twelve hectares".to_string(),
        model: ModelKind::Weighted,
        total_value: Some(dec!(20000)),
        min_purchase: Some(basis_points_to_percentage(min_bps)),
        max_purchase: Some(basis_points_to_percentage(max_bps)),
        ..Default::default()
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn basis_points_round_trip(bps in 0u32..=10_000) {
        prop_assert_eq!(percentage_to_basis_points(basis_points_to_percentage(bps)), bps);
    }

    #[test]
    fn purchase_rejected_iff_over_max((kind, current, trade, max) in limit_cases()) {
        let check = can_purchase(kind, current, trade, max);
        prop_assert_eq!(!check.can_purchase, current + trade > max);
        prop_assert_eq!(check.reason.is_some(), !check.can_purchase);
    }

    #[test]
    fn zero_max_always_allows(kind in model_kinds(), current in any::<u128>(), trade in any::<u128>()) {
        let check = can_purchase(kind, current, trade, 0);
        prop_assert!(check.can_purchase);
        prop_assert!(check.reason.is_none());
    }

    #[test]
    fn fixed_min_above_total_rejected(total in 1u64..1_000_000_000, excess in 1u64..1_000) {
        let result = fixed_draft(total, total + excess).validate_step(WizardStep::Tokenization);
        prop_assert!(result.has_error("min_purchase", ValidationErrorCode::Inconsistent));
    }

    #[test]
    fn fixed_min_equal_to_total_accepted(total in 1u64..1_000_000_000) {
        let result = fixed_draft(total, total).validate_step(WizardStep::Tokenization);
        prop_assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn weighted_max_below_min_rejected((min_bps, max_bps) in (2u32..=10_000).prop_flat_map(|min| (Just(min), 1..min))) {
        let result = weighted_draft(min_bps, max_bps).validate_step(WizardStep::Tokenization);
        prop_assert!(result.has_error("max_purchase", ValidationErrorCode::Inconsistent));
    }

    #[test]
    fn weighted_max_equal_to_min_accepted(bps in 1u32..=10_000) {
        let result = weighted_draft(bps, bps).validate_step(WizardStep::Tokenization);
        prop_assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn stats_percentages_sum_to_hundred(total in 1u128..1_000_000_000, sold_ratio in 0u128..=1_000) {
        let sold = total * sold_ratio / 1_000;
        let stats = AssetStats::compute(&asset(AssetModel::Fixed {
            total_shares: total,
            sold_shares: sold,
            price_per_share: dec!(1),
        }));
        prop_assert_eq!(stats.sold_percentage + stats.available_percentage, dec!(100));
        prop_assert_eq!(stats.sold_units + stats.available_units, total);
    }
}

fn asset(model: AssetModel) -> Asset {
    Asset {
        id: 1,
        asset_type: "Real Estate".to_string(),
        name: "Harbor Loft".to_string(),
        description: String::new(),
        model,
        limits: PurchaseLimits::default(),
        active: true,
        creator: Address::parse("0xc0ffee0000000000000000000000000000000001").unwrap(),
        image_cid: None,
    }
}

#[test]
fn reference_scenario() {
    let stats = AssetStats::compute(&asset(AssetModel::Fixed {
        total_shares: 1000,
        sold_shares: 250,
        price_per_share: dec!(0.1),
    }));
    assert_eq!(stats.available_percentage, dec!(75));
    assert_eq!(stats.total_value, dec!(100));
}

#[test]
fn weighted_full_weight_is_unlimited() {
    let check = can_purchase(ModelKind::Weighted, 60 * WEIGHT_PER_PERCENT, 60 * WEIGHT_PER_PERCENT, FULL_WEIGHT);
    assert!(check.can_purchase);
}
