//! Reading a snapshot end to end: listings, trades, portfolio and governance.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use market_common::assets::{Address, Asset, AssetId, Listing, Position};
use market_common::chain::{enrich_listings, load_portfolio, ChainSnapshot, MarketplaceReader, SnapshotReader};
use market_common::error::{ContractError, ErrorClassification, FailureKind};
use market_common::governance::{check_vote, Proposal, ProposalStatus};
use market_common::stats::AssetStats;
use market_common::validation::{ListingPurchaseForm, PurchaseForm, ValidationErrorCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SNAPSHOT: &str = r#"{
    "assets": [
        {
            "id": 1, "asset_type": "Real Estate", "name": "Harbor Loft",
            "description": "Two-bedroom loft", "model": 0,
            "total": 1000, "price_per_unit": "100000000000000000", "sold": 250,
            "min_purchase": 1, "max_purchase": 100, "active": true,
            "creator": "0xc0ffee0000000000000000000000000000000001",
            "image_cid": "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi"
        },
        {
            "id": 2, "asset_type": "Agriculture", "name": "Vineyard", "model": 1,
            "total": "20000000000000000000000", "sold": "400000000000000000",
            "min_purchase": "5000000000000000", "max_purchase": "100000000000000000",
            "active": true, "creator": "0xc0ffee0000000000000000000000000000000001"
        }
    ],
    "positions": [
        { "asset_id": 1, "owner": "0xa11ce00000000000000000000000000000000001", "amount": 120 },
        { "asset_id": 2, "owner": "0xa11ce00000000000000000000000000000000001", "amount": "10000000000000000" },
        { "asset_id": 1, "owner": "0xb0b0000000000000000000000000000000000002", "amount": 90 }
    ],
    "listings": [
        {
            "id": 1, "asset_id": 1, "seller": "0xa11ce00000000000000000000000000000000001",
            "amount": 40, "price_per_unit": "120000000000000000",
            "allow_partial": true, "active": true
        },
        {
            "id": 2, "asset_id": 2, "seller": "0xa11ce00000000000000000000000000000000001",
            "amount": "5000000000000000", "price_per_unit": "250000000000000000000",
            "allow_partial": false, "active": true
        }
    ],
    "proposals": [
        {
            "id": 1, "asset_id": 1, "proposer": "0xa11ce00000000000000000000000000000000001",
            "title": "Replace roof", "cost_estimate": "12000000000000000000",
            "deadline": 1767225600,
            "yes_votes": "120000000000000000", "no_votes": "90000000000000000"
        }
    ],
    "balances": [
        { "owner": "0xb0b0000000000000000000000000000000000002", "wei": "50000000000000000000" }
    ]
}"#;

fn alice() -> Address {
    Address::parse("0xa11ce00000000000000000000000000000000001").unwrap()
}

fn bob() -> Address {
    Address::parse("0xb0b0000000000000000000000000000000000002").unwrap()
}

fn reader() -> SnapshotReader {
    SnapshotReader::new(ChainSnapshot::from_json(SNAPSHOT).unwrap())
}

/// Serves from a snapshot but fails every lookup of one asset.
struct FlakyReader {
    inner: SnapshotReader,
    broken_asset: AssetId,
}

#[async_trait]
impl MarketplaceReader for FlakyReader {
    async fn get_asset(&self, id: AssetId) -> Result<Asset, ContractError> {
        if id == self.broken_asset {
            return Err(ContractError::Rpc("connection reset by peer".to_string()));
        }
        self.inner.get_asset(id).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, ContractError> {
        self.inner.list_assets().await
    }

    async fn get_position(&self, asset_id: AssetId, owner: &Address) -> Result<Position, ContractError> {
        self.inner.get_position(asset_id, owner).await
    }

    async fn positions_of(&self, owner: &Address) -> Result<Vec<Position>, ContractError> {
        self.inner.positions_of(owner).await
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError> {
        self.inner.active_listings().await
    }

    async fn proposals(&self, asset_id: AssetId) -> Result<Vec<Proposal>, ContractError> {
        self.inner.proposals(asset_id).await
    }

    async fn native_balance(&self, owner: &Address) -> Result<Decimal, ContractError> {
        self.inner.native_balance(owner).await
    }
}

#[tokio::test]
async fn test_asset_stats_from_snapshot() {
    let reader = reader();
    let loft = AssetStats::compute(&reader.get_asset(1).await.unwrap());
    assert_eq!(loft.available_percentage, dec!(75));
    assert_eq!(loft.total_value, dec!(100));

    let vineyard = AssetStats::compute(&reader.get_asset(2).await.unwrap());
    assert_eq!(vineyard.sold_percentage, dec!(40));
    assert_eq!(vineyard.price_per_unit, dec!(200));
}

#[tokio::test]
async fn test_listings_with_a_failing_asset_lookup() {
    let reader = FlakyReader {
        inner: reader(),
        broken_asset: 2,
    };
    let listings = reader.active_listings().await.unwrap();
    assert_eq!(listings.len(), 2);

    let enriched = enrich_listings(&reader, listings).await;
    assert_eq!(enriched.len(), 1);
    assert_eq!(enriched[0].view.quantity, "40 shares");
    assert_eq!(enriched[0].view.premium_percentage, Some(dec!(20)));

    let err = reader.get_asset(2).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.failure_kind(), FailureKind::Network);
}

#[tokio::test]
async fn test_buy_listing_respects_holding_limit() {
    let reader = reader();
    let asset = reader.get_asset(1).await.unwrap();
    let listing = reader
        .active_listings()
        .await
        .unwrap()
        .into_iter()
        .find(|l| l.id == 1)
        .unwrap();
    let holding = reader.get_position(1, &bob()).await.unwrap().amount;
    let balance = reader.native_balance(&bob()).await.unwrap();

    // Bob holds 90 of a 100 share maximum
    let whole = ListingPurchaseForm {
        buyer: bob(),
        amount: None,
        current_holding: holding,
        balance: Some(balance),
    };
    let err = whole.validate(&listing, &asset).unwrap_err();
    assert!(err.has_error("amount", ValidationErrorCode::LimitExceeded));

    let partial = ListingPurchaseForm {
        amount: Some(dec!(10)),
        ..whole
    };
    let quote = partial.validate(&listing, &asset).unwrap();
    assert_eq!(quote.units, 10);
    assert_eq!(quote.cost, dec!(1.2));
}

#[tokio::test]
async fn test_primary_purchase_of_weighted_asset() {
    let reader = reader();
    let asset = reader.get_asset(2).await.unwrap();
    let holding = reader.get_position(2, &alice()).await.unwrap().amount;

    let form = PurchaseForm {
        amount: Some(dec!(9)),
        current_holding: holding,
        balance: None,
    };
    let quote = form.validate(&asset).unwrap();
    assert_eq!(quote.quantity, "9.00%");
    assert_eq!(quote.cost, dec!(1800));

    let over = PurchaseForm {
        amount: Some(dec!(9.5)),
        ..form
    };
    let err = over.validate(&asset).unwrap_err();
    let message = &err.error_for("amount").unwrap().message;
    assert!(message.contains("10.00%"), "{}", message);
    assert!(message.contains("9.00% more"), "{}", message);
}

#[tokio::test]
async fn test_portfolio() {
    let summary = load_portfolio(&reader(), &alice(), dec!(0.05)).await.unwrap();
    assert_eq!(summary.positions.len(), 2);
    // 120 shares at 0.1 plus 1% of 20,000
    assert_eq!(summary.total_value, dec!(212));
    assert_eq!(summary.usd_estimate, dec!(10.6));
}

#[tokio::test]
async fn test_proposal_tally_and_vote() {
    let reader = reader();
    let asset = reader.get_asset(1).await.unwrap();
    let proposal = reader.proposals(1).await.unwrap().remove(0);

    let tally = proposal.tally();
    assert_eq!(tally.participation_percentage, dec!(21));
    assert_eq!(tally.yes_percentage, dec!(57.14));

    let before = Utc.timestamp_opt(1_767_225_600, 0).unwrap() - Duration::days(1);
    assert_eq!(proposal.status(before), ProposalStatus::Active);
    assert_eq!(proposal.status(before + Duration::days(2)), ProposalStatus::Passed);

    let position = reader.get_position(1, &bob()).await.unwrap();
    let weight = check_vote(&proposal, &position, &asset, before).unwrap();
    assert_eq!(weight, 90_000_000_000_000_000);
}
