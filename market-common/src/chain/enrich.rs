use futures_util::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::reader::MarketplaceReader;
use crate::assets::{Address, Asset, Listing};
use crate::error::ContractError;
use crate::stats::{ListingView, PortfolioSummary};

/// A listing joined with its asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedListing {
    pub listing: Listing,
    pub asset: Asset,
    pub view: ListingView,
}

/// Look up the asset of every listing concurrently.
///
/// Listings whose asset cannot be read are logged and dropped; survivors keep
/// their input order. Nothing is retried.
pub async fn enrich_listings<R>(reader: &R, listings: Vec<Listing>) -> Vec<EnrichedListing>
where
    R: MarketplaceReader + ?Sized,
{
    let total = listings.len();
    let lookups = listings.into_iter().map(|listing| async move {
        let asset = reader.get_asset(listing.asset_id).await;
        (listing, asset)
    });

    let enriched: Vec<EnrichedListing> = join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(listing, asset)| match asset {
            Ok(asset) => {
                let view = ListingView::compute(&listing, &asset);
                Some(EnrichedListing {
                    listing,
                    asset,
                    view,
                })
            }
            Err(e) => {
                warn!(
                    listing_id = listing.id,
                    asset_id = listing.asset_id,
                    error = %e,
                    "Dropping listing whose asset could not be loaded"
                );
                None
            }
        })
        .collect();

    debug!(total, enriched = enriched.len(), "Enriched listings");
    enriched
}

/// Load every non-empty position of `owner` with its asset.
///
/// Positions whose asset cannot be read are logged and left out of the summary.
pub async fn load_portfolio<R>(
    reader: &R,
    owner: &Address,
    usd_rate: Decimal,
) -> Result<PortfolioSummary, ContractError>
where
    R: MarketplaceReader + ?Sized,
{
    let positions: Vec<_> = reader
        .positions_of(owner)
        .await?
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

    let assets = join_all(positions.iter().map(|p| reader.get_asset(p.asset_id))).await;

    let holdings: Vec<(&_, Asset)> = positions
        .iter()
        .zip(assets)
        .filter_map(|(position, asset)| match asset {
            Ok(asset) => Some((position, asset)),
            Err(e) => {
                warn!(
                    owner = %owner,
                    asset_id = position.asset_id,
                    error = %e,
                    "Skipping position whose asset could not be loaded"
                );
                None
            }
        })
        .collect();

    Ok(PortfolioSummary::compute(
        owner.clone(),
        holdings.iter().map(|(position, asset)| (*position, asset)),
        usd_rate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Position, RawAsset, RawListing};
    use crate::chain::{ChainSnapshot, SnapshotReader};
    use rust_decimal_macros::dec;

    fn alice() -> Address {
        Address::parse("0xa11ce00000000000000000000000000000000001").unwrap()
    }

    fn raw_asset(id: u64) -> RawAsset {
        RawAsset {
            id,
            asset_type: "Art".to_string(),
            name: format!("Piece {}", id),
            description: String::new(),
            model: 0,
            total: 100,
            price_per_unit: 10u128.pow(18),
            sold: 10,
            min_purchase: 1,
            max_purchase: 0,
            active: true,
            creator: alice().to_string(),
            image_cid: None,
        }
    }

    fn raw_listing(id: u64, asset_id: u64) -> RawListing {
        RawListing {
            id,
            asset_id,
            seller: alice().to_string(),
            amount: 5,
            price_per_unit: 2 * 10u128.pow(18),
            allow_partial: false,
            active: true,
        }
    }

    fn reader() -> SnapshotReader {
        SnapshotReader::new(ChainSnapshot {
            assets: vec![raw_asset(1), raw_asset(2)],
            positions: vec![
                Position {
                    asset_id: 1,
                    owner: alice(),
                    amount: 4,
                },
                Position {
                    asset_id: 2,
                    owner: alice(),
                    amount: 0,
                },
                Position {
                    asset_id: 7,
                    owner: alice(),
                    amount: 3,
                },
            ],
            listings: vec![raw_listing(1, 1), raw_listing(2, 9), raw_listing(3, 2)],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_enrich_drops_unknown_assets() {
        let reader = reader();
        let listings = reader.active_listings().await.unwrap();
        let enriched = enrich_listings(&reader, listings).await;

        let ids: Vec<u64> = enriched.iter().map(|e| e.listing.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(enriched[0].view.total_price, dec!(10));
        assert_eq!(enriched[0].view.premium_percentage, Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_enrich_empty() {
        assert!(enrich_listings(&reader(), Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_portfolio_skips_empty_and_unknown() {
        let summary = load_portfolio(&reader(), &alice(), dec!(0.5)).await.unwrap();
        assert_eq!(summary.positions.len(), 1);
        assert_eq!(summary.positions[0].asset_id, 1);
        assert_eq!(summary.total_value, dec!(4));
        assert_eq!(summary.usd_estimate, dec!(2));
    }
}
