//! Purchase checks and secondary-market listings

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use market_common::assets::{Address, AssetId};
use market_common::chain::{enrich_listings, EnrichedListing, MarketplaceReader};
use market_common::units::{format_percentage, format_token_amount};
use market_common::validation::{ListingForm, ListingPurchaseForm, PurchaseForm, TradeQuote};

use super::output::{print_json, reject};
use super::Context;

/// Arguments for the check-purchase command
#[derive(Args)]
pub struct CheckPurchaseArgs {
    /// Asset id
    #[arg(long)]
    pub asset: AssetId,

    /// Buying account
    #[arg(long)]
    pub buyer: Address,

    /// Shares, or percentage points for weighted assets
    #[arg(long)]
    pub amount: Decimal,

    /// Buy from this listing instead of the primary sale
    #[arg(long)]
    pub listing: Option<u64>,
}

/// Arguments for the check-listing command
#[derive(Args)]
pub struct CheckListingArgs {
    /// Asset id
    #[arg(long)]
    pub asset: AssetId,

    /// Selling account
    #[arg(long)]
    pub seller: Address,

    /// Shares, or percentage points for weighted assets
    #[arg(long)]
    pub amount: Decimal,

    /// Tokens per share, or per percentage point
    #[arg(long)]
    pub price: Decimal,

    /// Let buyers take part of the listing
    #[arg(long)]
    pub allow_partial: bool,
}

/// Arguments for the listings command
#[derive(Args)]
pub struct ListingsArgs {
    /// Only listings of this asset
    #[arg(long)]
    pub asset: Option<AssetId>,

    /// Only listings by this seller
    #[arg(long)]
    pub seller: Option<Address>,
}

#[derive(Serialize)]
struct QuoteOutput<'a> {
    asset_id: AssetId,
    buyer: &'a Address,
    listing_id: Option<u64>,
    #[serde(flatten)]
    quote: &'a TradeQuote,
}

pub async fn execute_check_purchase(ctx: &Context, args: CheckPurchaseArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset).await?;
    let holding = reader.get_position(args.asset, &args.buyer).await?.amount;
    let balance = reader.native_balance(&args.buyer).await?;

    let outcome = match args.listing {
        Some(listing_id) => {
            let listing = reader
                .active_listings()
                .await?
                .into_iter()
                .find(|l| l.id == listing_id && l.asset_id == args.asset)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no active listing {} for asset {}",
                        listing_id,
                        args.asset
                    )
                })?;
            ListingPurchaseForm {
                buyer: args.buyer.clone(),
                amount: Some(args.amount),
                current_holding: holding,
                balance: Some(balance),
            }
            .validate(&listing, &asset)
        }
        None => PurchaseForm {
            amount: Some(args.amount),
            current_holding: holding,
            balance: Some(balance),
        }
        .validate(&asset),
    };

    let quote = match outcome {
        Ok(quote) => quote,
        Err(result) => return reject(ctx.json, "Purchase", &result),
    };

    if ctx.json {
        return print_json(&QuoteOutput {
            asset_id: asset.id,
            buyer: &args.buyer,
            listing_id: args.listing,
            quote: &quote,
        });
    }

    println!("Purchase of {} in {} is allowed", quote.quantity, asset.name);
    println!("Cost:    {}", format_token_amount(quote.cost, ctx.symbol()));
    println!(
        "Balance: {}",
        format_token_amount(balance, ctx.symbol())
    );
    println!(
        "Holding: {} -> {}",
        asset.kind().describe(holding),
        asset.kind().describe(holding.saturating_add(quote.units))
    );

    Ok(())
}

pub async fn execute_check_listing(ctx: &Context, args: CheckListingArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset).await?;
    let holding = reader.get_position(args.asset, &args.seller).await?.amount;

    let form = ListingForm {
        amount: Some(args.amount),
        price_per_unit: Some(args.price),
        allow_partial: args.allow_partial,
    };
    let request = match form.validate(&asset, holding) {
        Ok(request) => request,
        Err(result) => return reject(ctx.json, "Listing", &result),
    };

    if ctx.json {
        return print_json(&request);
    }

    let kind = asset.kind();
    let total = kind.cost(request.amount, args.price).unwrap_or(Decimal::MAX);
    println!(
        "Listing of {} in {} is allowed",
        kind.describe(request.amount),
        asset.name
    );
    println!("Asking:  {}", format_token_amount(total, ctx.symbol()));
    println!(
        "Partial: {}",
        if request.allow_partial { "allowed" } else { "whole listing only" }
    );

    Ok(())
}

pub async fn execute_listings(ctx: &Context, args: ListingsArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let listings = reader
        .active_listings()
        .await?
        .into_iter()
        .filter(|l| args.asset.map_or(true, |id| l.asset_id == id))
        .filter(|l| args.seller.as_ref().map_or(true, |s| &l.seller == s))
        .collect();

    let enriched: Vec<EnrichedListing> = enrich_listings(reader.as_ref(), listings).await;

    if ctx.json {
        let views: Vec<_> = enriched.iter().map(|e| &e.view).collect();
        return print_json(&views);
    }

    if enriched.is_empty() {
        println!("No active listings");
        return Ok(());
    }

    println!(
        "{:<5} {:<20} {:<14} {:>14} {:>18} {:>9}  {}",
        "ID", "ASSET", "SELLER", "QUANTITY", "TOTAL", "PREMIUM", "PARTIAL"
    );
    for EnrichedListing { view, .. } in &enriched {
        let premium = view
            .premium_percentage
            .map(format_percentage)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<20} {:<14} {:>14} {:>18} {:>9}  {}",
            view.listing_id,
            view.asset_name,
            view.seller.short(),
            view.quantity,
            format_token_amount(view.total_price, ctx.symbol()),
            premium,
            if view.allow_partial { "yes" } else { "no" }
        );
    }

    Ok(())
}
