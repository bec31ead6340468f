//! Assets and stats commands

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use market_common::chain::MarketplaceReader;
use market_common::units::{format_percentage, format_shares, format_token_amount, format_usd, gateway_url, usd_estimate};
use market_common::{Asset, AssetStats, ModelKind};

use super::output::print_json;
use super::Context;

/// Arguments for the assets command
#[derive(Args)]
pub struct AssetsArgs {
    /// Hide inactive assets
    #[arg(long)]
    pub active_only: bool,
}

/// Arguments for the stats command
#[derive(Args)]
pub struct StatsArgs {
    /// Asset id
    pub asset_id: u64,
}

#[derive(Serialize)]
struct AssetRow<'a> {
    asset: &'a Asset,
    stats: AssetStats,
}

fn price_label(ctx: &Context, asset: &Asset, stats: &AssetStats) -> String {
    let per = match asset.kind() {
        ModelKind::Fixed => "share",
        ModelKind::Weighted => "1%",
    };
    format!("{}/{}", format_token_amount(stats.price_per_unit, ctx.symbol()), per)
}

pub async fn execute_assets(ctx: &Context, args: AssetsArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let assets: Vec<Asset> = reader
        .list_assets()
        .await?
        .into_iter()
        .filter(|a| a.active || !args.active_only)
        .collect();

    let rows: Vec<AssetRow> = assets
        .iter()
        .map(|asset| AssetRow {
            asset,
            stats: AssetStats::compute(asset),
        })
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No assets found");
        return Ok(());
    }

    println!(
        "{:<5} {:<9} {:<24} {:>9} {:>10}  {}",
        "ID", "MODEL", "NAME", "SOLD", "AVAILABLE", "PRICE"
    );
    for row in &rows {
        let status = if row.asset.active { "" } else { " (inactive)" };
        println!(
            "{:<5} {:<9} {:<24} {:>9} {:>10}  {}{}",
            row.asset.id,
            row.asset.kind(),
            row.asset.name,
            format_percentage(row.stats.sold_percentage),
            format_percentage(row.stats.available_percentage),
            price_label(ctx, row.asset, &row.stats),
            status
        );
    }

    Ok(())
}

pub async fn execute_stats(ctx: &Context, args: StatsArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset_id).await?;
    let stats = AssetStats::compute(&asset);

    if ctx.json {
        return print_json(&AssetRow {
            asset: &asset,
            stats,
        });
    }

    let kind = asset.kind();
    let symbol = ctx.symbol();
    let usd_rate = ctx.settings.display.usd_rate;

    println!("=== {} (#{}) ===", asset.name, asset.id);
    println!("Type:            {}", asset.asset_type);
    println!("Model:           {}", kind);
    println!("Creator:         {}", asset.creator.short());
    println!("Active:          {}", if asset.active { "yes" } else { "no" });
    if kind == ModelKind::Fixed {
        println!("Total shares:    {}", format_shares(stats.total_units));
    }
    println!(
        "Sold:            {} ({})",
        kind.describe(stats.sold_units),
        format_percentage(stats.sold_percentage)
    );
    println!(
        "Available:       {} ({})",
        kind.describe(stats.available_units),
        format_percentage(stats.available_percentage)
    );
    println!(
        "Total value:     {} (~{})",
        format_token_amount(stats.total_value, symbol),
        format_usd(usd_estimate(stats.total_value, usd_rate))
    );
    println!(
        "Available value: {}",
        format_token_amount(stats.available_value, symbol)
    );
    println!("Price:           {}", price_label(ctx, &asset, &stats));
    println!(
        "Price per 1%:    {}",
        format_token_amount(stats.price_per_percent, symbol)
    );
    println!(
        "Min purchase:    {}",
        kind.describe(asset.limits.min)
    );
    println!(
        "Max per user:    {}",
        if market_common::limits::is_unlimited(kind, asset.limits.max) {
            "unlimited".to_string()
        } else {
            kind.describe(asset.limits.max)
        }
    );
    if let Some(cid) = &asset.image_cid {
        println!(
            "Image:           {}",
            gateway_url(&ctx.settings.display.gateway, cid)
        );
    }
    if stats.is_sold_out() {
        println!();
        println!("Sold out");
    }

    Ok(())
}
