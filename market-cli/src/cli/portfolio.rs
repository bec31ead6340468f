//! Portfolio and balance commands

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

use market_common::assets::Address;
use market_common::chain::{load_portfolio, BalanceWatcher, MarketplaceReader};
use market_common::units::{format_percentage, format_token_amount, format_usd, usd_estimate};

use super::output::print_json;
use super::Context;

/// Arguments for the portfolio command
#[derive(Args)]
pub struct PortfolioArgs {
    /// Account to summarize
    pub owner: Address,
}

/// Arguments for the watch-balance command
#[derive(Args)]
pub struct WatchBalanceArgs {
    /// Account to watch
    pub owner: Address,

    /// Seconds between reads, overriding `polling.balance_interval_secs`
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many balance updates
    #[arg(long)]
    pub count: Option<usize>,
}

pub async fn execute_portfolio(ctx: &Context, args: PortfolioArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let summary = load_portfolio(reader.as_ref(), &args.owner, ctx.settings.display.usd_rate).await?;

    if ctx.json {
        return print_json(&summary);
    }

    println!("Portfolio of {}", summary.owner);
    if summary.is_empty() {
        println!("No holdings");
        return Ok(());
    }

    println!();
    println!(
        "{:<5} {:<24} {:>16} {:>10} {:>18}",
        "ID", "ASSET", "HOLDING", "OWNED", "VALUE"
    );
    for position in &summary.positions {
        println!(
            "{:<5} {:<24} {:>16} {:>10} {:>18}",
            position.asset_id,
            position.asset_name,
            position.holding,
            format_percentage(position.ownership_percentage),
            format_token_amount(position.estimated_value, ctx.symbol())
        );
    }
    println!();
    println!(
        "Total: {} (~{})",
        format_token_amount(summary.total_value, ctx.symbol()),
        format_usd(summary.usd_estimate)
    );

    Ok(())
}

pub async fn execute_watch_balance(ctx: &Context, args: WatchBalanceArgs) -> Result<()> {
    let reader: Arc<dyn MarketplaceReader> = ctx.reader()?;
    let interval = args
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| ctx.settings.polling.balance_interval());

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let watcher = BalanceWatcher::new(reader, args.owner.clone(), interval);
    let (mut rx, handle) = watcher.spawn(shutdown_rx);

    let usd_rate = ctx.settings.display.usd_rate;
    let mut updates = 0usize;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(balance) = *rx.borrow_and_update() else {
                    continue;
                };

                if ctx.json {
                    print_json(&serde_json::json!({
                        "owner": args.owner,
                        "balance": balance,
                        "usd_estimate": usd_estimate(balance, usd_rate),
                    }))?;
                } else {
                    println!(
                        "{}  {} (~{})",
                        chrono::Utc::now().format("%H:%M:%S"),
                        format_token_amount(balance, ctx.symbol()),
                        format_usd(usd_estimate(balance, usd_rate))
                    );
                }

                updates += 1;
                if args.count.is_some_and(|limit| updates >= limit) {
                    break;
                }
            }
        }
    }

    // The watcher may already have exited if its receivers closed
    let _ = shutdown_tx.send(());
    handle.await?;

    Ok(())
}
