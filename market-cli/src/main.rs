//! Asset marketplace CLI
//!
//! Runs the marketplace accounting against a JSON chain snapshot:
//! - `assets` / `stats`: asset cards and detail figures
//! - `check-purchase`: validate a primary or listing purchase and quote it
//! - `check-listing` / `listings`: post and browse secondary-market listings
//! - `portfolio` / `watch-balance`: holdings and native balance
//! - `proposals` / `check-proposal` / `check-vote`: governance
//! - `validate-asset`: check an asset-creation draft
//! - `explain-error`: classify a wallet or contract failure message

use anyhow::Result;
use clap::Parser;

use market_cli::cli::{self, Cli};
use market_common::logging::{init_logging, LogConfig, DEFAULT_APP_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(LogConfig::from_env().with_app_name(DEFAULT_APP_NAME))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let cli = Cli::parse();
    cli::run(cli).await
}
