//! Command-line interface
//!
//! Every command reads chain state from a JSON snapshot
//! (`network.snapshot_path`, or `--snapshot`).

pub mod assets;
pub mod explain;
pub mod governance;
pub mod output;
pub mod portfolio;
pub mod trade;
pub mod validate;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use market_common::chain::{ChainSnapshot, SnapshotReader};
use market_common::config::Settings;

/// Asset marketplace CLI
#[derive(Parser)]
#[command(name = "market")]
#[command(about = "Ownership accounting for the tokenized asset marketplace")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// Chain snapshot to read instead of `network.snapshot_path`
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List assets with sale progress
    Assets(assets::AssetsArgs),
    /// Show the figures of one asset
    Stats(assets::StatsArgs),
    /// Validate a primary purchase and quote its cost
    CheckPurchase(trade::CheckPurchaseArgs),
    /// Validate a secondary-market listing before posting it
    CheckListing(trade::CheckListingArgs),
    /// Validate an asset-creation draft
    ValidateAsset(validate::ValidateAssetArgs),
    /// List active secondary-market listings
    Listings(trade::ListingsArgs),
    /// Show an account's holdings
    Portfolio(portfolio::PortfolioArgs),
    /// Show an asset's proposals and tallies
    Proposals(governance::ProposalsArgs),
    /// Validate a new proposal
    CheckProposal(governance::CheckProposalArgs),
    /// Show whether an account can vote on a proposal, and with what weight
    CheckVote(governance::CheckVoteArgs),
    /// Poll an account's native balance
    WatchBalance(portfolio::WatchBalanceArgs),
    /// Classify a wallet or contract failure message
    ExplainError(explain::ExplainErrorArgs),
}

/// Settings and chain access handed to commands
pub struct Context {
    pub settings: Settings,
    pub json: bool,
    snapshot: Option<PathBuf>,
}

impl Context {
    pub fn new(settings: Settings, global: &GlobalArgs) -> Self {
        Self {
            settings,
            json: global.json,
            snapshot: global.snapshot.clone(),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.settings.network.snapshot_path))
    }

    pub fn reader(&self) -> Result<Arc<SnapshotReader>> {
        let path = self.snapshot_path();
        let snapshot = ChainSnapshot::load(&path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        snapshot
            .ensure_origin(&self.settings.network)
            .with_context(|| format!("snapshot {} does not match the configured network", path.display()))?;
        Ok(Arc::new(SnapshotReader::new(snapshot)))
    }

    pub fn symbol(&self) -> &str {
        &self.settings.display.token_symbol
    }
}

/// Load settings and run the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let report = settings.validate();
    for warning in &report.warnings {
        debug!(field = %warning.field, "{}", warning.message);
    }
    settings.ensure_valid()?;

    let ctx = Context::new(settings, &cli.global);

    match cli.command {
        Commands::Assets(args) => assets::execute_assets(&ctx, args).await,
        Commands::Stats(args) => assets::execute_stats(&ctx, args).await,
        Commands::CheckPurchase(args) => trade::execute_check_purchase(&ctx, args).await,
        Commands::CheckListing(args) => trade::execute_check_listing(&ctx, args).await,
        Commands::ValidateAsset(args) => validate::execute(&ctx, args),
        Commands::Listings(args) => trade::execute_listings(&ctx, args).await,
        Commands::Portfolio(args) => portfolio::execute_portfolio(&ctx, args).await,
        Commands::Proposals(args) => governance::execute(&ctx, args).await,
        Commands::CheckProposal(args) => governance::execute_check_proposal(&ctx, args).await,
        Commands::CheckVote(args) => governance::execute_check_vote(&ctx, args).await,
        Commands::WatchBalance(args) => portfolio::execute_watch_balance(&ctx, args).await,
        Commands::ExplainError(args) => explain::execute(&ctx, args),
    }
}
