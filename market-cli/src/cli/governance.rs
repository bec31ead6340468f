//! Governance commands

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use market_common::assets::{Address, AssetId};
use market_common::chain::MarketplaceReader;
use market_common::governance::{check_vote, Proposal, ProposalStatus, VoteTally};
use market_common::units::{format_percentage, format_token_amount, weight_to_percentage};
use market_common::validation::ProposalForm;

use super::output::{print_json, reject};
use super::Context;

/// Arguments for the proposals command
#[derive(Args)]
pub struct ProposalsArgs {
    /// Asset id
    pub asset_id: AssetId,

    /// Hide proposals that no longer accept votes
    #[arg(long)]
    pub active_only: bool,
}

/// Arguments for the check-proposal command
#[derive(Args)]
pub struct CheckProposalArgs {
    /// Asset id
    pub asset_id: AssetId,

    /// Proposing account
    #[arg(long)]
    pub proposer: Address,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Estimated cost in tokens
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Voting period in days
    #[arg(long)]
    pub days: u32,
}

/// Arguments for the check-vote command
#[derive(Args)]
pub struct CheckVoteArgs {
    /// Asset id
    pub asset_id: AssetId,

    /// Proposal id
    pub proposal_id: u64,

    /// Voting account
    #[arg(long)]
    pub voter: Address,
}

#[derive(Serialize)]
struct ProposalRow<'a> {
    #[serde(flatten)]
    proposal: &'a Proposal,
    status: ProposalStatus,
    tally: VoteTally,
    seconds_remaining: Option<i64>,
}

fn format_remaining(remaining: Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    if days > 0 {
        format!("{}d {}h left", days, hours)
    } else {
        format!("{}h {}m left", hours, remaining.num_minutes() % 60)
    }
}

pub async fn execute(ctx: &Context, args: ProposalsArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset_id).await?;
    let now = Utc::now();

    let proposals = reader.proposals(args.asset_id).await?;
    let rows: Vec<ProposalRow> = proposals
        .iter()
        .map(|proposal| ProposalRow {
            proposal,
            status: proposal.status(now),
            tally: proposal.tally(),
            seconds_remaining: proposal.time_remaining(now).map(|d| d.num_seconds()),
        })
        .filter(|row| row.status.accepts_votes() || !args.active_only)
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    println!("Proposals for {} (#{})", asset.name, asset.id);
    if rows.is_empty() {
        println!("None");
        return Ok(());
    }

    for row in &rows {
        let p = row.proposal;
        println!();
        println!("#{} {} [{}]", p.id, p.title, row.status);
        println!("  Proposer:      {}", p.proposer.short());
        println!(
            "  Cost estimate: {}",
            format_token_amount(p.cost_estimate, ctx.symbol())
        );
        println!(
            "  Votes:         {} yes / {} no ({} of supply voted)",
            format_percentage(row.tally.yes_percentage),
            format_percentage(row.tally.no_percentage),
            format_percentage(row.tally.participation_percentage)
        );
        match p.time_remaining(now) {
            Some(remaining) => println!("  Deadline:      {} ({})", p.deadline, format_remaining(remaining)),
            None => println!("  Deadline:      {} (closed)", p.deadline),
        }
    }

    Ok(())
}

pub async fn execute_check_proposal(ctx: &Context, args: CheckProposalArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset_id).await?;
    let holding = reader.get_position(args.asset_id, &args.proposer).await?.amount;

    let form = ProposalForm {
        title: args.title,
        description: args.description,
        cost_estimate: args.cost,
        voting_days: Some(args.days),
    };
    let request = match form.validate(asset.id, holding, ctx.settings.governance.voting_days()) {
        Ok(request) => request,
        Err(result) => return reject(ctx.json, "Proposal", &result),
    };

    if ctx.json {
        return print_json(&request);
    }

    println!("Proposal \"{}\" on {} is allowed", request.title, asset.name);
    println!(
        "Voting ends {}",
        Utc::now() + Duration::days(i64::from(args.days))
    );
    Ok(())
}

pub async fn execute_check_vote(ctx: &Context, args: CheckVoteArgs) -> Result<()> {
    let reader = ctx.reader()?;
    let asset = reader.get_asset(args.asset_id).await?;
    let proposal = reader
        .proposals(args.asset_id)
        .await?
        .into_iter()
        .find(|p| p.id == args.proposal_id)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no proposal {} for asset {}",
                args.proposal_id,
                args.asset_id
            )
        })?;
    let position = reader.get_position(args.asset_id, &args.voter).await?;

    let weight = check_vote(&proposal, &position, &asset, Utc::now())?;
    let share = weight_to_percentage(weight)?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "proposal_id": proposal.id,
            "voter": args.voter,
            "weight": weight.to_string(),
            "percentage": share,
        }));
    }

    println!(
        "{} can vote on #{} with {} of the vote",
        args.voter.short(),
        proposal.id,
        format_percentage(share)
    );
    Ok(())
}
