//! DAO-style proposals attached to an asset.
//!
//! Votes are weighted by ownership: a holder of 12.5% of an asset votes
//! with 12.5% of the weight, whichever model the asset uses. Tallies are kept
//! in weight units (`1e16` = 1%).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assets::{raw_amount, Address, Asset, AssetId, ModelKind, Position};
use crate::error::{ContractError, EntityError};
use crate::stats::percent_of;
use crate::units::{self, FULL_WEIGHT, TOKEN_DECIMALS};

/// Proposal in the shape the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProposal {
    pub id: u64,
    pub asset_id: AssetId,
    pub proposer: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Wei
    #[serde(with = "raw_amount", default)]
    pub cost_estimate: u128,
    /// Unix seconds
    pub deadline: i64,
    #[serde(with = "raw_amount", default)]
    pub yes_votes: u128,
    #[serde(with = "raw_amount", default)]
    pub no_votes: u128,
    #[serde(default)]
    pub executed: bool,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub id: u64,
    pub asset_id: AssetId,
    pub proposer: Address,
    pub title: String,
    pub description: String,
    pub cost_estimate: Decimal,
    pub deadline: DateTime<Utc>,
    pub yes_votes: u128,
    pub no_votes: u128,
    pub executed: bool,
    pub cancelled: bool,
}

impl TryFrom<RawProposal> for Proposal {
    type Error = ContractError;

    fn try_from(raw: RawProposal) -> Result<Self, Self::Error> {
        let cost_estimate = units::format_units(raw.cost_estimate, TOKEN_DECIMALS)
            .map_err(|e| ContractError::Decode(format!("proposal {}: {}", raw.id, e)))?;
        let deadline = DateTime::from_timestamp(raw.deadline, 0).ok_or_else(|| {
            ContractError::Decode(format!(
                "proposal {}: deadline {} out of range",
                raw.id, raw.deadline
            ))
        })?;

        Ok(Proposal {
            id: raw.id,
            asset_id: raw.asset_id,
            proposer: Address::parse(&raw.proposer)?,
            title: raw.title,
            description: raw.description,
            cost_estimate,
            deadline,
            yes_votes: raw.yes_votes,
            no_votes: raw.no_votes,
            executed: raw.executed,
            cancelled: raw.cancelled,
        })
    }
}

/// Lifecycle of a proposal at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    /// Voting is open
    Active,
    /// Voting closed with more yes than no weight
    Passed,
    /// Voting closed without a yes majority
    Rejected,
    Executed,
    Cancelled,
}

impl ProposalStatus {
    pub fn accepts_votes(&self) -> bool {
        matches!(self, ProposalStatus::Active)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ProposalStatus::Executed | ProposalStatus::Cancelled)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalStatus::Active => write!(f, "ACTIVE"),
            ProposalStatus::Passed => write!(f, "PASSED"),
            ProposalStatus::Rejected => write!(f, "REJECTED"),
            ProposalStatus::Executed => write!(f, "EXECUTED"),
            ProposalStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Vote shares of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteTally {
    /// Share of cast weight voting yes
    pub yes_percentage: Decimal,
    /// Share of cast weight voting no
    pub no_percentage: Decimal,
    /// Cast weight as a share of the whole asset
    pub participation_percentage: Decimal,
}

impl Proposal {
    pub fn status(&self, now: DateTime<Utc>) -> ProposalStatus {
        if self.cancelled {
            ProposalStatus::Cancelled
        } else if self.executed {
            ProposalStatus::Executed
        } else if now < self.deadline {
            ProposalStatus::Active
        } else if self.yes_votes > self.no_votes {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Rejected
        }
    }

    pub fn tally(&self) -> VoteTally {
        let cast = self.yes_votes.saturating_add(self.no_votes);
        let yes_percentage = percent_of(self.yes_votes, cast);
        let no_percentage = if cast == 0 {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED - yes_percentage
        };

        VoteTally {
            yes_percentage,
            no_percentage,
            participation_percentage: percent_of(cast, FULL_WEIGHT),
        }
    }

    /// Time left to vote; `None` once the deadline passed
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        (now < self.deadline).then(|| self.deadline - now)
    }
}

/// Voting weight of a position, in weight units.
pub fn vote_weight(position: &Position, asset: &Asset) -> u128 {
    match asset.kind() {
        ModelKind::Weighted => position.amount.min(FULL_WEIGHT),
        ModelKind::Fixed => {
            let total = asset.model.total_units();
            if total == 0 {
                return 0;
            }
            let amount = position.amount.min(total);
            match amount.checked_mul(FULL_WEIGHT) {
                Some(scaled) => scaled / total,
                None => amount / (total / FULL_WEIGHT).max(1),
            }
        }
    }
}

/// Check that `position` may vote on `proposal` now and return its weight.
pub fn check_vote(
    proposal: &Proposal,
    position: &Position,
    asset: &Asset,
    now: DateTime<Utc>,
) -> Result<u128, EntityError> {
    if proposal.asset_id != asset.id || position.asset_id != asset.id {
        return Err(EntityError::invalid(
            "Vote",
            format!(
                "proposal {} belongs to asset {}, position to asset {}",
                proposal.id, proposal.asset_id, position.asset_id
            ),
        ));
    }

    let status = proposal.status(now);
    if !status.accepts_votes() {
        return Err(EntityError::invalid_state(
            "Proposal",
            proposal.id,
            format!("voting is closed ({})", status),
        ));
    }

    match vote_weight(position, asset) {
        0 => Err(EntityError::invalid_state(
            "Proposal",
            proposal.id,
            "voter holds no ownership in this asset",
        )),
        weight => Ok(weight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetModel, PurchaseLimits};
    use crate::units::WEIGHT_PER_PERCENT;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn holder() -> Address {
        Address::parse("0xa11ce00000000000000000000000000000000001").unwrap()
    }

    fn fixed_asset() -> Asset {
        Asset {
            id: 1,
            asset_type: "Real Estate".to_string(),
            name: "Harbor Loft".to_string(),
            description: String::new(),
            model: AssetModel::Fixed {
                total_shares: 1000,
                sold_shares: 600,
                price_per_share: dec!(0.1),
            },
            limits: PurchaseLimits::default(),
            active: true,
            creator: holder(),
            image_cid: None,
        }
    }

    fn proposal(yes: u128, no: u128) -> Proposal {
        Proposal {
            id: 5,
            asset_id: 1,
            proposer: holder(),
            title: "Replace roof".to_string(),
            description: String::new(),
            cost_estimate: dec!(12.5),
            deadline: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            yes_votes: yes,
            no_votes: no,
            executed: false,
            cancelled: false,
        }
    }

    #[test]
    fn test_status_transitions() {
        let p = proposal(30 * WEIGHT_PER_PERCENT, 10 * WEIGHT_PER_PERCENT);
        let before = p.deadline - Duration::hours(1);
        let after = p.deadline + Duration::hours(1);

        assert_eq!(p.status(before), ProposalStatus::Active);
        assert_eq!(p.status(after), ProposalStatus::Passed);
        assert_eq!(proposal(10, 10).status(after), ProposalStatus::Rejected);

        let executed = Proposal {
            executed: true,
            ..p.clone()
        };
        assert_eq!(executed.status(before), ProposalStatus::Executed);

        let cancelled = Proposal {
            cancelled: true,
            executed: true,
            ..p
        };
        assert_eq!(cancelled.status(after), ProposalStatus::Cancelled);
    }

    #[test]
    fn test_tally() {
        let tally = proposal(30 * WEIGHT_PER_PERCENT, 10 * WEIGHT_PER_PERCENT).tally();
        assert_eq!(tally.yes_percentage, dec!(75));
        assert_eq!(tally.no_percentage, dec!(25));
        assert_eq!(tally.participation_percentage, dec!(40));

        let empty = proposal(0, 0).tally();
        assert_eq!(empty.yes_percentage, Decimal::ZERO);
        assert_eq!(empty.no_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_vote_weight_matches_ownership() {
        let asset = fixed_asset();
        let position = Position {
            asset_id: 1,
            owner: holder(),
            amount: 125,
        };
        // 125 of 1000 shares = 12.5%
        assert_eq!(vote_weight(&position, &asset), 125 * WEIGHT_PER_PERCENT / 10);
    }

    #[test]
    fn test_check_vote() {
        let asset = fixed_asset();
        let p = proposal(0, 0);
        let open = p.deadline - Duration::days(1);
        let position = Position {
            asset_id: 1,
            owner: holder(),
            amount: 10,
        };

        assert_eq!(check_vote(&p, &position, &asset, open).unwrap(), WEIGHT_PER_PERCENT);

        let closed = p.deadline + Duration::seconds(1);
        assert!(matches!(
            check_vote(&p, &position, &asset, closed),
            Err(EntityError::InvalidState { .. })
        ));

        let empty = Position { amount: 0, ..position };
        assert!(check_vote(&p, &empty, &asset, open).is_err());
    }

    #[test]
    fn test_decode_raw_proposal() {
        let raw = RawProposal {
            id: 1,
            asset_id: 1,
            proposer: "0xa11ce00000000000000000000000000000000001".to_string(),
            title: "Repaint".to_string(),
            description: String::new(),
            cost_estimate: 2 * 10u128.pow(18),
            deadline: 1_767_225_600,
            yes_votes: 0,
            no_votes: 0,
            executed: false,
            cancelled: false,
        };
        let proposal = Proposal::try_from(raw).unwrap();
        assert_eq!(proposal.cost_estimate, dec!(2));
        assert_eq!(proposal.deadline.timestamp(), 1_767_225_600);
    }
}
