use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::{require_non_negative, require_text, ValidationError, ValidationErrorCode, ValidationResult};
use crate::assets::{raw_amount, AssetId};
use crate::units::{self, TOKEN_DECIMALS};

pub const MAX_TITLE_LEN: usize = 120;
pub const MAX_PROPOSAL_DESCRIPTION_LEN: usize = 5000;

const SECONDS_PER_DAY: u64 = 86_400;

/// New proposal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalForm {
    pub title: String,
    pub description: String,
    /// Tokens; empty means no cost
    pub cost_estimate: Option<Decimal>,
    pub voting_days: Option<u32>,
}

/// Contract-ready arguments for creating a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub asset_id: AssetId,
    pub title: String,
    pub description: String,
    /// Wei
    #[serde(with = "raw_amount")]
    pub cost_estimate: u128,
    pub voting_period_secs: u64,
}

impl ProposalForm {
    /// Validate for a proposer holding `holding` units of the asset.
    pub fn validate(
        &self,
        asset_id: AssetId,
        holding: u128,
        voting_days: RangeInclusive<u32>,
    ) -> Result<ProposalRequest, ValidationResult> {
        let mut result = ValidationResult::success();

        if holding == 0 {
            result.add_error(ValidationError::new(
                "proposer",
                "Only holders of this asset can create proposals",
                ValidationErrorCode::Invalid,
            ));
        }

        require_text(&mut result, "title", "Title", &self.title, MAX_TITLE_LEN);
        require_text(
            &mut result,
            "description",
            "Description",
            &self.description,
            MAX_PROPOSAL_DESCRIPTION_LEN,
        );
        require_non_negative(&mut result, "cost_estimate", "Cost estimate", self.cost_estimate);

        match self.voting_days {
            None => result.add_error(ValidationError::new(
                "voting_days",
                "Voting period is required",
                ValidationErrorCode::Required,
            )),
            Some(days) if !voting_days.contains(&days) => result.add_error(ValidationError::new(
                "voting_days",
                format!(
                    "Voting period must be between {} and {} days",
                    voting_days.start(),
                    voting_days.end()
                ),
                ValidationErrorCode::OutOfRange,
            )),
            Some(_) => {}
        }

        if !result.valid {
            return Err(result);
        }

        let cost = self.cost_estimate.unwrap_or_default();
        let cost_estimate = match units::parse_units(cost, TOKEN_DECIMALS) {
            Ok(wei) => wei,
            Err(e) => {
                result.add_error(ValidationError::new(
                    "cost_estimate",
                    e.to_string(),
                    ValidationErrorCode::Invalid,
                ));
                return Err(result);
            }
        };

        Ok(ProposalRequest {
            asset_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            cost_estimate,
            voting_period_secs: u64::from(self.voting_days.unwrap_or_default()) * SECONDS_PER_DAY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form() -> ProposalForm {
        ProposalForm {
            title: "Replace roof".to_string(),
            description: "The roof leaks in two places.".to_string(),
            cost_estimate: Some(dec!(12.5)),
            voting_days: Some(7),
        }
    }

    #[test]
    fn test_valid_proposal() {
        let request = form().validate(3, 10, 1..=30).unwrap();
        assert_eq!(request.asset_id, 3);
        assert_eq!(request.cost_estimate, 12_500_000_000_000_000_000);
        assert_eq!(request.voting_period_secs, 7 * 86_400);
    }

    #[test]
    fn test_proposer_must_hold() {
        let err = form().validate(3, 0, 1..=30).unwrap_err();
        assert!(err.has_error("proposer", ValidationErrorCode::Invalid));
    }

    #[test]
    fn test_field_rules() {
        let bad = ProposalForm {
            title: "t".repeat(MAX_TITLE_LEN + 1),
            description: String::new(),
            cost_estimate: Some(dec!(-1)),
            voting_days: Some(31),
        };
        let err = bad.validate(3, 10, 1..=30).unwrap_err();
        assert!(err.has_error("title", ValidationErrorCode::TooLong));
        assert!(err.has_error("description", ValidationErrorCode::Required));
        assert!(err.has_error("cost_estimate", ValidationErrorCode::OutOfRange));
        assert!(err.has_error("voting_days", ValidationErrorCode::OutOfRange));

        let no_days = ProposalForm {
            voting_days: None,
            ..form()
        };
        assert!(no_days
            .validate(3, 10, 1..=30)
            .unwrap_err()
            .has_error("voting_days", ValidationErrorCode::Required));
    }

    #[test]
    fn test_missing_cost_is_zero() {
        let request = ProposalForm {
            cost_estimate: None,
            ..form()
        }
        .validate(3, 10, 1..=30)
        .unwrap();
        assert_eq!(request.cost_estimate, 0);
    }
}
