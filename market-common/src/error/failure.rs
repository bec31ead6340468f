//! Mapping of upstream failure messages to user-facing outcomes.
//!
//! Wallets, providers and contracts report failures as free-form strings.
//! Every call site used to substring-match on them separately; here the
//! matching happens once, against a fixed table, and the rest of the code
//! works with [`FailureKind`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::common::ContractError;
use super::traits::{ErrorCategory, ErrorClassification};

/// What went wrong, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Wallet cannot cover value plus gas
    InsufficientFunds,
    /// User dismissed the signature request
    UserRejected,
    /// Admin role grant for an address that already holds it
    AlreadyAdmin,
    /// Caller lacks the role the function requires
    NotAuthorized,
    /// Purchase would exceed the per-user maximum
    PurchaseLimitExceeded,
    /// Listing was sold or cancelled
    ListingInactive,
    /// Asset is paused or delisted
    AssetInactive,
    /// Provider unreachable or timed out
    Network,
    /// Contract reverted for a reason not listed above
    Reverted,
    /// Nothing matched
    Unknown,
}

/// Substring table, checked in order against the lowercased message.
const PATTERNS: &[(&str, FailureKind)] = &[
    ("insufficient funds", FailureKind::InsufficientFunds),
    ("insufficient balance", FailureKind::InsufficientFunds),
    ("user rejected", FailureKind::UserRejected),
    ("user denied", FailureKind::UserRejected),
    ("action_rejected", FailureKind::UserRejected),
    ("already an admin", FailureKind::AlreadyAdmin),
    ("accesscontrol", FailureKind::NotAuthorized),
    ("not authorized", FailureKind::NotAuthorized),
    ("caller is not", FailureKind::NotAuthorized),
    ("exceeds max", FailureKind::PurchaseLimitExceeded),
    ("max purchase", FailureKind::PurchaseLimitExceeded),
    ("listing not active", FailureKind::ListingInactive),
    ("listing is not active", FailureKind::ListingInactive),
    ("asset not active", FailureKind::AssetInactive),
    ("asset is not active", FailureKind::AssetInactive),
    ("network error", FailureKind::Network),
    ("timeout", FailureKind::Network),
    ("could not detect network", FailureKind::Network),
    ("execution reverted", FailureKind::Reverted),
    ("revert", FailureKind::Reverted),
];

/// Classify a raw failure message.
pub fn classify_failure(message: &str) -> FailureKind {
    let lowered = message.to_lowercase();
    PATTERNS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(FailureKind::Unknown)
}

impl FailureKind {
    /// Message shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::InsufficientFunds => "Insufficient funds to complete this transaction",
            FailureKind::UserRejected => "Transaction was rejected in the wallet",
            FailureKind::AlreadyAdmin => "This address is already an admin",
            FailureKind::NotAuthorized => "Your wallet is not authorized for this action",
            FailureKind::PurchaseLimitExceeded => {
                "This purchase exceeds the maximum allowed per user"
            }
            FailureKind::ListingInactive => "This listing is no longer active",
            FailureKind::AssetInactive => "This asset is not currently active",
            FailureKind::Network => "Network error, please try again",
            FailureKind::Reverted => "The transaction was reverted by the contract",
            FailureKind::Unknown => "Transaction failed",
        }
    }

    /// How the caller should react
    pub fn category(&self) -> ErrorCategory {
        match self {
            FailureKind::InsufficientFunds | FailureKind::UserRejected => ErrorCategory::UserAction,
            FailureKind::Network => ErrorCategory::Transient,
            FailureKind::Unknown => ErrorCategory::Internal,
            _ => ErrorCategory::Permanent,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl ContractError {
    /// Classify this error for display
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ContractError::Rpc(_) | ContractError::Timeout(_) => FailureKind::Network,
            ContractError::Reverted(reason) => match classify_failure(reason) {
                FailureKind::Unknown => FailureKind::Reverted,
                kind => kind,
            },
            other => match other.category() {
                ErrorCategory::Transient => FailureKind::Network,
                _ => classify_failure(&other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_classify_known_messages() {
        assert_eq!(
            classify_failure("err: insufficient funds for gas * price + value"),
            FailureKind::InsufficientFunds
        );
        assert_eq!(
            classify_failure("MetaMask Tx Signature: User denied transaction signature."),
            FailureKind::UserRejected
        );
        assert_eq!(
            classify_failure("execution reverted: Already an admin"),
            FailureKind::AlreadyAdmin
        );
        assert_eq!(
            classify_failure("AccessControl: account 0xabc is missing role 0x00"),
            FailureKind::NotAuthorized
        );
        assert_eq!(
            classify_failure("execution reverted: Exceeds max purchase amount"),
            FailureKind::PurchaseLimitExceeded
        );
        assert_eq!(
            classify_failure("execution reverted: something else"),
            FailureKind::Reverted
        );
        assert_eq!(classify_failure("boom"), FailureKind::Unknown);
    }

    #[test]
    fn test_specific_patterns_win_over_generic_revert() {
        let kind = classify_failure("execution reverted: Listing not active");
        assert_eq!(kind, FailureKind::ListingInactive);
    }

    #[test]
    fn test_contract_error_failure_kind() {
        let err = ContractError::Timeout(Duration::from_secs(5));
        assert_eq!(err.failure_kind(), FailureKind::Network);

        let err = ContractError::Reverted("Asset not active".to_string());
        assert_eq!(err.failure_kind(), FailureKind::AssetInactive);

        let err = ContractError::Reverted("0x".to_string());
        assert_eq!(err.failure_kind(), FailureKind::Reverted);
    }

    #[test]
    fn test_failure_categories() {
        assert_eq!(
            FailureKind::InsufficientFunds.category(),
            ErrorCategory::UserAction
        );
        assert_eq!(FailureKind::Network.category(), ErrorCategory::Transient);
        assert_eq!(FailureKind::AlreadyAdmin.category(), ErrorCategory::Permanent);
        assert_eq!(
            FailureKind::AlreadyAdmin.to_string(),
            "This address is already an admin"
        );
    }
}
