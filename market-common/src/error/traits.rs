//! Error classification traits.
//!
//! These traits allow errors to self-describe their characteristics so the
//! caller can choose between showing a "try again" notice, a configuration
//! problem, or a plain rejection. Nothing in this crate retries on its own.

use super::common::*;

/// Classification of error types for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient errors that may resolve if the user tries again (network issues, timeouts)
    Transient,
    /// Permanent errors that won't resolve on another attempt (reverts, invalid data)
    Permanent,
    /// Configuration errors (missing config, invalid settings, no connection)
    Configuration,
    /// The user has to act first (fund the wallet, approve the request)
    UserAction,
    /// Internal errors (bugs, unexpected state)
    Internal,
}

/// Trait for errors that can classify themselves.
pub trait ErrorClassification {
    /// Returns the category of this error
    fn category(&self) -> ErrorCategory;

    /// Returns true if this error is transient and may succeed on another attempt
    fn is_transient(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transient)
    }

    /// Returns true if this error is permanent
    fn is_permanent(&self) -> bool {
        matches!(self.category(), ErrorCategory::Permanent)
    }
}

impl ErrorClassification for ContractError {
    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotConnected => ErrorCategory::Configuration,
            ContractError::Rpc(_) => ErrorCategory::Transient,
            ContractError::Timeout(_) => ErrorCategory::Transient,
            ContractError::Reverted(_) => ErrorCategory::Permanent,
            ContractError::Decode(_) => ErrorCategory::Internal, // ABI mismatch
            ContractError::Entity(err) => err.category(),
        }
    }
}

impl ErrorClassification for ConfigurationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl ErrorClassification for EntityError {
    fn category(&self) -> ErrorCategory {
        match self {
            EntityError::NotFound { .. } => ErrorCategory::Permanent,
            EntityError::Invalid { .. } => ErrorCategory::Internal,
            EntityError::InvalidState { .. } => ErrorCategory::Permanent,
        }
    }
}

impl ErrorClassification for SerializationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Permanent // Bad data won't change on another attempt
    }
}
