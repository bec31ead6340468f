//! Common error types shared across the workspace.
//!
//! These error types represent the failure modes of reading contract state,
//! decoding it, and loading configuration. Module-specific errors wrap these
//! using `#[from]`.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the marketplace contracts.
///
/// Use this for every read against a provider and for decoding the values
/// it returns.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ContractError {
    /// No provider or contract handle is available
    #[error("Not connected to the marketplace contract")]
    NotConnected,

    /// RPC call failed before reaching the contract
    #[error("RPC call failed: {0}")]
    Rpc(String),

    /// RPC call did not answer in time
    #[error("RPC call timed out after {0:?}")]
    Timeout(Duration),

    /// The contract rejected the call
    #[error("Contract call reverted: {0}")]
    Reverted(String),

    /// Contract returned data that could not be decoded
    #[error("Failed to decode contract response: {0}")]
    Decode(String),

    /// Requested record does not exist on chain
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// Configuration-related errors.
///
/// Use this for configuration loading, parsing, and validation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Field has invalid value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Configuration sources could not be loaded or parsed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Invalid configuration combination
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Entity-related errors for on-chain records.
///
/// Use this for assets, positions, listings and proposals.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Entity failed to decode into a valid record
    #[error("Invalid {entity_type}: {reason}")]
    Invalid {
        entity_type: &'static str,
        reason: String,
    },

    /// Entity is in wrong state for operation
    #[error("{entity_type} '{id}' is in invalid state: {reason}")]
    InvalidState {
        entity_type: &'static str,
        id: String,
        reason: String,
    },
}

impl EntityError {
    /// Create a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        EntityError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create an Invalid error
    pub fn invalid(entity_type: &'static str, reason: impl Into<String>) -> Self {
        EntityError::Invalid {
            entity_type,
            reason: reason.into(),
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(
        entity_type: &'static str,
        id: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EntityError::InvalidState {
            entity_type,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Serialization and parsing errors.
///
/// Use this for JSON snapshots, drafts and decimal conversions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SerializationError {
    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(String),

    /// Reading the source failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Decimal conversion failed
    #[error("Decimal conversion error: {0}")]
    Decimal(String),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::Io(err.to_string())
    }
}

impl From<rust_decimal::Error> for SerializationError {
    fn from(err: rust_decimal::Error) -> Self {
        SerializationError::Decimal(err.to_string())
    }
}
