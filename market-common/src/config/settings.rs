use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use crate::assets::Address;
use crate::error::ConfigurationError;
use crate::validation::{ValidationError, ValidationErrorCode, ValidationResult, ValidationWarning};

/// Prefix of environment overrides (`MARKET__NETWORK__CHAIN_ID`)
pub const ENV_PREFIX: &str = "MARKET";

const MAX_SYMBOL_LEN: usize = 11;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub governance: GovernanceSettings,
}

/// Chain connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Chain the snapshot must come from
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Deployed marketplace contract
    #[serde(default)]
    pub marketplace_address: Option<String>,
    /// JSON snapshot of chain state read by the CLI
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_chain_id() -> u64 {
    31337
}

fn default_snapshot_path() -> String {
    "snapshot.json".to_string()
}

impl NetworkSettings {
    /// Parsed marketplace address, if one is configured.
    pub fn marketplace(&self) -> Result<Option<Address>, ConfigurationError> {
        self.marketplace_address
            .as_deref()
            .map(|raw| {
                Address::parse(raw).map_err(|e| ConfigurationError::InvalidValue {
                    field: "network.marketplace_address".to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            marketplace_address: None,
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// How amounts are shown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
    /// Static USD price of one token
    #[serde(default = "default_usd_rate")]
    pub usd_rate: Decimal,
    /// Content gateway for asset images
    #[serde(default = "default_gateway")]
    pub gateway: String,
}

fn default_token_symbol() -> String {
    "OPN".to_string()
}

fn default_usd_rate() -> Decimal {
    Decimal::new(5, 2)
}

fn default_gateway() -> String {
    "https://gateway.pinata.cloud/ipfs".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            token_symbol: default_token_symbol(),
            usd_rate: default_usd_rate(),
            gateway: default_gateway(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Seconds between native balance refreshes
    #[serde(default = "default_balance_interval")]
    pub balance_interval_secs: u64,
}

fn default_balance_interval() -> u64 {
    10
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            balance_interval_secs: default_balance_interval(),
        }
    }
}

impl PollingSettings {
    pub fn balance_interval(&self) -> Duration {
        Duration::from_secs(self.balance_interval_secs)
    }
}

/// Bounds for proposal voting periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceSettings {
    #[serde(default = "default_min_voting_days")]
    pub min_voting_days: u32,
    #[serde(default = "default_max_voting_days")]
    pub max_voting_days: u32,
}

fn default_min_voting_days() -> u32 {
    1
}

fn default_max_voting_days() -> u32 {
    30
}

impl Default for GovernanceSettings {
    fn default() -> Self {
        Self {
            min_voting_days: default_min_voting_days(),
            max_voting_days: default_max_voting_days(),
        }
    }
}

impl GovernanceSettings {
    pub fn voting_days(&self) -> RangeInclusive<u32> {
        self.min_voting_days..=self.max_voting_days
    }
}

impl Settings {
    /// Load from `MARKET_CONFIG_DIR` (default `config`) and the environment.
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = std::env::var("MARKET_CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from(Path::new(&config_dir), &run_mode)
    }

    /// Load from an explicit directory and run mode.
    pub fn load_from(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigurationError> {
        let s = Config::builder()
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(File::from(config_dir.join(run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::from(config_dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// [`Settings::load`], rejecting settings that fail validation.
    pub fn load_validated() -> Result<Self, ConfigurationError> {
        let settings = Self::load()?;
        settings.ensure_valid()?;
        Ok(settings)
    }

    /// Turn the first validation error into a [`ConfigurationError`].
    pub fn ensure_valid(&self) -> Result<(), ConfigurationError> {
        match self.validate().errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(ConfigurationError::InvalidValue {
                field: error.field,
                reason: error.message,
            }),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        result.merge(self.validate_network());
        result.merge(self.validate_display());
        result.merge(self.validate_polling());
        result.merge(self.validate_governance());
        result
    }

    fn validate_network(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let network = &self.network;

        if network.chain_id == 0 {
            result.add_error(ValidationError::new(
                "network.chain_id",
                "Chain id must be greater than 0",
                ValidationErrorCode::OutOfRange,
            ));
        }
        if let Some(address) = &network.marketplace_address {
            if let Err(e) = Address::parse(address) {
                result.add_error(ValidationError::new(
                    "network.marketplace_address",
                    e.to_string(),
                    ValidationErrorCode::InvalidFormat,
                ));
            }
        } else {
            result.add_warning(ValidationWarning::new(
                "network.marketplace_address",
                "No marketplace contract configured",
            ));
        }
        if network.snapshot_path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "network.snapshot_path",
                "Snapshot path is required",
                ValidationErrorCode::Required,
            ));
        }

        result
    }

    fn validate_display(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let display = &self.display;

        let symbol = display.token_symbol.trim();
        if symbol.is_empty() {
            result.add_error(ValidationError::new(
                "display.token_symbol",
                "Token symbol is required",
                ValidationErrorCode::Required,
            ));
        } else if symbol.len() > MAX_SYMBOL_LEN {
            result.add_error(ValidationError::new(
                "display.token_symbol",
                format!("Token symbol must be at most {} characters", MAX_SYMBOL_LEN),
                ValidationErrorCode::TooLong,
            ));
        }
        if display.usd_rate < Decimal::ZERO {
            result.add_error(ValidationError::new(
                "display.usd_rate",
                "USD rate cannot be negative",
                ValidationErrorCode::OutOfRange,
            ));
        } else if display.usd_rate.is_zero() {
            result.add_warning(ValidationWarning::new(
                "display.usd_rate",
                "USD rate is 0; USD estimates will show $0.00",
            ));
        }
        if !(display.gateway.starts_with("https://") || display.gateway.starts_with("http://")) {
            result.add_error(ValidationError::new(
                "display.gateway",
                format!("'{}' is not an http(s) URL", display.gateway),
                ValidationErrorCode::InvalidFormat,
            ));
        }

        result
    }

    fn validate_polling(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        if self.polling.balance_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "polling.balance_interval_secs",
                "Balance interval must be at least 1 second",
                ValidationErrorCode::OutOfRange,
            ));
        }
        result
    }

    fn validate_governance(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let governance = &self.governance;

        if governance.min_voting_days == 0 {
            result.add_error(ValidationError::new(
                "governance.min_voting_days",
                "Minimum voting period must be at least 1 day",
                ValidationErrorCode::OutOfRange,
            ));
        }
        if governance.max_voting_days < governance.min_voting_days {
            result.add_error(ValidationError::new(
                "governance.max_voting_days",
                "Maximum voting period cannot be shorter than the minimum",
                ValidationErrorCode::Inconsistent,
            ));
        }

        result
    }
}
