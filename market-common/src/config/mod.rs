//! Layered application settings.
//!
//! Sources, later ones winning:
//!
//! 1. `config/default.toml`
//! 2. `config/{RUN_MODE}.toml` (`RUN_MODE` defaults to `development`)
//! 3. `config/local.toml`
//! 4. `MARKET__*` environment variables, e.g. `MARKET__DISPLAY__USD_RATE=0.07`
//!
//! `MARKET_CONFIG_DIR` moves the directory. Every file is optional and every
//! field has a default.

mod settings;

pub use settings::{
    DisplaySettings, GovernanceSettings, NetworkSettings, PollingSettings, Settings,
    ENV_PREFIX,
};
