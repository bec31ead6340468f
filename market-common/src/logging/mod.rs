//! Logging setup shared by the library and the CLI.
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: standard tracing filter (e.g. `info`, `market_common=debug`)
//! - `LOG_FORMAT`: `pretty` (default), `compact`, or `json`
//! - `LOG_TIMESTAMPS`: `local` (default), `utc`, or `none`
//! - `LOG_LEVEL`: fallback level when `RUST_LOG` is unset
//! - `LOG_LOCATION`, `LOG_THREAD_IDS`: `true`/`1` to include them
//! - `LOG_APP_NAME`: `app` field of JSON lines
//!
//! ```rust,ignore
//! use market_common::logging::{init_logging, LogConfig};
//!
//! init_logging(LogConfig::from_env().with_app_name("market"))?;
//! ```

mod config;
mod json_layer;

pub use config::{init_logging, LogConfig, LogFormat, TimestampFormat, DEFAULT_APP_NAME};
pub use json_layer::JsonLogEvent;
