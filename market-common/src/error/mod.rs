//! Consolidated error handling for the marketplace client.
//!
//! This module provides:
//! - Error types shared by every layer (contract reads, config, entities)
//! - Error classification so callers can pick a user-facing reaction
//! - One place where upstream failure messages are mapped to a [`FailureKind`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_common::error::{classify_failure, ErrorClassification};
//!
//! fn report(err: impl ErrorClassification + std::fmt::Display) {
//!     if err.is_transient() {
//!         tracing::warn!("temporary failure: {}", err);
//!     }
//! }
//!
//! let kind = classify_failure("execution reverted: insufficient funds for gas");
//! println!("{}", kind.user_message());
//! ```

mod common;
mod failure;
mod traits;

pub use common::*;
pub use failure::*;
pub use traits::*;
