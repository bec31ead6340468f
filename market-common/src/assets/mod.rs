//! Marketplace records as read from the contracts.
//!
//! Raw records mirror what the contract returns: integer amounts, wei-scaled
//! prices and a numeric model tag. They decode into typed records where the
//! ownership representation is a tagged union:
//!
//! - [`AssetModel::Fixed`]: whole shares out of a total supply, priced per share
//! - [`AssetModel::Weighted`]: weight units (`1e16` = 1%) of a total value,
//!   priced per percentage point
//!
//! Amounts stay in contract units (`u128`) everywhere; [`ModelKind`] converts
//! them to display quantities.

mod address;
mod asset;
mod listing;
pub mod raw_amount;
mod types;

pub use address::Address;
pub use asset::{Asset, AssetModel, PurchaseLimits, RawAsset};
pub use listing::{Listing, Position, RawListing};
pub use types::{AssetId, ModelKind};
