// market-common: ownership accounting for the tokenized asset marketplace
// Used by market-cli and by any front end that renders marketplace state

pub mod assets;
pub mod chain;
pub mod config;
pub mod error;
pub mod governance;
pub mod limits;
pub mod logging;
pub mod stats;
pub mod units;
pub mod validation;

pub use assets::{Address, Asset, AssetId, AssetModel, Listing, ModelKind, Position};
pub use limits::{can_purchase, PurchaseCheck};
pub use stats::AssetStats;
