//! Reading marketplace state.
//!
//! [`MarketplaceReader`] is the read surface of the marketplace contracts.
//! [`SnapshotReader`] serves it from a JSON [`ChainSnapshot`]. The helpers in
//! this module combine reads the way the market and portfolio pages do.

mod balance;
mod enrich;
mod reader;
mod snapshot;

pub use balance::{BalanceWatcher, MIN_POLL_INTERVAL};
pub use enrich::{enrich_listings, load_portfolio, EnrichedListing};
pub use reader::MarketplaceReader;
pub use snapshot::{ChainSnapshot, NativeBalance, SnapshotReader};
