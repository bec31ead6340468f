//! Display aggregators.
//!
//! Every card, detail page and portfolio row derives its figures from the
//! same raw fields. [`AssetStats::compute`] is the one place that does it,
//! with the display rounding policy from [`crate::units::round_display`].
//!
//! # Example
//!
//! ```ignore
//! let stats = AssetStats::compute(&asset);
//! println!("{} available", format_percentage(stats.available_percentage));
//! ```

mod asset_stats;
mod views;

pub use asset_stats::{percent_of, AssetStats};
pub use views::{ListingView, PortfolioSummary, PositionView};
