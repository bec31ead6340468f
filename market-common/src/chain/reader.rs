use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::assets::{Address, Asset, AssetId, Listing, Position};
use crate::error::ContractError;
use crate::governance::Proposal;

/// Read access to marketplace contract state.
///
/// Implementations decode raw contract records into typed values. Missing
/// records are reported as [`ContractError::Entity`].
#[async_trait]
pub trait MarketplaceReader: Send + Sync {
    async fn get_asset(&self, id: AssetId) -> Result<Asset, ContractError>;

    async fn list_assets(&self) -> Result<Vec<Asset>, ContractError>;

    /// Holding of `owner` in one asset; zero when there is none
    async fn get_position(&self, asset_id: AssetId, owner: &Address) -> Result<Position, ContractError>;

    async fn positions_of(&self, owner: &Address) -> Result<Vec<Position>, ContractError>;

    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError>;

    async fn proposals(&self, asset_id: AssetId) -> Result<Vec<Proposal>, ContractError>;

    /// Native token balance in whole tokens
    async fn native_balance(&self, owner: &Address) -> Result<Decimal, ContractError>;
}
