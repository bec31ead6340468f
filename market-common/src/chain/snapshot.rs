use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use super::reader::MarketplaceReader;
use crate::assets::{raw_amount, Address, Asset, AssetId, Listing, Position, RawAsset, RawListing};
use crate::config::NetworkSettings;
use crate::error::{ConfigurationError, ContractError, EntityError, SerializationError};
use crate::governance::{Proposal, RawProposal};
use crate::units::{self, TOKEN_DECIMALS};

/// Native token balance of an account, in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeBalance {
    pub owner: Address,
    #[serde(with = "raw_amount")]
    pub wei: u128,
}

/// Contract state captured as raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Chain the records were read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Marketplace contract the records were read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<Address>,
    #[serde(default)]
    pub assets: Vec<RawAsset>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub listings: Vec<RawListing>,
    #[serde(default)]
    pub proposals: Vec<RawProposal>,
    #[serde(default)]
    pub balances: Vec<NativeBalance>,
}

impl ChainSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SerializationError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            assets = snapshot.assets.len(),
            listings = snapshot.listings.len(),
            "Loaded chain snapshot"
        );
        Ok(snapshot)
    }

    /// Reject a snapshot taken from another chain or marketplace contract.
    ///
    /// Origins the snapshot does not record are accepted.
    pub fn ensure_origin(&self, network: &NetworkSettings) -> Result<(), ConfigurationError> {
        if let Some(chain_id) = self.chain_id {
            if chain_id != network.chain_id {
                return Err(ConfigurationError::InvalidValue {
                    field: "network.chain_id".to_string(),
                    reason: format!(
                        "snapshot was taken on chain {}, settings expect {}",
                        chain_id, network.chain_id
                    ),
                });
            }
        }
        if let (Some(recorded), Some(expected)) = (&self.marketplace, network.marketplace()?) {
            if *recorded != expected {
                return Err(ConfigurationError::InvalidValue {
                    field: "network.marketplace_address".to_string(),
                    reason: format!(
                        "snapshot was taken from marketplace {}, settings expect {}",
                        recorded, expected
                    ),
                });
            }
        }
        Ok(())
    }
}

/// [`MarketplaceReader`] over an in-memory snapshot.
///
/// The snapshot can be replaced or patched while readers hold the reader.
#[derive(Debug, Default)]
pub struct SnapshotReader {
    state: RwLock<ChainSnapshot>,
}

impl SnapshotReader {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub fn replace(&self, snapshot: ChainSnapshot) {
        *self.state.write() = snapshot;
    }

    /// Set the native balance of `owner`, adding an entry if needed.
    pub fn set_balance(&self, owner: &Address, wei: u128) {
        let mut state = self.state.write();
        match state.balances.iter_mut().find(|b| &b.owner == owner) {
            Some(balance) => balance.wei = wei,
            None => state.balances.push(NativeBalance {
                owner: owner.clone(),
                wei,
            }),
        }
        debug!(owner = %owner, wei, "Balance updated");
    }
}

#[async_trait]
impl MarketplaceReader for SnapshotReader {
    async fn get_asset(&self, id: AssetId) -> Result<Asset, ContractError> {
        let raw = self
            .state
            .read()
            .assets
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| EntityError::not_found("Asset", id))?;
        Asset::try_from(raw)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, ContractError> {
        let raws = self.state.read().assets.clone();
        raws.into_iter().map(Asset::try_from).collect()
    }

    async fn get_position(&self, asset_id: AssetId, owner: &Address) -> Result<Position, ContractError> {
        let amount = self
            .state
            .read()
            .positions
            .iter()
            .filter(|p| p.asset_id == asset_id && &p.owner == owner)
            .fold(0u128, |acc, p| acc.saturating_add(p.amount));

        Ok(Position {
            asset_id,
            owner: owner.clone(),
            amount,
        })
    }

    async fn positions_of(&self, owner: &Address) -> Result<Vec<Position>, ContractError> {
        Ok(self
            .state
            .read()
            .positions
            .iter()
            .filter(|p| &p.owner == owner)
            .cloned()
            .collect())
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError> {
        let raws: Vec<RawListing> = self
            .state
            .read()
            .listings
            .iter()
            .filter(|l| l.active)
            .cloned()
            .collect();
        // One bad record should not hide the rest of the market
        Ok(raws
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id;
                Listing::try_from(raw)
                    .map_err(|e| warn!(listing_id = id, error = %e, "Dropping undecodable listing"))
                    .ok()
            })
            .collect())
    }

    async fn proposals(&self, asset_id: AssetId) -> Result<Vec<Proposal>, ContractError> {
        let raws: Vec<RawProposal> = self
            .state
            .read()
            .proposals
            .iter()
            .filter(|p| p.asset_id == asset_id)
            .cloned()
            .collect();
        raws.into_iter().map(Proposal::try_from).collect()
    }

    async fn native_balance(&self, owner: &Address) -> Result<Decimal, ContractError> {
        let wei = self
            .state
            .read()
            .balances
            .iter()
            .find(|b| &b.owner == owner)
            .map_or(0, |b| b.wei);
        units::format_units(wei, TOKEN_DECIMALS)
            .map_err(|e| ContractError::Decode(format!("balance of {}: {}", owner, e)))
    }
}
