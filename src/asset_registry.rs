//! AssetRegistry - standard assets with numeric ids
//!
//! Lots sold by the auction are units of an asset minted here. The creator
//! holds the whole supply and acts as freeze manager; a frozen holding can
//! neither send nor receive.

use odra::prelude::*;

use crate::errors::AssetError;
use crate::events::{AssetCreated, AssetFreezeChanged, AssetTransferred};

/// Parameters fixed when an asset is created
#[odra::odra_type]
pub struct AssetParams {
    pub creator: Address,
    pub freeze_manager: Address,
    pub asset_name: String,
    pub unit_name: String,
    pub total: u64,
    pub decimals: u8,
    pub url: String,
}

/// AssetRegistry - holdings ledger for marketplace assets
#[odra::module]
pub struct AssetRegistry {
    asset_counter: Var<u64>,
    assets: Mapping<u64, AssetParams>,
    balances: Mapping<(u64, Address), u64>,
    frozen: Mapping<(u64, Address), bool>,
}

#[odra::module]
impl AssetRegistry {
    pub fn init(&mut self) {
        self.asset_counter.set(0);
    }

    /// Mint a new asset; the caller receives the whole supply.
    ///
    /// # Returns
    /// Id of the new asset, starting at 1
    pub fn create_asset(
        &mut self,
        asset_name: String,
        unit_name: String,
        total: u64,
        decimals: u8,
        url: String,
    ) -> u64 {
        let creator = self.env().caller();
        let asset_id = self.asset_counter.get_or_default() + 1;
        self.asset_counter.set(asset_id);

        self.assets.set(
            &asset_id,
            AssetParams {
                creator,
                freeze_manager: creator,
                asset_name,
                unit_name,
                total,
                decimals,
                url,
            },
        );
        self.balances.set(&(asset_id, creator), total);

        self.env().emit_event(AssetCreated {
            asset_id,
            creator,
            total,
        });

        asset_id
    }

    /// Move units from the caller to `to`.
    pub fn transfer(&mut self, asset_id: u64, to: Address, amount: u64) {
        self.require_asset(asset_id);
        let from = self.env().caller();

        if self.is_frozen(asset_id, from) || self.is_frozen(asset_id, to) {
            self.env().revert(AssetError::AssetFrozen);
        }

        let from_balance = self.balance_of(asset_id, from);
        if from_balance < amount {
            self.env().revert(AssetError::InsufficientAssetBalance);
        }

        if from != to {
            let to_balance = self
                .balance_of(asset_id, to)
                .checked_add(amount)
                .unwrap_or_revert_with(&self.env(), AssetError::BalanceOverflow);
            self.balances.set(&(asset_id, from), from_balance - amount);
            self.balances.set(&(asset_id, to), to_balance);
        }

        self.env().emit_event(AssetTransferred {
            asset_id,
            from,
            to,
            amount,
        });
    }

    /// Freeze or unfreeze a holding (freeze manager only)
    pub fn set_frozen(&mut self, asset_id: u64, account: Address, frozen: bool) {
        let params = self.require_asset(asset_id);
        if self.env().caller() != params.freeze_manager {
            self.env().revert(AssetError::NotFreezeManager);
        }
        self.frozen.set(&(asset_id, account), frozen);
        self.env().emit_event(AssetFreezeChanged {
            asset_id,
            account,
            frozen,
        });
    }

    // ============ VIEW FUNCTIONS ============

    pub fn balance_of(&self, asset_id: u64, owner: Address) -> u64 {
        self.balances.get(&(asset_id, owner)).unwrap_or_default()
    }

    pub fn is_frozen(&self, asset_id: u64, account: Address) -> bool {
        self.frozen.get(&(asset_id, account)).unwrap_or_default()
    }

    pub fn get_asset(&self, asset_id: u64) -> Option<AssetParams> {
        self.assets.get(&asset_id)
    }

    pub fn asset_count(&self) -> u64 {
        self.asset_counter.get_or_default()
    }

    fn require_asset(&self, asset_id: u64) -> AssetParams {
        self.assets
            .get(&asset_id)
            .unwrap_or_revert_with(&self.env(), AssetError::UnknownAsset)
    }
}
