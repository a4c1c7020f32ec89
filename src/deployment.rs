//! Deployment adapter
//!
//! Builds the creation arguments of an auction and submits the contracts
//! through any Odra host environment (test VM or livenet).

use alloc::vec::Vec;
use odra::casper_types::bytesrepr::Bytes;
use odra::host::{Deployer, HostEnv, NoArgs};
use odra::prelude::*;

use crate::asset_registry::{AssetRegistry, AssetRegistryHostRef};
use crate::auction_app::{AuctionApp, AuctionAppHostRef, AuctionAppInitArgs};
use crate::call::AuctionParams;

/// Creation arguments in the wire form the contract expects
pub fn creation_args(params: &AuctionParams) -> Vec<Bytes> {
    params.app_args().into_iter().map(Bytes::from).collect()
}

pub fn deploy_registry(env: &HostEnv) -> AssetRegistryHostRef {
    AssetRegistry::deploy(env, NoArgs)
}

/// Deploys an auction; the current caller of `env` becomes the seller.
pub fn deploy_auction(
    env: &HostEnv,
    asset_registry: Address,
    params: &AuctionParams,
) -> AuctionAppHostRef {
    AuctionApp::deploy(
        env,
        AuctionAppInitArgs {
            asset_registry,
            app_args: creation_args(params),
        },
    )
}
