//! Test utilities and helpers for marketplace auction tests

#![allow(dead_code)]

use odra::casper_types::account::AccountHash;
use odra::casper_types::U512;
use odra::host::{HostEnv, HostRef};
use odra::prelude::*;
use odra::prelude::OdraResult;

use marketplace_auction::deployment::{deploy_auction, deploy_registry};
use marketplace_auction::ledger::Ledger;
use marketplace_auction::{AssetRegistryHostRef, AuctionAppHostRef, AuctionParams};

/// Constants for testing
pub const MILLIS_PER_SECOND: u64 = 1000;
pub const START_OFFSET: u64 = 1000; // seconds after setup
pub const END_OFFSET: u64 = 2000;
pub const RESERVE: u64 = 50;
pub const FUNDING: u64 = 1_000_000; // ledger genesis allocation per account

/// A deployed auction with its registry and a handful of accounts
pub struct Market {
    pub env: HostEnv,
    pub auction: AuctionAppHostRef,
    pub registry: AssetRegistryHostRef,
    pub seller: Address,
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
    pub asset_id: u64,
    /// Block time at setup, unix seconds
    pub t0: u64,
}

impl Market {
    /// Move the clock to `offset` seconds after setup.
    pub fn at(&self, offset: u64) {
        advance_to(&self.env, self.t0 + offset);
    }

    pub fn bid(&mut self, bidder: Address, amount: u64) -> OdraResult<()> {
        self.env.set_caller(bidder);
        self.auction.with_tokens(U512::from(amount)).try_bid()
    }

    pub fn claim(&mut self, caller: Address) -> OdraResult<()> {
        self.env.set_caller(caller);
        self.auction.try_claim()
    }

    pub fn balance(&self, account: Address) -> U512 {
        self.env.balance_of(&account)
    }

    pub fn auction_balance(&self) -> U512 {
        self.env.balance_of(&self.auction.address())
    }
}

/// Registry with one single-unit asset, an auction over it holding the unit.
pub fn setup() -> Market {
    let mut market = setup_without_deposit();
    let auction_address = market.auction.address();
    market.env.set_caller(market.seller);
    market.registry.transfer(market.asset_id, auction_address, 1);
    market
}

/// Same as [`setup`] but the seller keeps the unit.
pub fn setup_without_deposit() -> Market {
    let env = odra_test::env();

    let seller = env.get_account(0);
    let alice = env.get_account(1);
    let bob = env.get_account(2);
    let carol = env.get_account(3);

    env.set_caller(seller);
    let mut registry = deploy_registry(&env);
    let asset_id = registry.create_asset(
        "Harbor Loft Deed".to_string(),
        "DEED".to_string(),
        1,
        0,
        "ipfs://harbor-loft".to_string(),
    );

    let t0 = env.block_time() / MILLIS_PER_SECOND;
    let params = AuctionParams {
        asset_id,
        start: t0 + START_OFFSET,
        end: t0 + END_OFFSET,
        reserve: RESERVE,
    };
    let auction = deploy_auction(&env, registry.address(), &params);

    Market {
        env,
        auction,
        registry,
        seller,
        alice,
        bob,
        carol,
        asset_id,
        t0,
    }
}

/// Advance the block clock to `seconds` (unix seconds); never moves back.
pub fn advance_to(env: &HostEnv, seconds: u64) {
    let target = seconds * MILLIS_PER_SECOND;
    let now = env.block_time();
    if target > now {
        env.advance_block_time(target - now);
    }
}

/// Deterministic address for ledger tests
pub fn account(tag: u8) -> Address {
    Address::Account(AccountHash::new([tag; 32]))
}

/// Ledger with funded accounts 1..=5, where account 1 is the seller
pub fn funded_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    for tag in 1..=5 {
        ledger.fund(account(tag), FUNDING).unwrap();
    }
    ledger
}

/// Seller mints a single-unit asset, deploys an auction over it at
/// `[1000, 2000)` with reserve 50 and deposits the unit.
///
/// Returns `(app_id, asset_id)`.
pub fn ledger_auction(ledger: &mut Ledger) -> (u64, u64) {
    let seller = account(1);
    let (asset_id, _) = ledger
        .create_asset(seller, "Harbor Loft Deed", "DEED", 1, 0, "ipfs://harbor-loft")
        .unwrap();
    let params = AuctionParams {
        asset_id,
        start: 1000,
        end: 2000,
        reserve: RESERVE,
    };
    let (app_id, _) = ledger.deploy_auction(seller, &params).unwrap();
    let app_address = ledger.app_address(app_id).unwrap();
    ledger
        .transfer_asset(seller, app_address, asset_id, 1)
        .unwrap();
    (app_id, asset_id)
}
