//! Marketplace Auction - single-lot auction program for a tokenized marketplace
//!
//! This crate provides:
//! - A pure auction state machine (create, bid, claim, opt-in, close-out,
//!   update, delete) returning its inner transfers as data
//! - `AuctionApp`, the Casper contract hosting that state machine
//! - `AssetRegistry`, the asset ledger the auctioned lots live in
//! - An in-memory ledger that executes atomic groups against the program

#![no_std]

extern crate alloc;

pub mod asset_registry;
pub mod auction_app;
pub mod call;
pub mod errors;
pub mod events;
pub mod inner;
pub mod ledger;
pub mod machine;
pub mod schema;
pub mod validator;

#[cfg(not(target_arch = "wasm32"))]
pub mod deployment;

// Re-export main types for external use
pub use asset_registry::{AssetParams, AssetRegistry};
pub use auction_app::AuctionApp;
pub use call::{AuctionParams, Call};
pub use errors::*;
pub use events::*;
pub use schema::AuctionRecord;

// Re-export generated types only when not building for wasm32 target
#[cfg(not(target_arch = "wasm32"))]
pub use asset_registry::AssetRegistryHostRef;
#[cfg(not(target_arch = "wasm32"))]
pub use auction_app::{AuctionAppHostRef, AuctionAppInitArgs};

#[cfg(test)]
pub(crate) mod test_support {
    use odra::casper_types::account::AccountHash;
    use odra::prelude::Address;

    pub fn account(tag: u8) -> Address {
        Address::Account(AccountHash::new([tag; 32]))
    }
}
