//! Global state schema of an auction instance
//!
//! One [`AuctionRecord`] per deployed instance. The record is also exposed as
//! a key/value view over the fixed global slots so that any reader sees the
//! same named variables the program writes.

use alloc::collections::BTreeMap;
use odra::prelude::*;

use crate::call::AuctionParams;

pub const SELLER_KEY: &str = "seller";
pub const ASSET_ID_KEY: &str = "asset_id";
pub const START_KEY: &str = "start";
pub const END_KEY: &str = "end";
pub const RESERVE_KEY: &str = "reserve";
pub const HIGHEST_BID_KEY: &str = "highest_bid";
pub const HIGHEST_BIDDER_KEY: &str = "highest_bidder";
pub const CLOSED_KEY: &str = "closed";

/// Number of integer and byte-slice slots reserved for a state namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSchema {
    pub num_uints: u8,
    pub num_byte_slices: u8,
}

/// Declared at creation. One integer slot is spare.
pub const GLOBAL_SCHEMA: StateSchema = StateSchema {
    num_uints: 7,
    num_byte_slices: 2,
};

/// No per-account state is tracked.
pub const LOCAL_SCHEMA: StateSchema = StateSchema {
    num_uints: 0,
    num_byte_slices: 0,
};

/// Value held by a single global slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateValue {
    Uint(u64),
    /// Byte-slice slot holding an account; `None` is the zero address
    Account(Option<Address>),
}

impl StateValue {
    pub fn is_byte_slice(&self) -> bool {
        matches!(self, StateValue::Account(_))
    }
}

/// The auction record persisted in global state
#[odra::odra_type]
pub struct AuctionRecord {
    pub seller: Address,
    pub asset_id: u64,
    pub start: u64,
    pub end: u64,
    pub reserve: u64,
    pub highest_bid: u64,
    pub highest_bidder: Option<Address>,
    pub closed: bool,
}

impl AuctionRecord {
    /// Fresh record for a creation call: no bids, not closed.
    pub fn new(seller: Address, params: &AuctionParams) -> Self {
        Self {
            seller,
            asset_id: params.asset_id,
            start: params.start,
            end: params.end,
            reserve: params.reserve,
            highest_bid: 0,
            highest_bidder: None,
            closed: false,
        }
    }

    pub fn has_bid(&self) -> bool {
        self.highest_bid > 0
    }

    /// Key/value view of the global slots
    pub fn global_state(&self) -> BTreeMap<&'static str, StateValue> {
        let mut state = BTreeMap::new();
        state.insert(SELLER_KEY, StateValue::Account(Some(self.seller)));
        state.insert(ASSET_ID_KEY, StateValue::Uint(self.asset_id));
        state.insert(START_KEY, StateValue::Uint(self.start));
        state.insert(END_KEY, StateValue::Uint(self.end));
        state.insert(RESERVE_KEY, StateValue::Uint(self.reserve));
        state.insert(HIGHEST_BID_KEY, StateValue::Uint(self.highest_bid));
        state.insert(HIGHEST_BIDDER_KEY, StateValue::Account(self.highest_bidder));
        state.insert(CLOSED_KEY, StateValue::Uint(u64::from(self.closed)));
        state
    }
}

/// Checks that a key/value view fits the declared slot counts.
pub fn fits_schema(state: &BTreeMap<&'static str, StateValue>, schema: StateSchema) -> bool {
    let byte_slices = state.values().filter(|value| value.is_byte_slice()).count();
    let uints = state.len() - byte_slices;
    uints <= usize::from(schema.num_uints) && byte_slices <= usize::from(schema.num_byte_slices)
}
