//! Events for the marketplace auction (CEP-88 compliant)

use odra::prelude::*;

/// Emitted when the auction record is created
#[odra::event]
pub struct AuctionCreated {
    pub seller: Address,
    pub asset_id: u64,
    pub start: u64,
    pub end: u64,
    pub reserve: u64,
}

/// Emitted when a bid becomes the highest bid
#[odra::event]
pub struct BidPlaced {
    pub bidder: Address,
    pub amount: u64,
}

/// Emitted when an outbid bidder gets their bid back
#[odra::event]
pub struct BidRefunded {
    pub bidder: Address,
    pub amount: u64,
}

/// Emitted when the winner claims the asset and the seller is paid
#[odra::event]
pub struct AuctionSettled {
    pub winner: Address,
    pub seller: Address,
    pub asset_id: u64,
    pub amount: u64,
}

#[odra::event]
pub struct AccountOptedIn {
    pub account: Address,
}

#[odra::event]
pub struct AccountClosedOut {
    pub account: Address,
}

/// Emitted when the seller approves an application update
#[odra::event]
pub struct ApplicationUpdateApproved {
    pub by: Address,
}

/// Emitted when the seller deletes the application
#[odra::event]
pub struct ApplicationDeleted {
    pub by: Address,
    pub was_closed: bool,
}

// ============ ASSET REGISTRY EVENTS ============

#[odra::event]
pub struct AssetCreated {
    pub asset_id: u64,
    pub creator: Address,
    pub total: u64,
}

#[odra::event]
pub struct AssetTransferred {
    pub asset_id: u64,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

#[odra::event]
pub struct AssetFreezeChanged {
    pub asset_id: u64,
    pub account: Address,
    pub frozen: bool,
}
