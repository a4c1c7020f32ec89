//! Inner transactions originated by the auction program itself

use odra::prelude::*;

use crate::call::{AssetTransfer, Payment};
use crate::errors::Rejection;
use crate::schema::AuctionRecord;

/// Inner transactions never pay their own fee; the outer group covers it.
pub const INNER_TXN_FEE: u64 = 0;

/// Units of the auctioned asset handed to the winner
pub const LOT_SIZE: u64 = 1;

/// A transfer issued by the application account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerTxn {
    Payment(Payment),
    AssetTransfer(AssetTransfer),
}

impl InnerTxn {
    pub fn receiver(&self) -> Address {
        match self {
            InnerTxn::Payment(payment) => payment.receiver,
            InnerTxn::AssetTransfer(transfer) => transfer.receiver,
        }
    }
}

/// Refund of the standing bid, read before it is overwritten. `None` while
/// nobody has bid.
pub fn refund(record: &AuctionRecord, app_address: Address) -> Option<InnerTxn> {
    if !record.has_bid() {
        return None;
    }
    record.highest_bidder.map(|bidder| {
        InnerTxn::Payment(Payment {
            sender: app_address,
            receiver: bidder,
            amount: record.highest_bid,
            fee: INNER_TXN_FEE,
        })
    })
}

/// Asset to the winner, then proceeds to the seller.
pub fn settlement(record: &AuctionRecord, app_address: Address) -> Result<[InnerTxn; 2], Rejection> {
    let winner = record.highest_bidder.ok_or(Rejection::NotHighestBidder)?;
    Ok([
        InnerTxn::AssetTransfer(AssetTransfer {
            sender: app_address,
            receiver: winner,
            asset_id: record.asset_id,
            amount: LOT_SIZE,
            fee: INNER_TXN_FEE,
        }),
        InnerTxn::Payment(Payment {
            sender: app_address,
            receiver: record.seller,
            amount: record.highest_bid,
            fee: INNER_TXN_FEE,
        }),
    ])
}
