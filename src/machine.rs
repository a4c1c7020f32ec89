//! Auction state machine
//!
//! `Uninitialized -> Open -> Closed`, plus deletion as a terminal action.
//! [`approve`] is the approval program: a pure function from the current
//! record and a call to the next record and the inner transactions to issue.
//! [`clear_state`] is the clear program and always approves.

use alloc::vec::Vec;
use odra::prelude::*;

use crate::call::{ApplicationCall, AuctionParams, Call, OnCompletion, Transaction};
use crate::errors::Rejection;
use crate::inner::{self, InnerTxn};
use crate::schema::AuctionRecord;
use crate::validator::{self as check, Guard, INNER_TXN_COST, STATE_WRITE_COST};

/// Slots written when the record is created
const CREATE_WRITES: u32 = 8;
/// Slots written by an accepted bid
const BID_WRITES: u32 = 2;
/// Slots written by a claim
const CLAIM_WRITES: u32 = 1;

/// Host-provided facts about the call being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Latest block timestamp, unix seconds
    pub now: u64,
    /// Account owned by the application
    pub app_address: Address,
    pub budget: u32,
}

/// What happens to the record once the call commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Store(AuctionRecord),
    Destroy,
}

/// Approved call: next record plus inner transactions in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub next: Next,
    pub effects: Vec<InnerTxn>,
}

impl Outcome {
    fn store(record: AuctionRecord) -> Self {
        Self {
            next: Next::Store(record),
            effects: Vec::new(),
        }
    }

    /// Record after the call, `None` when destroyed
    pub fn record(&self) -> Option<&AuctionRecord> {
        match &self.next {
            Next::Store(record) => Some(record),
            Next::Destroy => None,
        }
    }
}

/// Runs a raw application call through the clear or approval program.
pub fn dispatch(
    current: Option<&AuctionRecord>,
    txn: &ApplicationCall,
    group: &[Transaction],
    ctx: &Context,
) -> Result<Outcome, Rejection> {
    if txn.app_id.is_some() && txn.on_completion == OnCompletion::ClearState {
        let record = current.ok_or(Rejection::NotCreated)?;
        return Ok(clear_state(record));
    }
    let call = Call::decode(txn, group)?;
    approve(current, &call, ctx)
}

/// Clear program.
pub fn clear_state(current: &AuctionRecord) -> Outcome {
    Outcome::store(current.clone())
}

/// Approval program.
pub fn approve(
    current: Option<&AuctionRecord>,
    call: &Call,
    ctx: &Context,
) -> Result<Outcome, Rejection> {
    let mut guard = Guard::new(ctx.budget);
    let record = match (current, call) {
        (None, Call::Create { sender, params }) => return create(*sender, params, &mut guard),
        (Some(_), Call::Create { .. }) => return Err(Rejection::AlreadyCreated),
        (None, _) => return Err(Rejection::NotCreated),
        (Some(record), _) => record,
    };

    match call {
        Call::Create { .. } => Err(Rejection::AlreadyCreated),
        Call::Bid { sender, payment } => bid(record, *sender, payment, ctx, &mut guard),
        Call::Claim { sender } => claim(record, *sender, ctx, &mut guard),
        Call::OptIn { .. } | Call::CloseOut { .. } => Ok(Outcome::store(record.clone())),
        Call::UpdateApplication { sender } => {
            guard.require(check::is_seller(record, *sender), Rejection::NotSeller)?;
            Ok(Outcome::store(record.clone()))
        }
        // Closure is not required: an open auction can be destroyed by its
        // seller, stranding the standing bid in the application account.
        Call::DeleteApplication { sender } => {
            guard.require(check::is_seller(record, *sender), Rejection::NotSeller)?;
            Ok(Outcome {
                next: Next::Destroy,
                effects: Vec::new(),
            })
        }
    }
}

fn create(seller: Address, params: &AuctionParams, guard: &mut Guard) -> Result<Outcome, Rejection> {
    guard.charge(STATE_WRITE_COST * CREATE_WRITES)?;
    Ok(Outcome::store(AuctionRecord::new(seller, params)))
}

fn bid(
    record: &AuctionRecord,
    sender: Address,
    payment: &Transaction,
    ctx: &Context,
    guard: &mut Guard,
) -> Result<Outcome, Rejection> {
    guard.require(check::is_open(record), Rejection::AuctionClosed)?;
    guard.require(
        check::bidding_started(record, ctx.now),
        Rejection::BiddingNotStarted,
    )?;
    guard.require(
        check::bidding_not_ended(record, ctx.now),
        Rejection::BiddingEnded,
    )?;
    let payment = guard.bid_payment(payment, sender, ctx.app_address)?;
    guard.require(
        check::outbids(record, payment.amount),
        Rejection::BidNotAboveHighest,
    )?;
    guard.require(
        check::meets_reserve(record, payment.amount),
        Rejection::BidBelowReserve,
    )?;

    // Refund is built from the standing bid before it is replaced.
    let mut effects = Vec::new();
    if let Some(refund) = inner::refund(record, ctx.app_address) {
        guard.charge(INNER_TXN_COST)?;
        effects.push(refund);
    }

    guard.charge(STATE_WRITE_COST * BID_WRITES)?;
    let mut next = record.clone();
    next.highest_bid = payment.amount;
    next.highest_bidder = Some(sender);

    Ok(Outcome {
        next: Next::Store(next),
        effects,
    })
}

fn claim(
    record: &AuctionRecord,
    sender: Address,
    ctx: &Context,
    guard: &mut Guard,
) -> Result<Outcome, Rejection> {
    guard.require(check::is_open(record), Rejection::AuctionClosed)?;
    guard.require(
        check::claimable_at(record, ctx.now),
        Rejection::AuctionStillRunning,
    )?;
    guard.require(
        check::is_highest_bidder(record, sender),
        Rejection::NotHighestBidder,
    )?;

    let settlement = inner::settlement(record, ctx.app_address)?;
    guard.charge(INNER_TXN_COST * settlement.len() as u32)?;

    guard.charge(STATE_WRITE_COST * CLAIM_WRITES)?;
    let mut next = record.clone();
    next.closed = true;

    Ok(Outcome {
        next: Next::Store(next),
        effects: settlement.to_vec(),
    })
}
