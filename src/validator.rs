//! Guard predicates evaluated before any state mutation
//!
//! The predicates are pure. [`Guard`] runs them against an opcode meter so
//! that every evaluation has a bounded cost.

use odra::prelude::*;

use crate::call::{Payment, Transaction};
use crate::errors::Rejection;
use crate::schema::AuctionRecord;

/// Per-call opcode budget
pub const DEFAULT_OPCODE_BUDGET: u32 = 700;

/// Cost of evaluating one guard
pub const GUARD_COST: u32 = 6;
/// Cost of writing one global slot
pub const STATE_WRITE_COST: u32 = 3;
/// Cost of building and submitting one inner transaction
pub const INNER_TXN_COST: u32 = 40;

pub fn is_open(record: &AuctionRecord) -> bool {
    !record.closed
}

pub fn bidding_started(record: &AuctionRecord, now: u64) -> bool {
    now >= record.start
}

pub fn bidding_not_ended(record: &AuctionRecord, now: u64) -> bool {
    now < record.end
}

/// Claims are accepted from `end` on.
pub fn claimable_at(record: &AuctionRecord, now: u64) -> bool {
    now >= record.end
}

pub fn outbids(record: &AuctionRecord, amount: u64) -> bool {
    amount > record.highest_bid
}

pub fn meets_reserve(record: &AuctionRecord, amount: u64) -> bool {
    amount >= record.reserve
}

pub fn is_highest_bidder(record: &AuctionRecord, account: Address) -> bool {
    record.highest_bidder == Some(account)
}

pub fn is_seller(record: &AuctionRecord, account: Address) -> bool {
    record.seller == account
}

/// Remaining opcode budget of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    remaining: u32,
}

impl Meter {
    pub fn new(budget: u32) -> Self {
        Self { remaining: budget }
    }

    pub fn charge(&mut self, cost: u32) -> Result<(), Rejection> {
        self.remaining = self
            .remaining
            .checked_sub(cost)
            .ok_or(Rejection::BudgetExceeded)?;
        Ok(())
    }
}

/// Evaluates guards in order, stopping at the first failure.
#[derive(Debug)]
pub struct Guard {
    meter: Meter,
}

impl Guard {
    pub fn new(budget: u32) -> Self {
        Self {
            meter: Meter::new(budget),
        }
    }

    pub fn require(&mut self, holds: bool, rejection: Rejection) -> Result<(), Rejection> {
        self.meter.charge(GUARD_COST)?;
        if holds {
            Ok(())
        } else {
            Err(rejection)
        }
    }

    pub fn charge(&mut self, cost: u32) -> Result<(), Rejection> {
        self.meter.charge(cost)
    }

    /// Payment shape of a bid: a payment from the caller to the application
    /// account.
    pub fn bid_payment<'a>(
        &mut self,
        first: &'a Transaction,
        caller: Address,
        app_address: Address,
    ) -> Result<&'a Payment, Rejection> {
        let payment = match first {
            Transaction::Payment(payment) => Some(payment),
            _ => None,
        };
        self.require(payment.is_some(), Rejection::PaymentMissing)?;
        let payment = payment.ok_or(Rejection::PaymentMissing)?;
        self.require(payment.sender == caller, Rejection::PaymentSenderMismatch)?;
        self.require(
            payment.receiver == app_address,
            Rejection::PaymentReceiverMismatch,
        )?;
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{AssetTransfer, AuctionParams};
    use crate::test_support::account;

    fn record() -> AuctionRecord {
        AuctionRecord::new(
            account(1),
            &AuctionParams {
                asset_id: 42,
                start: 1000,
                end: 2000,
                reserve: 50,
            },
        )
    }

    #[test]
    fn test_bidding_window_is_half_open() {
        let record = record();
        assert!(!bidding_started(&record, 999));
        assert!(bidding_started(&record, 1000));
        assert!(bidding_not_ended(&record, 1999));
        assert!(!bidding_not_ended(&record, 2000));
    }

    #[test]
    fn test_claim_window_starts_at_end() {
        let record = record();
        assert!(!claimable_at(&record, 1999));
        assert!(claimable_at(&record, 2000));
        assert!(claimable_at(&record, u64::MAX));
    }

    #[test]
    fn test_bid_sufficiency() {
        let mut record = record();
        assert!(!meets_reserve(&record, 49));
        assert!(meets_reserve(&record, 50));

        record.highest_bid = 60;
        assert!(!outbids(&record, 60));
        assert!(outbids(&record, 61));
    }

    #[test]
    fn test_zero_reserve_still_needs_positive_bid() {
        let mut record = record();
        record.reserve = 0;
        assert!(meets_reserve(&record, 0));
        assert!(!outbids(&record, 0));
        assert!(outbids(&record, 1));
    }

    #[test]
    fn test_authorization_predicates() {
        let mut record = record();
        assert!(is_seller(&record, account(1)));
        assert!(!is_seller(&record, account(2)));
        assert!(!is_highest_bidder(&record, account(2)));

        record.highest_bidder = Some(account(2));
        assert!(is_highest_bidder(&record, account(2)));
        assert!(!is_highest_bidder(&record, account(1)));
    }

    #[test]
    fn test_bid_payment_shape() {
        let app = account(9);
        let mut guard = Guard::new(DEFAULT_OPCODE_BUDGET);

        let good = Transaction::Payment(Payment {
            sender: account(2),
            receiver: app,
            amount: 60,
            fee: 1000,
        });
        assert_eq!(guard.bid_payment(&good, account(2), app).map(|p| p.amount), Ok(60));
        assert_eq!(
            guard.bid_payment(&good, account(3), app),
            Err(Rejection::PaymentSenderMismatch)
        );
        assert_eq!(
            guard.bid_payment(&good, account(2), account(8)),
            Err(Rejection::PaymentReceiverMismatch)
        );

        let asset = Transaction::AssetTransfer(AssetTransfer {
            sender: account(2),
            receiver: app,
            asset_id: 42,
            amount: 60,
            fee: 1000,
        });
        assert_eq!(
            guard.bid_payment(&asset, account(2), app),
            Err(Rejection::PaymentMissing)
        );
    }

    #[test]
    fn test_meter_runs_out() {
        let mut guard = Guard::new(GUARD_COST * 2);
        assert!(guard.require(true, Rejection::AuctionClosed).is_ok());
        assert!(guard.require(true, Rejection::AuctionClosed).is_ok());
        assert_eq!(
            guard.require(true, Rejection::AuctionClosed),
            Err(Rejection::BudgetExceeded)
        );
    }
}
