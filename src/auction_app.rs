//! AuctionApp - hosts the auction program as a Casper contract
//!
//! Each entry point turns the Odra call into a [`Call`], runs it through the
//! approval program and applies the returned inner transactions before the
//! record is stored. A revert anywhere undoes the whole call, transfers
//! included.

use alloc::vec::Vec;
use odra::casper_types::bytesrepr::Bytes;
use odra::casper_types::U512;
use odra::prelude::*;
use odra::ContractRef;

use crate::asset_registry::AssetRegistryContractRef;
use crate::call::{Call, Payment, Transaction};
use crate::errors::{Error, Rejection};
use crate::events::{
    AccountClosedOut, AccountOptedIn, ApplicationDeleted, ApplicationUpdateApproved,
    AuctionCreated, AuctionSettled, BidPlaced, BidRefunded,
};
use crate::inner::InnerTxn;
use crate::machine::{self, Context, Next};
use crate::schema::AuctionRecord;
use crate::validator::DEFAULT_OPCODE_BUDGET;

const MILLIS_PER_SECOND: u64 = 1000;

/// AuctionApp - single-lot auction contract
#[odra::module]
pub struct AuctionApp {
    record: Var<AuctionRecord>,
    asset_registry: Var<Address>,
    deleted: Var<bool>,
}

#[odra::module]
impl AuctionApp {
    /// Creation call
    ///
    /// # Arguments
    /// * `asset_registry` - Registry holding the auctioned asset
    /// * `app_args` - `[asset_id, start, end, reserve]`, 8-byte big-endian each
    pub fn init(&mut self, asset_registry: Address, app_args: Vec<Bytes>) {
        let seller = self.env().caller();
        let args: Vec<Vec<u8>> = app_args.iter().map(|arg| arg.to_vec()).collect();
        let call = self.or_revert(Call::create(seller, &args));

        self.asset_registry.set(asset_registry);
        self.deleted.set(false);
        self.execute(call);

        let record = self.require_record();
        self.env().emit_event(AuctionCreated {
            seller,
            asset_id: record.asset_id,
            start: record.start,
            end: record.end,
            reserve: record.reserve,
        });
    }

    // ============ AUCTION CALLS ============

    /// Place a bid with the attached value
    #[odra(payable)]
    pub fn bid(&mut self) {
        self.require_live();
        let bidder = self.env().caller();
        let amount = self.attached_amount();
        let payment = Transaction::Payment(Payment {
            sender: bidder,
            receiver: self.env().self_address(),
            amount,
            fee: 0,
        });

        let effects = self.execute(Call::Bid {
            sender: bidder,
            payment,
        });

        for effect in effects {
            if let InnerTxn::Payment(refund) = effect {
                self.env().emit_event(BidRefunded {
                    bidder: refund.receiver,
                    amount: refund.amount,
                });
            }
        }
        self.env().emit_event(BidPlaced { bidder, amount });
    }

    /// Winner takes the asset, seller takes the proceeds
    pub fn claim(&mut self) {
        self.require_live();
        let winner = self.env().caller();
        self.execute(Call::Claim { sender: winner });

        let record = self.require_record();
        self.env().emit_event(AuctionSettled {
            winner,
            seller: record.seller,
            asset_id: record.asset_id,
            amount: record.highest_bid,
        });
    }

    pub fn opt_in(&mut self) {
        self.require_live();
        let account = self.env().caller();
        self.execute(Call::OptIn { sender: account });
        self.env().emit_event(AccountOptedIn { account });
    }

    pub fn close_out(&mut self) {
        self.require_live();
        let account = self.env().caller();
        self.execute(Call::CloseOut { sender: account });
        self.env().emit_event(AccountClosedOut { account });
    }

    /// Clear program: approves for any live instance. No local state is
    /// kept, so nothing is written.
    pub fn clear_state(&mut self) {
        self.require_live();
        self.require_record();
    }

    /// Seller-only approval of an application update
    pub fn update_application(&mut self) {
        self.require_live();
        let by = self.env().caller();
        self.execute(Call::UpdateApplication { sender: by });
        self.env().emit_event(ApplicationUpdateApproved { by });
    }

    /// Seller-only deletion. Does not require the auction to be closed.
    pub fn delete_application(&mut self) {
        self.require_live();
        let by = self.env().caller();
        let was_closed = self.require_record().closed;
        self.execute(Call::DeleteApplication { sender: by });
        self.env().emit_event(ApplicationDeleted { by, was_closed });
    }

    // ============ VIEW FUNCTIONS ============

    pub fn get_auction(&self) -> Option<AuctionRecord> {
        if self.deleted.get_or_default() {
            return None;
        }
        self.record.get()
    }

    pub fn get_highest_bid(&self) -> u64 {
        self.get_auction()
            .map(|record| record.highest_bid)
            .unwrap_or_default()
    }

    pub fn get_highest_bidder(&self) -> Option<Address> {
        self.get_auction().and_then(|record| record.highest_bidder)
    }

    pub fn get_seller(&self) -> Option<Address> {
        self.get_auction().map(|record| record.seller)
    }

    pub fn is_closed(&self) -> bool {
        self.get_auction()
            .map(|record| record.closed)
            .unwrap_or_default()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.get_or_default()
    }

    pub fn get_asset_registry(&self) -> Option<Address> {
        self.asset_registry.get()
    }

    // ============ INTERNAL FUNCTIONS ============

    /// Runs the approval program, applies its effects, stores the result.
    fn execute(&mut self, call: Call) -> Vec<InnerTxn> {
        let current = self.record.get();
        let ctx = Context {
            now: self.env().get_block_time() / MILLIS_PER_SECOND,
            app_address: self.env().self_address(),
            budget: DEFAULT_OPCODE_BUDGET,
        };
        let outcome = self.or_revert(machine::approve(current.as_ref(), &call, &ctx));

        for effect in &outcome.effects {
            self.submit_inner(effect);
        }

        match outcome.next {
            Next::Store(record) => self.record.set(record),
            Next::Destroy => self.deleted.set(true),
        }
        outcome.effects
    }

    fn submit_inner(&self, effect: &InnerTxn) {
        match effect {
            InnerTxn::Payment(payment) => {
                self.env()
                    .transfer_tokens(&payment.receiver, &U512::from(payment.amount));
            }
            InnerTxn::AssetTransfer(transfer) => {
                let registry = self
                    .asset_registry
                    .get()
                    .unwrap_or_revert_with(&self.env(), Error::AssetRegistryNotSet);
                AssetRegistryContractRef::new(self.env(), registry).transfer(
                    transfer.asset_id,
                    transfer.receiver,
                    transfer.amount,
                );
            }
        }
    }

    fn attached_amount(&self) -> u64 {
        let value = self.env().attached_value();
        if value > U512::from(u64::MAX) {
            self.env().revert(Error::AmountOverflow);
        }
        value.as_u64()
    }

    fn require_live(&self) {
        if self.deleted.get_or_default() {
            self.env().revert(Error::ApplicationDeleted);
        }
    }

    fn require_record(&self) -> AuctionRecord {
        self.record
            .get()
            .unwrap_or_revert_with(&self.env(), Error::NotCreated)
    }

    fn or_revert<T>(&self, result: Result<T, Rejection>) -> T {
        match result {
            Ok(value) => value,
            Err(rejection) => self.env().revert(Error::from(rejection)),
        }
    }
}
