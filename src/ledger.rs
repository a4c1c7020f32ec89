//! In-memory ledger executing atomic groups against auction applications
//!
//! Every group runs against a scratch copy of the ledger: outer payments and
//! asset transfers, the programs of application calls and the inner
//! transactions they return. The copy replaces the live state only when all of
//! it succeeded and the outer fees cover every transaction in the group,
//! inner ones included.

use alloc::collections::BTreeMap;
use alloc::string::ToString;
use alloc::vec::Vec;
use odra::casper_types::account::AccountHash;
use odra::prelude::*;

use crate::asset_registry::AssetParams;
use crate::call::{ApplicationCall, AssetTransfer, AuctionParams, OnCompletion, Payment, Transaction};
use crate::call::{BID_OPCODE, CLAIM_OPCODE};
use crate::errors::LedgerError;
use crate::inner::InnerTxn;
use crate::machine::{self, Context, Next};
use crate::schema::{AuctionRecord, StateValue};
use crate::validator::DEFAULT_OPCODE_BUDGET;

/// Fee charged per transaction, inner transactions included
pub const MIN_TXN_FEE: u64 = 1_000;

pub const MAX_GROUP_SIZE: usize = 16;

const APP_ADDRESS_PREFIX: &[u8; 5] = b"appID";

/// Transaction identifier, sequential per ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TxId(pub u64);

/// Result of a committed group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub txids: Vec<TxId>,
    /// Id of the application created by the group, if any
    pub created_app: Option<u64>,
    /// Inner transactions applied, in order
    pub inner: Vec<InnerTxn>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Holding {
    pub amount: u64,
    pub frozen: bool,
}

#[derive(Debug, Clone)]
struct Application {
    address: Address,
    record: AuctionRecord,
    /// Bumped on every committed change of the record
    version: u64,
}

/// Account address owned by an application.
pub fn application_address(app_id: u64) -> Address {
    let mut seed = [0u8; 32];
    seed[..APP_ADDRESS_PREFIX.len()].copy_from_slice(APP_ADDRESS_PREFIX);
    seed[24..].copy_from_slice(&app_id.to_be_bytes());
    Address::Account(AccountHash::new(seed))
}

#[derive(Debug, Clone, Default)]
struct Accounts {
    balances: BTreeMap<Address, u64>,
    assets: BTreeMap<u64, AssetParams>,
    holdings: BTreeMap<(Address, u64), Holding>,
    apps: BTreeMap<u64, Application>,
    asset_counter: u64,
    app_counter: u64,
}

impl Accounts {
    fn balance(&self, account: Address) -> u64 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn debit(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        let remaining = self
            .balance(account)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;
        self.balances.insert(account, remaining);
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        let total = self
            .balance(account)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.balances.insert(account, total);
        Ok(())
    }

    fn pay(&mut self, sender: Address, receiver: Address, amount: u64) -> Result<(), LedgerError> {
        self.debit(sender, amount)?;
        self.credit(receiver, amount)
    }

    fn holding(&self, account: Address, asset_id: u64) -> Holding {
        self.holdings
            .get(&(account, asset_id))
            .copied()
            .unwrap_or_default()
    }

    fn move_asset(
        &mut self,
        sender: Address,
        receiver: Address,
        asset_id: u64,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if !self.assets.contains_key(&asset_id) {
            return Err(LedgerError::UnknownAsset);
        }
        let from = self.holding(sender, asset_id);
        let to = self.holding(receiver, asset_id);
        if from.frozen || to.frozen {
            return Err(LedgerError::AssetFrozen);
        }
        if from.amount < amount {
            return Err(LedgerError::InsufficientAssetBalance);
        }
        if sender == receiver {
            return Ok(());
        }
        let credited = to
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.holdings.insert(
            (sender, asset_id),
            Holding {
                amount: from.amount - amount,
                ..from
            },
        );
        self.holdings.insert(
            (receiver, asset_id),
            Holding {
                amount: credited,
                ..to
            },
        );
        Ok(())
    }

    fn apply_inner(&mut self, txn: &InnerTxn) -> Result<(), LedgerError> {
        match txn {
            InnerTxn::Payment(payment) => self.pay(payment.sender, payment.receiver, payment.amount),
            InnerTxn::AssetTransfer(transfer) => self.move_asset(
                transfer.sender,
                transfer.receiver,
                transfer.asset_id,
                transfer.amount,
            ),
        }
    }

    /// Evaluates one application call and stores its outcome.
    fn run_application(
        &mut self,
        call: &ApplicationCall,
        group: &[Transaction],
        now: u64,
        budget: u32,
    ) -> Result<(Option<u64>, Vec<InnerTxn>), LedgerError> {
        match call.app_id {
            None => {
                self.app_counter += 1;
                let app_id = self.app_counter;
                let address = application_address(app_id);
                let ctx = Context {
                    now,
                    app_address: address,
                    budget,
                };
                let outcome = machine::dispatch(None, call, group, &ctx)?;
                if let Next::Store(record) = outcome.next {
                    self.apps.insert(
                        app_id,
                        Application {
                            address,
                            record,
                            version: 1,
                        },
                    );
                }
                Ok((Some(app_id), outcome.effects))
            }
            Some(app_id) => {
                let app = self
                    .apps
                    .get(&app_id)
                    .ok_or(LedgerError::UnknownApplication)?;
                let ctx = Context {
                    now,
                    app_address: app.address,
                    budget,
                };
                let outcome = machine::dispatch(Some(&app.record), call, group, &ctx)?;
                match outcome.next {
                    Next::Store(record) => {
                        if let Some(app) = self.apps.get_mut(&app_id) {
                            if app.record != record {
                                app.version += 1;
                                app.record = record;
                            }
                        }
                    }
                    Next::Destroy => {
                        self.apps.remove(&app_id);
                    }
                }
                Ok((None, outcome.effects))
            }
        }
    }
}

/// Simulated chain holding accounts, assets and auction applications
#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: Accounts,
    now: u64,
    min_fee: u64,
    opcode_budget: u32,
    txn_counter: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: Accounts::default(),
            now: 0,
            min_fee: MIN_TXN_FEE,
            opcode_budget: DEFAULT_OPCODE_BUDGET,
            txn_counter: 0,
        }
    }

    /// Overrides the per-call opcode budget.
    pub fn with_opcode_budget(mut self, budget: u32) -> Self {
        self.opcode_budget = budget;
        self
    }

    pub fn min_fee(&self) -> u64 {
        self.min_fee
    }

    // ============ CLOCK ============

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_timestamp(&mut self, now: u64) {
        self.now = now;
    }

    pub fn advance(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }

    // ============ READS ============

    pub fn balance(&self, account: Address) -> u64 {
        self.accounts.balance(account)
    }

    pub fn asset_balance(&self, account: Address, asset_id: u64) -> u64 {
        self.accounts.holding(account, asset_id).amount
    }

    pub fn asset(&self, asset_id: u64) -> Option<&AssetParams> {
        self.accounts.assets.get(&asset_id)
    }

    pub fn app_address(&self, app_id: u64) -> Option<Address> {
        self.accounts.apps.get(&app_id).map(|app| app.address)
    }

    pub fn auction(&self, app_id: u64) -> Option<&AuctionRecord> {
        self.accounts.apps.get(&app_id).map(|app| &app.record)
    }

    pub fn record_version(&self, app_id: u64) -> Option<u64> {
        self.accounts.apps.get(&app_id).map(|app| app.version)
    }

    pub fn global_state(&self, app_id: u64) -> Option<BTreeMap<&'static str, StateValue>> {
        self.auction(app_id).map(AuctionRecord::global_state)
    }

    // ============ WRITES ============

    /// Credit an account out of thin air (genesis allocation).
    pub fn fund(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        self.accounts.credit(account, amount)
    }

    /// Executes an atomic group; nothing is committed unless every member,
    /// every program and every inner transaction succeeds.
    pub fn submit_group(&mut self, group: Vec<Transaction>) -> Result<Receipt, LedgerError> {
        if group.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }
        if group.len() > MAX_GROUP_SIZE {
            return Err(LedgerError::GroupTooLarge);
        }

        let mut scratch = self.accounts.clone();
        let mut created_app = None;
        let mut inner = Vec::new();
        let mut provided: u64 = 0;

        for txn in &group {
            scratch.debit(txn.sender(), txn.fee())?;
            provided = provided
                .checked_add(txn.fee())
                .ok_or(LedgerError::BalanceOverflow)?;

            match txn {
                Transaction::Payment(payment) => {
                    scratch.pay(payment.sender, payment.receiver, payment.amount)?
                }
                Transaction::AssetTransfer(transfer) => scratch.move_asset(
                    transfer.sender,
                    transfer.receiver,
                    transfer.asset_id,
                    transfer.amount,
                )?,
                Transaction::AppCall(call) => {
                    let (created, effects) =
                        scratch.run_application(call, &group, self.now, self.opcode_budget)?;
                    for effect in &effects {
                        scratch.apply_inner(effect)?;
                    }
                    created_app = created_app.or(created);
                    inner.extend(effects);
                }
            }
        }

        let required = self
            .min_fee
            .checked_mul((group.len() + inner.len()) as u64)
            .ok_or(LedgerError::BalanceOverflow)?;
        if provided < required {
            return Err(LedgerError::FeePoolShortfall { required, provided });
        }

        self.accounts = scratch;
        let txids = group.iter().map(|_| self.next_txid()).collect();
        Ok(Receipt {
            txids,
            created_app,
            inner,
        })
    }

    pub fn send_payment(
        &mut self,
        sender: Address,
        receiver: Address,
        amount: u64,
    ) -> Result<TxId, LedgerError> {
        let receipt = self.submit_group(Vec::from([Transaction::Payment(Payment {
            sender,
            receiver,
            amount,
            fee: self.min_fee,
        })]))?;
        Ok(receipt.txids[0])
    }

    /// Mint a new asset held entirely by `creator`, who also manages freezes.
    pub fn create_asset(
        &mut self,
        creator: Address,
        asset_name: &str,
        unit_name: &str,
        total: u64,
        decimals: u8,
        url: &str,
    ) -> Result<(u64, TxId), LedgerError> {
        let mut scratch = self.accounts.clone();
        scratch.debit(creator, self.min_fee)?;
        scratch.asset_counter += 1;
        let asset_id = scratch.asset_counter;
        scratch.assets.insert(
            asset_id,
            AssetParams {
                creator,
                freeze_manager: creator,
                asset_name: asset_name.to_string(),
                unit_name: unit_name.to_string(),
                total,
                decimals,
                url: url.to_string(),
            },
        );
        scratch.holdings.insert(
            (creator, asset_id),
            Holding {
                amount: total,
                frozen: false,
            },
        );
        self.accounts = scratch;
        Ok((asset_id, self.next_txid()))
    }

    pub fn set_frozen(
        &mut self,
        manager: Address,
        asset_id: u64,
        account: Address,
        frozen: bool,
    ) -> Result<TxId, LedgerError> {
        let params = self
            .accounts
            .assets
            .get(&asset_id)
            .ok_or(LedgerError::UnknownAsset)?;
        if params.freeze_manager != manager {
            return Err(LedgerError::NotFreezeManager);
        }
        let mut scratch = self.accounts.clone();
        scratch.debit(manager, self.min_fee)?;
        let holding = scratch.holding(account, asset_id);
        scratch
            .holdings
            .insert((account, asset_id), Holding { frozen, ..holding });
        self.accounts = scratch;
        Ok(self.next_txid())
    }

    pub fn transfer_asset(
        &mut self,
        sender: Address,
        receiver: Address,
        asset_id: u64,
        amount: u64,
    ) -> Result<TxId, LedgerError> {
        let receipt = self.submit_group(Vec::from([Transaction::AssetTransfer(AssetTransfer {
            sender,
            receiver,
            asset_id,
            amount,
            fee: self.min_fee,
        })]))?;
        Ok(receipt.txids[0])
    }

    /// Submit the creation call of a new auction.
    ///
    /// # Returns
    /// Application id and creation transaction id
    pub fn deploy_auction(
        &mut self,
        seller: Address,
        params: &AuctionParams,
    ) -> Result<(u64, TxId), LedgerError> {
        let receipt = self.submit_group(Vec::from([Transaction::AppCall(ApplicationCall {
            sender: seller,
            app_id: None,
            on_completion: OnCompletion::NoOp,
            args: params.app_args(),
            fee: self.min_fee,
        })]))?;
        let app_id = receipt
            .created_app
            .ok_or(LedgerError::UnknownApplication)?;
        Ok((app_id, receipt.txids[0]))
    }

    // ============ GROUP BUILDERS ============

    /// `[payment, bid call]`; the call fee also covers a refund.
    pub fn bid_group(
        &self,
        bidder: Address,
        app_id: u64,
        amount: u64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let app_address = self
            .app_address(app_id)
            .ok_or(LedgerError::UnknownApplication)?;
        Ok(Vec::from([
            Transaction::Payment(Payment {
                sender: bidder,
                receiver: app_address,
                amount,
                fee: self.min_fee,
            }),
            Transaction::AppCall(ApplicationCall {
                sender: bidder,
                app_id: Some(app_id),
                on_completion: OnCompletion::NoOp,
                args: Vec::from([BID_OPCODE.to_vec()]),
                fee: self.min_fee * 2,
            }),
        ]))
    }

    /// Claim call whose fee covers both settlement transfers.
    pub fn claim_call(&self, winner: Address, app_id: u64) -> Transaction {
        self.app_call(
            winner,
            app_id,
            OnCompletion::NoOp,
            Vec::from([CLAIM_OPCODE.to_vec()]),
        )
    }

    /// Application call with a fee large enough for two inner transactions.
    pub fn app_call(
        &self,
        sender: Address,
        app_id: u64,
        on_completion: OnCompletion,
        args: Vec<Vec<u8>>,
    ) -> Transaction {
        Transaction::AppCall(ApplicationCall {
            sender,
            app_id: Some(app_id),
            on_completion,
            args,
            fee: self.min_fee * 3,
        })
    }

    fn next_txid(&mut self) -> TxId {
        self.txn_counter += 1;
        TxId(self.txn_counter)
    }
}
