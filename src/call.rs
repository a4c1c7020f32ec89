//! Transactions, application calls and the closed set of auction calls
//!
//! Raw application calls carry an on-completion kind and positional byte
//! arguments. [`Call::decode`] turns them into a [`Call`]; every shape it does
//! not recognise is denied.

use alloc::vec::Vec;
use odra::prelude::*;

use crate::errors::Rejection;

pub const BID_OPCODE: &[u8] = b"bid";
pub const CLAIM_OPCODE: &[u8] = b"claim";

/// Number of positional creation arguments
pub const CREATION_ARG_COUNT: usize = 4;

/// Widest integer argument accepted, in bytes
pub const UINT_WIDTH: usize = 8;

/// What an application call asks the program to do besides running it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCompletion {
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub sender: Address,
    pub receiver: Address,
    pub amount: u64,
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub asset_id: u64,
    pub amount: u64,
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCall {
    pub sender: Address,
    /// `None` for the creation call
    pub app_id: Option<u64>,
    pub on_completion: OnCompletion,
    pub args: Vec<Vec<u8>>,
    pub fee: u64,
}

/// One member of an atomic group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Payment(Payment),
    AssetTransfer(AssetTransfer),
    AppCall(ApplicationCall),
}

impl Transaction {
    pub fn sender(&self) -> Address {
        match self {
            Transaction::Payment(payment) => payment.sender,
            Transaction::AssetTransfer(transfer) => transfer.sender,
            Transaction::AppCall(call) => call.sender,
        }
    }

    pub fn fee(&self) -> u64 {
        match self {
            Transaction::Payment(payment) => payment.fee,
            Transaction::AssetTransfer(transfer) => transfer.fee,
            Transaction::AppCall(call) => call.fee,
        }
    }
}

/// The four creation parameters of an auction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionParams {
    pub asset_id: u64,
    pub start: u64,
    pub end: u64,
    pub reserve: u64,
}

impl AuctionParams {
    /// Positional creation arguments: `[asset_id, start, end, reserve]`,
    /// each 8 bytes big-endian.
    pub fn app_args(&self) -> Vec<Vec<u8>> {
        [self.asset_id, self.start, self.end, self.reserve]
            .iter()
            .map(|value| encode_uint(*value))
            .collect()
    }

    pub fn from_app_args(args: &[Vec<u8>]) -> Result<Self, Rejection> {
        if args.len() != CREATION_ARG_COUNT {
            return Err(Rejection::WrongArgumentCount);
        }
        Ok(Self {
            asset_id: decode_uint(&args[0])?,
            start: decode_uint(&args[1])?,
            end: decode_uint(&args[2])?,
            reserve: decode_uint(&args[3])?,
        })
    }
}

pub fn encode_uint(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Big-endian bytes to integer. Shorter inputs are left-padded with zeros;
/// anything wider than eight bytes is malformed.
pub fn decode_uint(bytes: &[u8]) -> Result<u64, Rejection> {
    if bytes.len() > UINT_WIDTH {
        return Err(Rejection::MalformedInteger);
    }
    Ok(bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Every call the approval program accepts for evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { sender: Address, params: AuctionParams },
    /// `payment` is the first transaction of the group
    Bid { sender: Address, payment: Transaction },
    Claim { sender: Address },
    OptIn { sender: Address },
    CloseOut { sender: Address },
    UpdateApplication { sender: Address },
    DeleteApplication { sender: Address },
}

impl Call {
    pub fn create(sender: Address, args: &[Vec<u8>]) -> Result<Self, Rejection> {
        Ok(Call::Create {
            sender,
            params: AuctionParams::from_app_args(args)?,
        })
    }

    /// Route a raw application call: creation first, then on-completion kind,
    /// then the opcode of a no-op call.
    pub fn decode(txn: &ApplicationCall, group: &[Transaction]) -> Result<Self, Rejection> {
        let sender = txn.sender;
        if txn.app_id.is_none() {
            return Call::create(sender, &txn.args);
        }

        match txn.on_completion {
            OnCompletion::NoOp => {
                let opcode = txn.args.first().ok_or(Rejection::MissingOpcode)?;
                if opcode.as_slice() == BID_OPCODE {
                    let payment = group.first().cloned().ok_or(Rejection::PaymentMissing)?;
                    Ok(Call::Bid { sender, payment })
                } else if opcode.as_slice() == CLAIM_OPCODE {
                    Ok(Call::Claim { sender })
                } else {
                    Err(Rejection::UnknownOpcode)
                }
            }
            OnCompletion::OptIn => Ok(Call::OptIn { sender }),
            OnCompletion::CloseOut => Ok(Call::CloseOut { sender }),
            OnCompletion::UpdateApplication => Ok(Call::UpdateApplication { sender }),
            OnCompletion::DeleteApplication => Ok(Call::DeleteApplication { sender }),
            // Handled by the clear program, never by approval.
            OnCompletion::ClearState => Err(Rejection::UnsupportedCall),
        }
    }

    pub fn sender(&self) -> Address {
        match self {
            Call::Create { sender, .. }
            | Call::Bid { sender, .. }
            | Call::Claim { sender }
            | Call::OptIn { sender }
            | Call::CloseOut { sender }
            | Call::UpdateApplication { sender }
            | Call::DeleteApplication { sender } => *sender,
        }
    }
}
