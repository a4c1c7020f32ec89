//! Error definitions for the auction program, its host and the asset registry

use odra::prelude::*;

/// Why the auction program refused a call.
///
/// Produced by the pure state machine. Every variant leaves the auction
/// record and all balances untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    // Guards
    AuctionClosed,
    BiddingNotStarted,
    BiddingEnded,
    AuctionStillRunning,
    PaymentMissing,
    PaymentSenderMismatch,
    PaymentReceiverMismatch,
    BidNotAboveHighest,
    BidBelowReserve,
    NotHighestBidder,
    NotSeller,

    // Malformed calls
    WrongArgumentCount,
    MalformedInteger,
    MissingOpcode,
    UnknownOpcode,
    AlreadyCreated,
    NotCreated,
    UnsupportedCall,

    /// Opcode budget of the call ran out
    BudgetExceeded,
}

/// Auction contract errors
#[odra::odra_error]
pub enum Error {
    /// Auction has already been settled
    AuctionClosed = 1,
    /// Bidding window has not opened yet
    BiddingNotStarted = 2,
    /// Bidding window is over
    BiddingEnded = 3,
    /// Claim attempted before the auction end
    AuctionStillRunning = 4,
    /// First transaction of the group is not a payment
    PaymentMissing = 5,
    /// Payment was not sent by the caller
    PaymentSenderMismatch = 6,
    /// Payment is not addressed to the auction account
    PaymentReceiverMismatch = 7,
    /// Bid does not exceed the current highest bid
    BidNotAboveHighest = 8,
    /// Bid is below the reserve price
    BidBelowReserve = 9,
    /// Caller is not the highest bidder
    NotHighestBidder = 10,
    /// Caller is not the seller
    NotSeller = 11,
    /// Creation needs exactly four arguments
    WrongArgumentCount = 20,
    /// Creation argument is not a big-endian u64
    MalformedInteger = 21,
    /// No-op call without an opcode argument
    MissingOpcode = 22,
    /// No-op call with an opcode other than bid or claim
    UnknownOpcode = 23,
    /// Auction record already exists
    AlreadyCreated = 24,
    /// Auction record does not exist
    NotCreated = 25,
    /// Call kind is not handled by the approval program
    UnsupportedCall = 26,
    /// Opcode budget exhausted
    BudgetExceeded = 30,
    /// Attached value does not fit in 64 bits
    AmountOverflow = 40,
    /// Application has been deleted
    ApplicationDeleted = 41,
    /// Asset registry address not set
    AssetRegistryNotSet = 42,
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::AuctionClosed => Error::AuctionClosed,
            Rejection::BiddingNotStarted => Error::BiddingNotStarted,
            Rejection::BiddingEnded => Error::BiddingEnded,
            Rejection::AuctionStillRunning => Error::AuctionStillRunning,
            Rejection::PaymentMissing => Error::PaymentMissing,
            Rejection::PaymentSenderMismatch => Error::PaymentSenderMismatch,
            Rejection::PaymentReceiverMismatch => Error::PaymentReceiverMismatch,
            Rejection::BidNotAboveHighest => Error::BidNotAboveHighest,
            Rejection::BidBelowReserve => Error::BidBelowReserve,
            Rejection::NotHighestBidder => Error::NotHighestBidder,
            Rejection::NotSeller => Error::NotSeller,
            Rejection::WrongArgumentCount => Error::WrongArgumentCount,
            Rejection::MalformedInteger => Error::MalformedInteger,
            Rejection::MissingOpcode => Error::MissingOpcode,
            Rejection::UnknownOpcode => Error::UnknownOpcode,
            Rejection::AlreadyCreated => Error::AlreadyCreated,
            Rejection::NotCreated => Error::NotCreated,
            Rejection::UnsupportedCall => Error::UnsupportedCall,
            Rejection::BudgetExceeded => Error::BudgetExceeded,
        }
    }
}

/// Asset registry errors
#[odra::odra_error]
pub enum AssetError {
    /// No asset with this id
    UnknownAsset = 100,
    /// Holder does not own enough units
    InsufficientAssetBalance = 101,
    /// Sender or receiver holding is frozen
    AssetFrozen = 102,
    /// Caller is not the freeze manager of the asset
    NotFreezeManager = 103,
    /// Receiver balance would overflow
    BalanceOverflow = 104,
}

/// Reasons the simulated ledger refused a transaction group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    EmptyGroup,
    GroupTooLarge,
    /// Outer fees do not cover every outer and inner transaction
    FeePoolShortfall { required: u64, provided: u64 },
    InsufficientFunds,
    BalanceOverflow,
    UnknownAsset,
    InsufficientAssetBalance,
    AssetFrozen,
    NotFreezeManager,
    UnknownApplication,
    /// The approval program rejected an application call
    Rejected(Rejection),
}

impl From<Rejection> for LedgerError {
    fn from(rejection: Rejection) -> Self {
        LedgerError::Rejected(rejection)
    }
}
