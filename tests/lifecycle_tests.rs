//! Creation, opt-in/close-out, update and delete tests

mod test_utils;

use odra::casper_types::U512;
use odra::host::HostRef;
use odra::prelude::*;

use marketplace_auction::deployment::creation_args;
use marketplace_auction::errors::Error;
use marketplace_auction::events::{
    AccountClosedOut, AccountOptedIn, ApplicationDeleted, ApplicationUpdateApproved, AuctionCreated,
};
use marketplace_auction::AuctionParams;

use test_utils::*;

#[test]
fn test_create_records_parameters() {
    let market = setup();

    let record = market.auction.get_auction().expect("auction should exist");
    assert_eq!(record.seller, market.seller);
    assert_eq!(record.asset_id, market.asset_id);
    assert_eq!(record.start, market.t0 + START_OFFSET);
    assert_eq!(record.end, market.t0 + END_OFFSET);
    assert_eq!(record.reserve, RESERVE);
    assert_eq!(record.highest_bid, 0);
    assert_eq!(record.highest_bidder, None);
    assert!(!record.closed);

    assert_eq!(market.auction.get_seller(), Some(market.seller));
    assert_eq!(market.auction.get_asset_registry(), Some(market.registry.address()));

    let expected_event = AuctionCreated {
        seller: market.seller,
        asset_id: market.asset_id,
        start: record.start,
        end: record.end,
        reserve: RESERVE,
    };
    assert!(market.env.emitted_event(&market.auction, expected_event));
}

#[test]
fn test_creation_args_are_eight_byte_words() {
    let params = AuctionParams {
        asset_id: 42,
        start: 1000,
        end: 2000,
        reserve: 50,
    };
    let args = creation_args(&params);

    assert_eq!(args.len(), 4);
    assert!(args.iter().all(|arg| arg.len() == 8));
    assert_eq!(args[0].to_vec(), 42u64.to_be_bytes().to_vec());
    assert_eq!(args[3].to_vec(), 50u64.to_be_bytes().to_vec());
}

#[test]
fn test_opt_in_and_close_out_always_approve() {
    let mut market = setup();
    let carol = market.carol;
    let before = market.auction.get_auction();

    market.env.set_caller(carol);
    assert!(market.auction.try_opt_in().is_ok());
    assert!(market.auction.try_close_out().is_ok());
    assert!(market.auction.try_clear_state().is_ok());

    assert_eq!(market.auction.get_auction(), before, "No state effect");
    assert!(market.env.emitted_event(&market.auction, AccountOptedIn { account: carol }));
    assert!(market.env.emitted_event(&market.auction, AccountClosedOut { account: carol }));
}

#[test]
fn test_update_by_seller_only() {
    let mut market = setup();
    let (seller, alice) = (market.seller, market.alice);

    market.env.set_caller(alice);
    let result = market.auction.try_update_application();
    assert_eq!(result.unwrap_err(), Error::NotSeller.into());

    market.env.set_caller(seller);
    assert!(market.auction.try_update_application().is_ok());
    assert!(market.env.emitted_event(&market.auction, ApplicationUpdateApproved { by: seller }));
}

#[test]
fn test_delete_by_non_seller() {
    let mut market = setup();
    let bob = market.bob;

    market.env.set_caller(bob);
    let result = market.auction.try_delete_application();
    assert_eq!(result.unwrap_err(), Error::NotSeller.into());
    assert!(!market.auction.is_deleted());
}

#[test]
fn test_delete_settled_auction() {
    let mut market = setup();
    let (seller, bob) = (market.seller, market.bob);

    market.at(1500);
    market.bid(bob, 100).unwrap();
    market.at(END_OFFSET);
    market.claim(bob).unwrap();

    market.env.set_caller(seller);
    assert!(market.auction.try_delete_application().is_ok());
    assert!(market.auction.is_deleted());
    assert_eq!(market.auction.get_auction(), None);
    assert!(market.env.emitted_event(
        &market.auction,
        ApplicationDeleted {
            by: seller,
            was_closed: true
        }
    ));
}

#[test]
fn test_seller_can_delete_open_auction_with_standing_bid() {
    let mut market = setup();
    let (seller, alice, bob) = (market.seller, market.alice, market.bob);

    market.at(1500);
    market.bid(alice, 60).unwrap();

    market.env.set_caller(seller);
    assert!(market.auction.try_delete_application().is_ok());
    assert!(market.env.emitted_event(
        &market.auction,
        ApplicationDeleted {
            by: seller,
            was_closed: false
        }
    ));

    // The standing bid stays in the contract account
    assert_eq!(market.auction_balance(), U512::from(60u64));
    assert_eq!(market.auction.get_highest_bid(), 0);

    let result = market.bid(bob, 100);
    assert_eq!(result.unwrap_err(), Error::ApplicationDeleted.into());

    market.at(END_OFFSET);
    let result = market.claim(alice);
    assert_eq!(result.unwrap_err(), Error::ApplicationDeleted.into());

    market.env.set_caller(seller);
    let result = market.auction.try_delete_application();
    assert_eq!(result.unwrap_err(), Error::ApplicationDeleted.into());
}

#[test]
fn test_clear_state_leaves_standing_bid_untouched() {
    let mut market = setup();
    let (seller, alice, carol) = (market.seller, market.alice, market.carol);

    market.at(1500);
    market.bid(alice, 60).unwrap();
    let before = market.auction.get_auction();

    market.env.set_caller(alice);
    assert!(market.auction.try_clear_state().is_ok());
    assert_eq!(market.auction.get_auction(), before);
    assert_eq!(market.auction.get_highest_bidder(), Some(alice));
    assert_eq!(market.auction_balance(), U512::from(60u64));

    market.env.set_caller(seller);
    market.auction.delete_application();

    market.env.set_caller(carol);
    let result = market.auction.try_clear_state();
    assert_eq!(result.unwrap_err(), Error::ApplicationDeleted.into());
}
