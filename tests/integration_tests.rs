//! End-to-end auction runs on the Odra host

mod test_utils;

use odra::casper_types::U512;
use odra::host::HostRef;
use odra::prelude::*;

use marketplace_auction::errors::Error;
use marketplace_auction::events::{ApplicationDeleted, AuctionSettled, BidPlaced, BidRefunded};

use test_utils::*;

#[test]
fn test_full_auction_lifecycle() {
    let mut market = setup();
    let (seller, alice, bob, carol) = (market.seller, market.alice, market.bob, market.carol);
    let asset_id = market.asset_id;

    // Too early
    market.at(500);
    assert_eq!(
        market.bid(alice, 60).unwrap_err(),
        Error::BiddingNotStarted.into()
    );

    market.at(1500);
    market.bid(alice, 60).unwrap();
    assert!(market.env.emitted_event(
        &market.auction,
        BidPlaced {
            bidder: alice,
            amount: 60
        }
    ));
    assert_eq!(market.auction_balance(), U512::from(60u64));

    let alice_before = market.balance(alice);
    market.at(1600);
    market.bid(bob, 100).unwrap();
    assert_eq!(market.balance(alice), alice_before + U512::from(60u64));
    assert!(market.env.emitted_event(
        &market.auction,
        BidRefunded {
            bidder: alice,
            amount: 60
        }
    ));

    // Below the standing bid
    assert_eq!(
        market.bid(carol, 90).unwrap_err(),
        Error::BidNotAboveHighest.into()
    );
    assert_eq!(market.auction.get_highest_bidder(), Some(bob));
    assert_eq!(market.auction_balance(), U512::from(100u64));

    // Window closed
    market.at(END_OFFSET);
    assert_eq!(
        market.bid(carol, 500).unwrap_err(),
        Error::BiddingEnded.into()
    );

    let seller_before = market.balance(seller);
    market.claim(bob).unwrap();
    assert_eq!(market.balance(seller), seller_before + U512::from(100u64));
    assert_eq!(market.registry.balance_of(asset_id, bob), 1);
    assert!(market.env.emitted_event(
        &market.auction,
        AuctionSettled {
            winner: bob,
            seller,
            asset_id,
            amount: 100
        }
    ));

    market.env.set_caller(seller);
    market.auction.delete_application();
    assert!(market.env.emitted_event(
        &market.auction,
        ApplicationDeleted {
            by: seller,
            was_closed: true
        }
    ));
    assert_eq!(market.auction.get_auction(), None);
    assert_eq!(market.auction_balance(), U512::zero());
}

#[test]
fn test_two_auctions_share_a_registry() {
    let mut market = setup();
    let (seller, alice, bob) = (market.seller, market.alice, market.bob);

    market.env.set_caller(seller);
    let second_asset = market.registry.create_asset(
        "Dockside Studio Deed".to_string(),
        "DEED".to_string(),
        1,
        0,
        "ipfs://dockside-studio".to_string(),
    );
    let params = marketplace_auction::AuctionParams {
        asset_id: second_asset,
        start: market.t0 + START_OFFSET,
        end: market.t0 + END_OFFSET,
        reserve: 10,
    };
    let mut second = marketplace_auction::deployment::deploy_auction(
        &market.env,
        market.registry.address(),
        &params,
    );
    market.registry.transfer(second_asset, second.address(), 1);

    market.at(1500);
    market.bid(alice, 70).unwrap();
    market.env.set_caller(bob);
    second.with_tokens(U512::from(20u64)).bid();

    market.at(END_OFFSET);
    market.claim(alice).unwrap();
    market.env.set_caller(bob);
    second.claim();

    assert_eq!(market.registry.balance_of(market.asset_id, alice), 1);
    assert_eq!(market.registry.balance_of(second_asset, bob), 1);
    assert_eq!(market.registry.balance_of(second_asset, alice), 0);
    assert!(market.auction.is_closed());
    assert!(second.is_closed());
}
