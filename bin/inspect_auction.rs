//! Reads a deployed auction and optionally places a bid
//!
//! Set AUCTION_ADDRESS to the AuctionApp contract and AUCTION_BID_AMOUNT
//! (motes) to bid from the livenet caller.

use std::str::FromStr;

use odra::casper_types::U512;
use odra::host::{HostRef, HostRefLoader};
use odra::prelude::Address;
use marketplace_auction::AuctionApp;

fn main() {
    let env = odra_casper_livenet_env::env();
    let caller = env.caller();

    println!("=== Inspecting Auction ===\n");
    println!("Caller: {}", caller.to_string());

    let auction_address =
        std::env::var("AUCTION_ADDRESS").expect("AUCTION_ADDRESS env var must be set");
    let auction_addr = Address::from_str(&auction_address).expect("Invalid AuctionApp address");
    println!("AuctionApp: {}", auction_address);

    let mut auction = AuctionApp::load(&env, auction_addr);

    let Some(record) = auction.get_auction() else {
        println!("Auction was deleted");
        return;
    };

    println!("\n--- Record ---");
    println!("Seller: {}", record.seller.to_string());
    println!("Asset id: {}", record.asset_id);
    println!("Bidding window: [{}, {})", record.start, record.end);
    println!("Reserve: {}", record.reserve);
    println!("Highest bid: {}", record.highest_bid);
    match record.highest_bidder {
        Some(bidder) => println!("Highest bidder: {}", bidder.to_string()),
        None => println!("Highest bidder: none"),
    }
    println!("Closed: {}", record.closed);
    println!("Block time: {}", env.block_time() / 1000);

    let Ok(amount) = std::env::var("AUCTION_BID_AMOUNT") else {
        return;
    };
    let amount: u64 = amount.parse().expect("AUCTION_BID_AMOUNT must be an unsigned integer");

    println!("\n--- Bidding {} motes ---", amount);
    env.set_gas(10_000_000_000u64); // 10 CSPR gas
    match auction.with_tokens(U512::from(amount)).try_bid() {
        Ok(()) => println!("SUCCESS! Highest bid is now {}", auction.get_highest_bid()),
        Err(e) => println!("Bid rejected: {:?}", e),
    }
}
