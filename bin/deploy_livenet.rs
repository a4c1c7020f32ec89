//! Livenet deployment script for the marketplace auction
//!
//! Deploys AssetRegistry, mints a single-unit asset, deploys an AuctionApp
//! over it and deposits the unit with the auction.

use odra::prelude::Addressable;
use marketplace_auction::deployment::{deploy_auction, deploy_registry};
use marketplace_auction::AuctionParams;

const MILLIS_PER_SECOND: u64 = 1000;

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{} must be an unsigned integer", name)),
        Err(_) => default,
    }
}

fn main() {
    // Load the Casper livenet environment
    let env = odra_casper_livenet_env::env();

    // Caller is the deployer and the seller
    let seller = env.caller();
    println!("Seller address: {}", seller.to_string());

    let start_delay = env_u64("AUCTION_START_DELAY", 60);
    let duration = env_u64("AUCTION_DURATION", 3600);
    let reserve = env_u64("AUCTION_RESERVE", 10_000_000_000); // 10 CSPR
    let asset_name =
        std::env::var("AUCTION_ASSET_NAME").unwrap_or_else(|_| "Marketplace Lot".to_string());
    let asset_url = std::env::var("AUCTION_ASSET_URL").unwrap_or_default();

    // Step 1: Registry
    println!("\n=== Deploying AssetRegistry ===");
    env.set_gas(150_000_000_000u64); // 150 CSPR gas
    let mut registry = deploy_registry(&env);
    let registry_address = registry.address();
    println!("AssetRegistry deployed at: {}", registry_address.to_string());

    // Step 2: The lot
    println!("\n=== Creating asset ===");
    env.set_gas(5_000_000_000u64); // 5 CSPR gas
    let asset_id = registry.create_asset(asset_name.clone(), "LOT".to_string(), 1, 0, asset_url);
    println!("Asset '{}' created with id {}", asset_name, asset_id);

    // Step 3: Auction
    let now = env.block_time() / MILLIS_PER_SECOND;
    let params = AuctionParams {
        asset_id,
        start: now + start_delay,
        end: now + start_delay + duration,
        reserve,
    };
    println!("\n=== Deploying AuctionApp ===");
    println!("Bidding window: [{}, {})", params.start, params.end);
    println!("Reserve: {} motes", params.reserve);
    env.set_gas(200_000_000_000u64); // 200 CSPR gas
    let auction = deploy_auction(&env, registry_address, &params);
    let auction_address = auction.address();
    println!("AuctionApp deployed at: {}", auction_address.to_string());

    // Step 4: Hand the unit to the auction
    println!("\n=== Depositing the lot ===");
    env.set_gas(5_000_000_000u64); // 5 CSPR gas
    registry.transfer(asset_id, auction_address, 1);
    println!(
        "Auction holds {} unit(s) of asset {}",
        registry.balance_of(asset_id, auction_address),
        asset_id
    );

    println!("\n=== Deployment Summary ===");
    println!("AssetRegistry: {}", registry_address.to_string());
    println!("AuctionApp: {}", auction_address.to_string());
    println!("Asset id: {}", asset_id);
    println!("Seller: {}", seller.to_string());
    println!("\nDeployment complete!");
}
