//! Binary for building the auction and asset registry wasm files.

#![cfg_attr(target_arch = "wasm32", no_std)]
#![cfg_attr(target_arch = "wasm32", no_main)]
#![allow(unused_imports, clippy::single_component_path_imports)]

use marketplace_auction;

#[cfg(not(target_arch = "wasm32"))]
fn main() {}
