//! RADIX-ARB: cross-DEX arbitrage scanner for Radix pools
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod registry;
pub mod dex;
pub mod ledger;
pub mod manifest;
pub mod strategy;
pub mod engine;
pub mod wallet;
pub mod context;
