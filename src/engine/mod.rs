//! Core engine: price resolution, opportunity scanning and arbitrage preview.

pub mod pricing;
pub mod previewer;
pub mod scanner;
