//! Trading strategies.

pub mod arbitrage;
