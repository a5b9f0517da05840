//! Static pool and token registry.
//!
//! The registry is compiled in: changing a pool or token means shipping a
//! new build. Lookups never fail; unknown tokens yield empty results.

pub mod pools;
pub mod tokens;

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::types::{pair_key, Pool, PoolSides, Token};

/// Read-only view over a fixed set of pools and tokens.
#[derive(Debug, Clone, Copy)]
pub struct PoolRegistry {
    pools: &'static [Pool],
    tokens: &'static [Token],
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl PoolRegistry {
    /// The built-in mainnet registry.
    pub fn mainnet() -> Self {
        Self {
            pools: pools::ALL_POOLS,
            tokens: tokens::ALL_TOKENS,
        }
    }

    /// A registry over caller-provided tables.
    pub fn with_tables(pools: &'static [Pool], tokens: &'static [Token]) -> Self {
        Self { pools, tokens }
    }

    pub fn all_pools(&self) -> &'static [Pool] {
        self.pools
    }

    pub fn all_tokens(&self) -> &'static [Token] {
        self.tokens
    }

    pub fn find_pool(&self, address: &str) -> Option<&'static Pool> {
        self.pools.iter().find(|p| p.address == address)
    }

    pub fn token(&self, address: &str) -> Option<&'static Token> {
        self.tokens.iter().find(|t| t.address == address)
    }

    /// Case-insensitive symbol lookup.
    pub fn token_by_symbol(&self, symbol: &str) -> Option<&'static Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Display symbol for an address, empty for unknown resources.
    pub fn token_symbol(&self, address: &str) -> &'static str {
        self.token(address).map(|t| t.symbol).unwrap_or("")
    }

    /// Pools whose second side is `token`.
    ///
    /// Kept for callers that treat token1 as the quoted asset; prefer
    /// [`PoolRegistry::pools_containing`].
    pub fn pools_for_token(&self, token: &str) -> Vec<Pool> {
        self.pools
            .iter()
            .filter(|p| p.token1 == token)
            .copied()
            .collect()
    }

    /// Pools that list `token` on either side.
    pub fn pools_containing(&self, token: &str) -> Vec<Pool> {
        self.pools
            .iter()
            .filter(|p| p.contains(token))
            .copied()
            .collect()
    }

    /// Group pools by unordered token pair, preserving registry order
    /// within each group.
    pub fn group_by_pair(&self) -> BTreeMap<String, Vec<Pool>> {
        let mut grouped: BTreeMap<String, Vec<Pool>> = BTreeMap::new();
        for pool in self.pools {
            grouped
                .entry(pair_key(pool.token0, pool.token1))
                .or_default()
                .push(*pool);
        }
        grouped
    }
}

/// Sort pools ascending by price. Pools without a price sort last; ties keep
/// their input order.
pub fn sort_by_price(pools: &[Pool], prices: &HashMap<String, Decimal>) -> Vec<Pool> {
    let mut sorted = pools.to_vec();
    sorted.sort_by(|a, b| {
        match (prices.get(a.address), prices.get(b.address)) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    sorted
}

/// Shorten an address for display: first four and last four characters.
/// Addresses of eight characters or fewer are returned unchanged.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
