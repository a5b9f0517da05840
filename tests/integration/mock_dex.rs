//! Mock DEX quote provider for integration testing.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use radix_arb::dex::DexQuoteProvider;
use radix_arb::registry::PoolRegistry;
use radix_arb::types::{inverse_price, DexKind, Pool, PoolQuote, QuoteSide};

pub struct MockDex {
    kind: DexKind,
    quotes: Vec<PoolQuote>,
    force_error: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockDex {
    pub fn new(kind: DexKind, quotes: Vec<PoolQuote>) -> Self {
        Self {
            kind,
            quotes,
            force_error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DexQuoteProvider for MockDex {
    async fn fetch_pools(&self, token: Option<&str>) -> Result<Vec<PoolQuote>> {
        *self.calls.lock().unwrap() += 1;
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self
            .quotes
            .iter()
            .filter(|q| token.map_or(true, |t| q.token0.address == t || q.token1.address == t))
            .cloned()
            .collect())
    }

    fn kind(&self) -> DexKind {
        self.kind
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }
}

/// Quote for a registry pool with `price` token1 per token0.
pub fn quote_for(pool: &Pool, price: Decimal) -> PoolQuote {
    let registry = PoolRegistry::mainnet();
    let side = |address: &str| QuoteSide {
        address: address.to_string(),
        symbol: registry.token_symbol(address).to_string(),
        amount: "0".to_string(),
    };
    PoolQuote {
        pool_address: pool.address.to_string(),
        dex: pool.dex,
        token0: side(pool.token0),
        token1: side(pool.token1),
        price,
        price_inverse: inverse_price(price),
        observed_at: Utc::now(),
    }
}
