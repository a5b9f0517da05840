//! DEX quote providers.
//!
//! Defines the `DexQuoteProvider` trait and REST implementations for:
//! - Ociswap: pool list filtered server-side by resource
//! - DefiPlaza: full pair list, filtered client-side

pub mod defiplaza;
pub mod ociswap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::types::{inverse_price, DexKind, PoolQuote, QuoteSide};

/// Abstraction over a DEX's public quote API.
#[async_trait]
pub trait DexQuoteProvider: Send + Sync {
    /// Fetch current pool quotes, optionally only pools trading `token`.
    async fn fetch_pools(&self, token: Option<&str>) -> Result<Vec<PoolQuote>>;

    /// Which DEX this provider quotes.
    fn kind(&self) -> DexKind;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Parse a decimal string as reported by a provider, accepting scientific
/// notation.
pub fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let s = s.trim();
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))
}

/// Read a decimal from a JSON string or number.
pub fn decimal_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(s) => parse_decimal(s).ok(),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        _ => None,
    }
}

/// Build a quote from provider fields. A missing or unparsable price is
/// reported as zero, matching how the providers present empty pools.
pub(crate) fn build_quote(
    pool_address: String,
    dex: DexKind,
    token0: QuoteSide,
    token1: QuoteSide,
    price: Option<&serde_json::Value>,
) -> PoolQuote {
    let price = price.and_then(decimal_from_value).unwrap_or(Decimal::ZERO);
    PoolQuote {
        pool_address,
        dex,
        token0,
        token1,
        price,
        price_inverse: inverse_price(price),
        observed_at: Utc::now(),
    }
}

/// Render a JSON scalar as a string without quotes.
pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
