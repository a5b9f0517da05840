//! DefiPlaza V2 REST integration.
//!
//! Base URL: https://api.defiplaza.net
//! The pair list endpoint has no server-side filter, so token filtering is
//! done after download.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{build_quote, value_to_string, DexQuoteProvider};
use crate::types::{DexKind, PoolQuote, QuoteSide};

pub const DEFAULT_BASE_URL: &str = "https://api.defiplaza.net";
const PROVIDER_NAME: &str = "defiplaza";

#[derive(Debug, Deserialize)]
struct PlazaToken {
    address: String,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    liquidity: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct PlazaPair {
    pair_address: String,
    base_token: PlazaToken,
    quote_token: PlazaToken,
    #[serde(default)]
    price: Option<serde_json::Value>,
}

impl PlazaPair {
    fn trades(&self, token: &str) -> bool {
        self.base_token.address == token || self.quote_token.address == token
    }
}

/// DefiPlaza quote client.
pub struct DefiPlazaClient {
    http: Client,
    base_url: String,
}

impl DefiPlazaClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("radix-arb/0.1.0")
            .build()
            .context("Failed to build HTTP client for DefiPlaza")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn side(token: PlazaToken) -> QuoteSide {
        QuoteSide {
            address: token.address,
            symbol: token.symbol.unwrap_or_default(),
            amount: value_to_string(&token.liquidity),
        }
    }

    fn to_quote(pair: PlazaPair) -> PoolQuote {
        build_quote(
            pair.pair_address,
            DexKind::DefiPlaza,
            Self::side(pair.base_token),
            Self::side(pair.quote_token),
            pair.price.as_ref(),
        )
    }

    fn select(pairs: Vec<PlazaPair>, token: Option<&str>) -> Vec<PoolQuote> {
        pairs
            .into_iter()
            .filter(|p| token.map_or(true, |t| p.trades(t)))
            .map(Self::to_quote)
            .collect()
    }
}

#[async_trait]
impl DexQuoteProvider for DefiPlazaClient {
    async fn fetch_pools(&self, token: Option<&str>) -> Result<Vec<PoolQuote>> {
        let url = format!("{}/radix/pairs", self.base_url);
        debug!(url = %url, "Fetching DefiPlaza pairs");

        let resp = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .context("DefiPlaza API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("DefiPlaza API error {status}: {body}");
        }

        let pairs: Vec<PlazaPair> = resp
            .json()
            .await
            .context("Failed to parse DefiPlaza pairs response")?;

        let total = pairs.len();
        let quotes = Self::select(pairs, token);
        info!(total, matched = quotes.len(), "DefiPlaza pairs fetched");
        Ok(quotes)
    }

    fn kind(&self) -> DexKind {
        DexKind::DefiPlaza
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
