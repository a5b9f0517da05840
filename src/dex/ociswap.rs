//! Ociswap REST integration.
//!
//! Base URL: https://api.ociswap.com
//! Endpoints used: `/pools?resource_address=...` and `/tokens/{address}`.
//! No auth; reads only.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{build_quote, decimal_from_value, value_to_string, DexQuoteProvider};
use crate::types::{DexKind, PoolQuote, QuoteSide};

pub const DEFAULT_BASE_URL: &str = "https://api.ociswap.com";
const PROVIDER_NAME: &str = "ociswap";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OciResource {
    address: String,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    amount: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OciPool {
    address: String,
    resource_x: OciResource,
    resource_y: OciResource,
    #[serde(default)]
    price: Option<serde_json::Value>,
}

/// `/pools` is served either as a bare list or wrapped in a page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OciPoolsResponse {
    List(Vec<OciPool>),
    Page { data: Vec<OciPool> },
}

impl OciPoolsResponse {
    fn into_pools(self) -> Vec<OciPool> {
        match self {
            OciPoolsResponse::List(pools) => pools,
            OciPoolsResponse::Page { data } => data,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Ociswap quote client.
pub struct OciswapClient {
    http: Client,
    base_url: String,
}

impl OciswapClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("radix-arb/0.1.0")
            .build()
            .context("Failed to build HTTP client for Ociswap")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn pools_url(&self, token: Option<&str>) -> String {
        match token {
            Some(t) => format!(
                "{}/pools?resource_address={}",
                self.base_url,
                urlencoding::encode(t)
            ),
            None => format!("{}/pools", self.base_url),
        }
    }

    fn side(resource: OciResource) -> QuoteSide {
        QuoteSide {
            address: resource.address,
            symbol: resource.symbol.unwrap_or_default(),
            amount: value_to_string(&resource.amount),
        }
    }

    fn to_quote(pool: OciPool) -> PoolQuote {
        build_quote(
            pool.address,
            DexKind::Ociswap,
            Self::side(pool.resource_x),
            Self::side(pool.resource_y),
            pool.price.as_ref(),
        )
    }

    /// USD reference price of a token (`price.usd.now`). Failures are
    /// logged and reported as `None`.
    pub async fn token_usd_price(&self, token: &str) -> Option<Decimal> {
        match self.fetch_token_usd_price(token).await {
            Ok(price) => price,
            Err(e) => {
                warn!(token, error = %e, "Ociswap token price lookup failed");
                None
            }
        }
    }

    async fn fetch_token_usd_price(&self, token: &str) -> Result<Option<Decimal>> {
        let url = format!("{}/tokens/{}", self.base_url, urlencoding::encode(token));
        let resp = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .context("Ociswap token request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Ociswap token API error {status}");
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse Ociswap token response")?;

        Ok(body
            .pointer("/price/usd/now")
            .and_then(decimal_from_value))
    }
}

#[async_trait]
impl DexQuoteProvider for OciswapClient {
    async fn fetch_pools(&self, token: Option<&str>) -> Result<Vec<PoolQuote>> {
        let url = self.pools_url(token);
        debug!(url = %url, "Fetching Ociswap pools");

        let resp = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .context("Ociswap API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ociswap API error {status}: {body}");
        }

        let pools: OciPoolsResponse = resp
            .json()
            .await
            .context("Failed to parse Ociswap pools response")?;

        let quotes: Vec<PoolQuote> = pools.into_pools().into_iter().map(Self::to_quote).collect();
        info!(count = quotes.len(), "Ociswap pools fetched");
        Ok(quotes)
    }

    fn kind(&self) -> DexKind {
        DexKind::Ociswap
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
