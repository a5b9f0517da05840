//! Radix Gateway API client.
//!
//! Uses the preview endpoint and the entity state endpoint; the scanner never
//! signs or submits.
//!
//! API docs: https://radix-babylon-gateway-api.redoc.ly/
//! Base URL: https://mainnet.radixdlt.com

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::preview::{PreviewRequest, PreviewResult, ResourceAmount};
use super::state::{EntityDetailsRequest, EntityDetailsResponse};
use super::LedgerClient;
use crate::types::ArbError;

pub const DEFAULT_BASE_URL: &str = "https://mainnet.radixdlt.com";

/// Epoch window used by read-only previews (epoch checks are skipped).
const DEFAULT_EPOCH_WINDOW: u64 = 99;

const DEFAULT_NONCE: u32 = 2;

/// Gateway preview client.
pub struct GatewayClient {
    http: Client,
    base_url: String,
    epoch_window: u64,
    nonce: u32,
}

impl GatewayClient {
    /// Create a client against `base_url` (defaults to mainnet).
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("radix-arb/0.1.0")
            .build()
            .context("Failed to build HTTP client for Gateway")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            epoch_window: DEFAULT_EPOCH_WINDOW,
            nonce: DEFAULT_NONCE,
        })
    }

    /// Override the preview epoch window.
    pub fn with_epoch_window(mut self, epoch_window: u64) -> Self {
        self.epoch_window = epoch_window;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Gateway {what} request failed"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            return Err(ArbError::Ledger {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse Gateway {what} response"))
    }
}

#[async_trait]
impl LedgerClient for GatewayClient {
    async fn preview(&self, manifest: &str) -> Result<PreviewResult> {
        let body = PreviewRequest::simulation(manifest, self.epoch_window, self.nonce);

        debug!(manifest_len = manifest.len(), "Previewing transaction");

        let result: PreviewResult = self.post_json("/transaction/preview", &body, "preview").await?;

        debug!(
            groups = result.resource_changes.len(),
            status = ?result.receipt_status(),
            "Preview complete"
        );

        Ok(result)
    }

    async fn pool_resources(&self, component: &str) -> Result<Vec<ResourceAmount>> {
        let body = EntityDetailsRequest::vaults_of(component);
        let details: EntityDetailsResponse = self
            .post_json("/state/entity/details", &body, "entity details")
            .await?;

        let balances = details.fungible_balances(component);
        debug!(component, resources = balances.len(), "Pool resources fetched");
        Ok(balances)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
