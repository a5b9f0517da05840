//! Mock ledger for integration testing.
//!
//! Provides a deterministic `LedgerClient` that answers every preview with
//! configured account deposits and records the manifests it was given.
//! Pool resources are served from a per-component table.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use radix_arb::dex::parse_decimal;
use radix_arb::ledger::preview::{PreviewResult, ResourceAmount};
use radix_arb::ledger::LedgerClient;

/// In-memory ledger. Deposits and fees are controllable from test code.
#[derive(Clone, Default)]
pub struct MockLedger {
    deposits: Arc<Mutex<HashMap<String, String>>>,
    fee: Arc<Mutex<Option<String>>>,
    manifests: Arc<Mutex<Vec<String>>>,
    /// If set, every preview fails with this error.
    force_error: Arc<Mutex<Option<String>>>,
    /// Previews whose manifest contains the key fail.
    fail_on: Arc<Mutex<Vec<String>>>,
    /// Deposits used instead of `deposits` when the manifest contains the key.
    overrides: Arc<Mutex<Vec<(String, String, String)>>>,
    resources: Arc<Mutex<HashMap<String, Vec<(String, String)>>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `amount` of `resource` deposited to the account.
    pub fn deposit(&self, resource: &str, amount: &str) -> &Self {
        self.deposits
            .lock()
            .unwrap()
            .insert(resource.to_string(), amount.to_string());
        self
    }

    /// Report only `amount` of `resource` for previews mentioning `needle`.
    pub fn deposit_when_contains(&self, needle: &str, resource: &str, amount: &str) {
        self.overrides.lock().unwrap().push((
            needle.to_string(),
            resource.to_string(),
            amount.to_string(),
        ));
    }

    /// Balances returned by `pool_resources(component)`.
    pub fn hold(&self, component: &str, resource: &str, amount: &str) {
        self.resources
            .lock()
            .unwrap()
            .entry(component.to_string())
            .or_default()
            .push((resource.to_string(), amount.to_string()));
    }

    pub fn set_fee(&self, fee: &str) {
        *self.fee.lock().unwrap() = Some(fee.to_string());
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_when_contains(&self, needle: &str) {
        self.fail_on.lock().unwrap().push(needle.to_string());
    }

    pub fn manifests(&self) -> Vec<String> {
        self.manifests.lock().unwrap().clone()
    }

    fn result(&self, manifest: &str) -> PreviewResult {
        let overridden: Option<HashMap<String, String>> = self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _, _)| manifest.contains(needle.as_str()))
            .map(|(_, resource, amount)| HashMap::from([(resource.clone(), amount.clone())]));
        let deposits = overridden.unwrap_or_else(|| self.deposits.lock().unwrap().clone());
        let changes: Vec<_> = deposits
            .iter()
            .map(|(resource, amount)| {
                json!({
                    "index": 0,
                    "resource_changes": [{
                        "resource_address": resource,
                        "component_entity": {
                            "entity_address": "account_rdx1mock",
                            "entity_type": "GlobalAccount"
                        },
                        "amount": amount
                    }]
                })
            })
            .collect();

        let mut body = json!({
            "resource_changes": changes,
            "receipt": { "status": "Succeeded" }
        });
        if let Some(fee) = self.fee.lock().unwrap().clone() {
            body["fee_summary"] = json!({ "execution_cost_sum": fee });
        }
        serde_json::from_value(body).unwrap()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn preview(&self, manifest: &str) -> Result<PreviewResult> {
        self.manifests.lock().unwrap().push(manifest.to_string());

        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        if self
            .fail_on
            .lock()
            .unwrap()
            .iter()
            .any(|needle| manifest.contains(needle.as_str()))
        {
            return Err(anyhow!("preview rejected"));
        }
        Ok(self.result(manifest))
    }

    async fn pool_resources(&self, component: &str) -> Result<Vec<ResourceAmount>> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        let held = self.resources.lock().unwrap();
        Ok(held
            .get(component)
            .map(|balances| {
                balances
                    .iter()
                    .map(|(resource, amount)| ResourceAmount {
                        resource_address: resource.clone(),
                        amount: parse_decimal(amount).unwrap(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
