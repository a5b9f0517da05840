//! Gateway `/state/entity/details` models.
//!
//! Used to read the fungible balances held by a pool component. Balances
//! are requested per vault and summed per resource; a globally aggregated
//! entry is read from its `amount` directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::preview::ResourceAmount;
use crate::dex::parse_decimal;

#[derive(Debug, Clone, Serialize)]
pub struct EntityDetailsRequest {
    pub addresses: Vec<String>,
    pub aggregation_level: String,
}

impl EntityDetailsRequest {
    pub fn vaults_of(address: &str) -> Self {
        Self {
            addresses: vec![address.to_string()],
            aggregation_level: "Vault".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDetailsResponse {
    #[serde(default)]
    pub items: Vec<EntityDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDetails {
    pub address: String,
    #[serde(default)]
    pub fungible_resources: Option<Page<FungibleResource>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FungibleResource {
    pub resource_address: String,
    /// Present with global aggregation.
    #[serde(default)]
    pub amount: Option<String>,
    /// Present with vault aggregation.
    #[serde(default)]
    pub vaults: Option<Page<VaultBalance>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultBalance {
    #[serde(default)]
    pub vault_address: Option<String>,
    pub amount: String,
}

impl FungibleResource {
    /// Total balance across vaults. Unparsable amounts are skipped.
    pub fn total(&self) -> Decimal {
        let global = self.amount.iter().map(String::as_str);
        let vaults = self
            .vaults
            .iter()
            .flat_map(|page| page.items.iter().map(|v| v.amount.as_str()));

        global
            .chain(vaults)
            .filter_map(|raw| match parse_decimal(raw) {
                Ok(d) => Some(d),
                Err(e) => {
                    debug!(resource = %self.resource_address, amount = raw, error = %e, "Skipping balance");
                    None
                }
            })
            .fold(Decimal::ZERO, |acc, d| acc.checked_add(d).unwrap_or(acc))
    }
}

impl EntityDetailsResponse {
    /// Fungible balances of `address`, in response order. Empty when the
    /// entity is absent.
    pub fn fungible_balances(&self, address: &str) -> Vec<ResourceAmount> {
        self.items
            .iter()
            .find(|item| item.address == address)
            .and_then(|item| item.fungible_resources.as_ref())
            .map(|page| {
                page.items
                    .iter()
                    .map(|r| ResourceAmount {
                        resource_address: r.resource_address.clone(),
                        amount: r.total(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
