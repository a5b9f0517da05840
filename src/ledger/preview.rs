//! Transaction preview request and result shapes.
//!
//! Mirrors the subset of the Gateway `/transaction/preview` JSON that the
//! scanner reads. Unknown fields are ignored and absent ones default, so a
//! partially populated result still deserializes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dex::parse_decimal;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Flags for a fee-free, signature-free simulated execution.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PreviewFlags {
    pub use_free_credit: bool,
    pub assume_all_signature_proofs: bool,
    pub skip_epoch_check: bool,
}

impl PreviewFlags {
    /// Read-only simulation: free credit, no signature checks, no epoch check.
    pub fn simulation() -> Self {
        Self {
            use_free_credit: true,
            assume_all_signature_proofs: true,
            skip_epoch_check: true,
        }
    }
}

/// Body of a preview request.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewRequest {
    pub manifest: String,
    pub start_epoch_inclusive: u64,
    pub end_epoch_exclusive: u64,
    pub notary_is_signatory: bool,
    pub tip_percentage: u16,
    pub nonce: u32,
    pub signer_public_keys: Vec<serde_json::Value>,
    pub flags: PreviewFlags,
}

impl PreviewRequest {
    pub fn simulation(manifest: &str, epoch_window: u64, nonce: u32) -> Self {
        Self {
            manifest: manifest.to_string(),
            start_epoch_inclusive: 0,
            end_epoch_exclusive: epoch_window,
            notary_is_signatory: false,
            tip_percentage: 0,
            nonce,
            signer_public_keys: Vec::new(),
            flags: PreviewFlags::simulation(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Entity a balance change was recorded against.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ComponentEntity {
    #[serde(default)]
    pub entity_address: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub is_global: Option<bool>,
}

impl ComponentEntity {
    pub fn is_account(&self) -> bool {
        self.entity_type
            .as_deref()
            .map(|t| t.contains("Account"))
            .unwrap_or(false)
    }
}

/// A single balance change.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceChange {
    #[serde(default)]
    pub resource_address: Option<String>,
    #[serde(default)]
    pub component_entity: Option<ComponentEntity>,
    /// Signed amount as a decimal string.
    #[serde(default)]
    pub amount: Option<String>,
}

/// Balance changes produced by one manifest instruction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceChangeGroup {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeeSummary {
    #[serde(default)]
    pub execution_cost_sum: Option<String>,
    #[serde(default)]
    pub xrd_total_execution_cost: Option<String>,
}

impl FeeSummary {
    fn execution_cost(&self) -> Option<Decimal> {
        self.execution_cost_sum
            .as_deref()
            .or(self.xrd_total_execution_cost.as_deref())
            .and_then(|s| parse_decimal(s).ok())
    }
}

/// Structured preview response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PreviewResult {
    #[serde(default)]
    pub resource_changes: Vec<ResourceChangeGroup>,
    #[serde(default)]
    pub fee_summary: Option<FeeSummary>,
    #[serde(default)]
    pub receipt: Option<serde_json::Value>,
    #[serde(default)]
    pub logs: Option<serde_json::Value>,
}

/// An amount of one fungible resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceAmount {
    pub resource_address: String,
    pub amount: Decimal,
}

impl PreviewResult {
    /// Positive balance changes recorded in accounts.
    ///
    /// Only groups whose first entry belongs to an account are considered;
    /// vault and component deltas are skipped. Entries with a missing or
    /// unparsable amount are ignored.
    pub fn account_deposits(&self) -> Vec<ResourceAmount> {
        let mut deposits = Vec::new();
        for group in &self.resource_changes {
            let first_is_account = group
                .resource_changes
                .first()
                .and_then(|c| c.component_entity.as_ref())
                .map(ComponentEntity::is_account)
                .unwrap_or(false);
            if !first_is_account {
                continue;
            }
            for change in &group.resource_changes {
                let (Some(resource), Some(amount)) = (&change.resource_address, &change.amount)
                else {
                    continue;
                };
                match parse_decimal(amount) {
                    Ok(a) if a > Decimal::ZERO => deposits.push(ResourceAmount {
                        resource_address: resource.clone(),
                        amount: a,
                    }),
                    _ => {}
                }
            }
        }
        deposits
    }

    /// First positive account deposit of `resource`, if any.
    pub fn deposited(&self, resource: &str) -> Option<Decimal> {
        self.account_deposits()
            .into_iter()
            .find(|r| r.resource_address == resource)
            .map(|r| r.amount)
    }

    /// Execution fees, preferring the top-level summary over the receipt's.
    pub fn execution_fees(&self) -> Decimal {
        if let Some(fee) = self.fee_summary.as_ref().and_then(FeeSummary::execution_cost) {
            return fee;
        }
        self.receipt
            .as_ref()
            .and_then(|r| r.get("fee_summary"))
            .and_then(|v| serde_json::from_value::<FeeSummary>(v.clone()).ok())
            .and_then(|f| f.execution_cost())
            .unwrap_or(Decimal::ZERO)
    }

    /// Receipt status string ("Succeeded", "Failed", ...), when present.
    pub fn receipt_status(&self) -> Option<&str> {
        self.receipt
            .as_ref()
            .and_then(|r| r.get("status"))
            .and_then(|s| s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
