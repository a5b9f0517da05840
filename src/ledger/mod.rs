//! Ledger access.
//!
//! Defines the `LedgerClient` trait used by the price resolver and the
//! arbitrage previewer, and the Gateway HTTP implementation.

pub mod gateway;
pub mod preview;
pub mod state;

use anyhow::Result;
use async_trait::async_trait;

use preview::{PreviewResult, ResourceAmount};

/// Abstraction over a ledger that can preview (simulate) manifests.
///
/// Implementations surface transport failures and non-success statuses as
/// errors; batch callers decide whether to drop or propagate them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Simulate `manifest` without fees or signatures and return the
    /// structured balance changes.
    async fn preview(&self, manifest: &str) -> Result<PreviewResult>;

    /// Fungible balances currently held by `component` (a pool's reserves).
    async fn pool_resources(&self, component: &str) -> Result<Vec<ResourceAmount>>;
}
