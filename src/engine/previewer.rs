//! Arbitrage preview.
//!
//! Runs a built manifest through the ledger's preview and reports what the
//! acting account would get back. Errors from the ledger are returned to the
//! caller as-is.

use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::ledger::preview::PreviewResult;
use crate::ledger::LedgerClient;
use crate::manifest::TransactionManifest;

/// Outcome of previewing an arbitrage manifest.
#[derive(Debug, Clone)]
pub struct ArbitragePreview {
    /// Amount of the return token deposited back to the account.
    pub returned: Decimal,
    /// Execution fees reported by the preview.
    pub fees: Decimal,
    /// `returned - amount_in`, before fees.
    pub gross_profit: Decimal,
    pub receipt_status: Option<String>,
    pub raw: PreviewResult,
}

impl ArbitragePreview {
    pub fn is_profitable(&self) -> bool {
        self.gross_profit > Decimal::ZERO
    }
}

pub struct ArbitragePreviewer {
    ledger: Arc<dyn LedgerClient>,
}

impl ArbitragePreviewer {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Preview `manifest`, which spends `amount_in` of `return_token` and is
    /// expected to deposit `return_token` back.
    pub async fn preview(
        &self,
        manifest: &TransactionManifest,
        return_token: &str,
        amount_in: Decimal,
    ) -> Result<ArbitragePreview> {
        let raw = self.ledger.preview(&manifest.render()).await?;

        let returned = raw.deposited(return_token).unwrap_or(Decimal::ZERO);
        let fees = raw.execution_fees();
        let gross_profit = returned - amount_in;
        let receipt_status = raw.receipt_status().map(str::to_string);

        info!(
            returned = %returned,
            amount_in = %amount_in,
            gross_profit = %gross_profit,
            fees = %fees,
            status = ?receipt_status,
            "Arbitrage preview"
        );

        Ok(ArbitragePreview {
            returned,
            fees,
            gross_profit,
            receipt_status,
            raw,
        })
    }
}
