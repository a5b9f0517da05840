//! Price resolution.
//!
//! Two strategies:
//! - direct quotes from DEX REST providers, fetched concurrently; a failing
//!   provider contributes nothing and never cancels the others
//! - simulated trades: preview a probe swap per pool through the ledger and
//!   infer the unit price from the amount received
//!
//! Missing entries in either result mean "no quote", never zero.
//!
//! Pool reserves are read from the ledger's entity state; a failed lookup
//! yields an empty list.

use anyhow::Result;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::dex::DexQuoteProvider;
use crate::ledger::preview::ResourceAmount;
use crate::ledger::LedgerClient;
use crate::manifest;
use crate::registry::tokens::XRD;
use crate::types::{PoolQuote, PoolSides};

/// Simulated-trade probe settings.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Token withdrawn and swapped by the probe.
    pub base_token: String,
    /// Amount of the base token per probe.
    pub amount: Decimal,
    /// Account used when the caller has no connected account.
    pub fallback_account: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_token: XRD.to_string(),
            amount: dec!(1000),
            fallback_account: "account_rdx128dtethfy8ujrsfdztemyjk0kvhnah6dafr57frz85dcw2c8z0td87"
                .to_string(),
        }
    }
}

/// Resolves live prices for pools.
pub struct PriceResolver {
    providers: Vec<Arc<dyn DexQuoteProvider>>,
    ledger: Arc<dyn LedgerClient>,
    probe: ProbeConfig,
}

impl PriceResolver {
    pub fn new(
        providers: Vec<Arc<dyn DexQuoteProvider>>,
        ledger: Arc<dyn LedgerClient>,
        probe: ProbeConfig,
    ) -> Self {
        Self {
            providers,
            ledger,
            probe,
        }
    }

    pub fn probe_config(&self) -> &ProbeConfig {
        &self.probe
    }

    // -- Direct quotes ---------------------------------------------------

    /// Fetch quotes for pools trading `token` from every provider.
    ///
    /// Providers run concurrently; results keep provider order. A provider
    /// error is logged and contributes no quotes.
    pub async fn fetch_quotes(&self, token: &str) -> Vec<PoolQuote> {
        let fetches = self.providers.iter().map(|provider| async move {
            (provider.name().to_string(), provider.fetch_pools(Some(token)).await)
        });

        let mut quotes = Vec::new();
        for (name, result) in join_all(fetches).await {
            match result {
                Ok(batch) => {
                    debug!(provider = %name, count = batch.len(), "Quotes received");
                    quotes.extend(batch);
                }
                Err(e) => {
                    warn!(provider = %name, error = %e, "Quote provider failed, continuing");
                }
            }
        }

        info!(token, total = quotes.len(), "Direct quotes resolved");
        quotes
    }

    // -- Simulated trades ------------------------------------------------

    /// Unit price of each pool's counter token in base-token terms, inferred
    /// from probe previews. `account` falls back to the configured probe
    /// account. Pools that fail to preview, or whose counter token does not
    /// reach the account, are omitted.
    pub async fn simulated_prices<P>(&self, pools: &[P], account: Option<&str>) -> HashMap<String, Decimal>
    where
        P: PoolSides + Sync,
    {
        let account = account
            .filter(|a| !a.is_empty())
            .unwrap_or(self.probe.fallback_account.as_str());

        let probes = pools.iter().map(|pool| async move {
            match self.probe_pool(pool, account).await {
                Ok(Some(price)) => Some((pool.address().to_string(), price)),
                Ok(None) => {
                    debug!(pool = pool.address(), "Probe returned no counter token");
                    None
                }
                Err(e) => {
                    warn!(pool = pool.address(), error = %e, "Probe preview failed");
                    None
                }
            }
        });

        let prices: HashMap<String, Decimal> = join_all(probes).await.into_iter().flatten().collect();

        info!(pools = pools.len(), priced = prices.len(), "Simulated prices resolved");
        prices
    }

    /// Simulated prices converted to USD with the base token's USD price.
    pub async fn simulated_usd_prices<P>(
        &self,
        pools: &[P],
        account: Option<&str>,
        base_usd: Decimal,
    ) -> HashMap<String, Decimal>
    where
        P: PoolSides + Sync,
    {
        to_usd(self.simulated_prices(pools, account).await, base_usd)
    }

    /// Preview one probe swap and derive `probe_amount / received`.
    pub async fn probe_pool(&self, pool: &impl PoolSides, account: &str) -> Result<Option<Decimal>> {
        let target = pool.other_token(&self.probe.base_token)?.to_string();
        let manifest = manifest::probe_swap(account, pool, &self.probe.base_token, self.probe.amount)?;

        let result = self.ledger.preview(&manifest.render()).await?;

        let price = result
            .deposited(&target)
            .filter(|received| *received > Decimal::ZERO)
            .and_then(|received| self.probe.amount.checked_div(received));

        if let Some(p) = price {
            debug!(pool = pool.address(), price = %p, "Probe priced");
        }
        Ok(price)
    }

    // -- Reserves --------------------------------------------------------

    /// Fungible balances held by `component`. Empty when the lookup fails.
    pub async fn pool_reserves(&self, component: &str) -> Vec<ResourceAmount> {
        match self.ledger.pool_resources(component).await {
            Ok(balances) => balances,
            Err(e) => {
                warn!(pool = component, error = %e, "Pool resources lookup failed");
                Vec::new()
            }
        }
    }
}

/// Multiply every price by `base_usd`, dropping entries that overflow.
pub fn to_usd(prices: HashMap<String, Decimal>, base_usd: Decimal) -> HashMap<String, Decimal> {
    prices
        .into_iter()
        .filter_map(|(pool, price)| price.checked_mul(base_usd).map(|usd| (pool, usd)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
