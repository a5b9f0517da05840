//! Opportunity scanner.
//!
//! Resolves quotes for a token from every DEX provider, groups them by
//! unordered token pair, ranks buy/sell combinations and turns the chosen
//! one into an arbitrage manifest.
//!
//! Registry pools that no provider quoted are priced by simulated trades
//! and listed cheapest first.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::engine::pricing::PriceResolver;
use crate::ledger::preview::ResourceAmount;
use crate::manifest::{self, TransactionManifest};
use crate::registry::{sort_by_price, PoolRegistry};
use crate::strategy::arbitrage::ArbitrageEvaluator;
use crate::types::{ArbError, ArbitrageOpportunity, Pool, PoolQuote, PoolSides};

/// A registry pool priced by simulated trade.
#[derive(Debug, Clone)]
pub struct PricedPool {
    pub pool: Pool,
    /// Base-token price of the counter token, or USD when a base USD price
    /// was supplied. `None` when the simulation failed.
    pub price: Option<Decimal>,
    pub reserves: Vec<ResourceAmount>,
}

/// Result of one scan pass for a token.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub token: String,
    pub quotes: Vec<PoolQuote>,
    /// Best profit first.
    pub opportunities: Vec<ArbitrageOpportunity>,
    /// Registry pools without a direct quote, cheapest first, unpriced last.
    pub registry_prices: Vec<PricedPool>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    /// Best opportunity whose two pools can both be expressed as manifest
    /// calls.
    pub fn best_supported(&self) -> Option<&ArbitrageOpportunity> {
        self.opportunities
            .iter()
            .find(|o| o.buy.dex.is_supported() && o.sell.dex.is_supported())
    }

    pub fn profitable_count(&self) -> usize {
        self.opportunities
            .iter()
            .filter(|o| o.estimate.is_profitable())
            .count()
    }
}

/// Quotes → pair groups → ranked opportunities.
pub struct OpportunityScanner {
    resolver: PriceResolver,
    evaluator: ArbitrageEvaluator,
}

impl OpportunityScanner {
    pub fn new(resolver: PriceResolver, evaluator: ArbitrageEvaluator) -> Self {
        Self {
            resolver,
            evaluator,
        }
    }

    pub fn resolver(&self) -> &PriceResolver {
        &self.resolver
    }

    pub fn evaluator(&self) -> &ArbitrageEvaluator {
        &self.evaluator
    }

    /// Fetch quotes for `token` and rank every cross-pool combination.
    /// Provider failures only shrink the quote set.
    pub async fn scan(&self, token: &str) -> ScanReport {
        let quotes = self.resolver.fetch_quotes(token).await;
        let opportunities = self.evaluator.find_opportunities(&quotes, token);

        let groups = group_quotes(&quotes);
        for (key, members) in &groups {
            debug!(pair = %key, pools = members.len(), "Pair group");
        }

        info!(
            token,
            quotes = quotes.len(),
            pairs = groups.len(),
            opportunities = opportunities.len(),
            "Scan complete"
        );

        ScanReport {
            token: token.to_string(),
            quotes,
            opportunities,
            registry_prices: Vec::new(),
            scanned_at: Utc::now(),
        }
    }

    /// `scan`, then price the registry pools the providers did not quote.
    pub async fn scan_with_registry(
        &self,
        registry: &PoolRegistry,
        token: &str,
        account: Option<&str>,
        base_usd: Option<Decimal>,
    ) -> ScanReport {
        let mut report = self.scan(token).await;
        report.registry_prices = self
            .price_registry(registry, token, &report.quotes, account, base_usd)
            .await;
        report
    }

    /// Simulated prices and reserves for registry pools trading `token` that
    /// are absent from `quoted`, sorted by price ascending.
    pub async fn price_registry(
        &self,
        registry: &PoolRegistry,
        token: &str,
        quoted: &[PoolQuote],
        account: Option<&str>,
        base_usd: Option<Decimal>,
    ) -> Vec<PricedPool> {
        let pools: Vec<Pool> = registry
            .pools_for_token(token)
            .into_iter()
            .filter(|p| !quoted.iter().any(|q| q.pool_address == p.address))
            .collect();
        if pools.is_empty() {
            return Vec::new();
        }

        let prices = match base_usd {
            Some(usd) => self.resolver.simulated_usd_prices(&pools, account, usd).await,
            None => self.resolver.simulated_prices(&pools, account).await,
        };
        let reserves = join_all(pools.iter().map(|p| self.resolver.pool_reserves(p.address))).await;
        let mut reserves: HashMap<&str, Vec<ResourceAmount>> =
            pools.iter().map(|p| p.address).zip(reserves).collect();

        info!(
            token,
            pools = pools.len(),
            priced = prices.len(),
            usd = base_usd.is_some(),
            "Registry pools priced"
        );

        sort_by_price(&pools, &prices)
            .into_iter()
            .map(|pool| PricedPool {
                price: prices.get(pool.address).copied(),
                reserves: reserves.remove(pool.address).unwrap_or_default(),
                pool,
            })
            .collect()
    }

    /// Arbitrage manifest for `opportunity`. The withdrawal from `account`
    /// is the estimate's `cost`, in the buy pool's counter token, so the
    /// manifest moves the same quantity the estimate priced.
    pub fn build_manifest(
        &self,
        account: &str,
        opportunity: &ArbitrageOpportunity,
    ) -> Result<TransactionManifest, ArbError> {
        for dex in [opportunity.buy.dex, opportunity.sell.dex] {
            if !dex.is_supported() {
                return Err(ArbError::UnsupportedDex(dex.to_string()));
            }
        }
        manifest::arbitrage(
            account,
            &opportunity.buy,
            &opportunity.sell,
            &opportunity.token,
            opportunity.estimate.cost,
        )
    }
}

/// Group quotes by unordered token pair. Groups keep input order.
pub fn group_quotes(quotes: &[PoolQuote]) -> BTreeMap<String, Vec<PoolQuote>> {
    let mut groups: BTreeMap<String, Vec<PoolQuote>> = BTreeMap::new();
    for quote in quotes {
        groups.entry(quote.pair_key()).or_default().push(quote.clone());
    }
    groups
}
