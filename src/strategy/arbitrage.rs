//! Cross-pool arbitrage evaluation.
//!
//! Given two quoted pools that both trade a token, estimate the result of
//! buying the token on one and selling it on the other. Each pool's side
//! assignment is resolved independently: token0/token1 ordering is not
//! consistent across pools or DEXes.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::types::{ArbError, ArbitrageOpportunity, PoolQuote, PoolSides, ProfitEstimate};

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Estimate profit for buying `amount` of `token` on `buy` and selling it on
/// `sell`.
///
/// The buy leg uses `price_inverse` when the token is the pool's token0 and
/// `price` otherwise; the sell leg does the opposite. `profit_percent` is
/// `None` when the cost is zero; a ratio too large to represent is an
/// `Overflow` error, same as the other arithmetic steps.
pub fn evaluate(
    buy: &PoolQuote,
    sell: &PoolQuote,
    amount: Decimal,
    token: &str,
) -> Result<ProfitEstimate, ArbError> {
    if amount <= Decimal::ZERO {
        return Err(ArbError::InvalidAmount(format!("{amount} must be positive")));
    }
    // Both pools must trade the token.
    buy.other_token(token)?;
    sell.other_token(token)?;

    let buy_price = if buy.is_token0(token) { buy.price_inverse } else { buy.price };
    let sell_price = if sell.is_token0(token) { sell.price } else { sell.price_inverse };

    let cost = amount
        .checked_mul(buy_price)
        .ok_or_else(|| ArbError::Overflow(format!("{amount} * {buy_price}")))?;
    let proceeds = amount
        .checked_mul(sell_price)
        .ok_or_else(|| ArbError::Overflow(format!("{amount} * {sell_price}")))?;
    let profit = proceeds
        .checked_sub(cost)
        .ok_or_else(|| ArbError::Overflow(format!("{proceeds} - {cost}")))?;

    let profit_percent = if cost.is_zero() {
        None
    } else {
        let percent = profit
            .checked_div(cost)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(|| ArbError::Overflow(format!("{profit} / {cost} * 100")))?;
        Some(percent)
    };

    Ok(ProfitEstimate {
        cost,
        proceeds,
        profit,
        profit_percent,
    })
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Ranking parameters.
#[derive(Debug, Clone)]
pub struct ArbitrageConfig {
    /// Size of the estimate, in units of the arbitraged token. The
    /// manifest withdrawal is the estimate's `cost`, in the buy pool's
    /// counter token.
    pub amount: Decimal,
    /// Keep only opportunities at or above this profit percentage.
    pub min_profit_percent: Option<Decimal>,
    /// Keep only pairs whose DEXes the manifest builder supports.
    pub supported_only: bool,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            amount: dec!(100),
            min_profit_percent: None,
            supported_only: false,
        }
    }
}

/// Ranks buy/sell pool pairs for a token.
pub struct ArbitrageEvaluator {
    config: ArbitrageConfig,
}

impl ArbitrageEvaluator {
    pub fn new(config: ArbitrageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbitrageConfig {
        &self.config
    }

    /// Evaluate every ordered pair of distinct quoted pools that trade
    /// `token` against the same counterpart, best profit first.
    ///
    /// Pools without a price are skipped. Ties keep input order.
    pub fn find_opportunities(&self, quotes: &[PoolQuote], token: &str) -> Vec<ArbitrageOpportunity> {
        let candidates: Vec<&PoolQuote> = quotes
            .iter()
            .filter(|q| q.contains(token) && !q.price.is_zero())
            .filter(|q| !self.config.supported_only || q.dex.is_supported())
            .collect();

        let mut opportunities = Vec::new();

        for buy in &candidates {
            for sell in &candidates {
                if buy.pool_address == sell.pool_address || buy.pair_key() != sell.pair_key() {
                    continue;
                }
                match evaluate(buy, sell, self.config.amount, token) {
                    Ok(estimate) => {
                        if !self.passes_threshold(&estimate) {
                            continue;
                        }
                        opportunities.push(ArbitrageOpportunity {
                            token: token.to_string(),
                            buy: (*buy).clone(),
                            sell: (*sell).clone(),
                            amount: self.config.amount,
                            estimate,
                        });
                    }
                    Err(e) => {
                        debug!(
                            buy = %buy.pool_address,
                            sell = %sell.pool_address,
                            error = %e,
                            "Pair evaluation failed"
                        );
                    }
                }
            }
        }

        // Best opportunities first
        opportunities.sort_by(|a, b| b.estimate.profit.cmp(&a.estimate.profit));

        debug!(
            token,
            candidates = candidates.len(),
            opportunities = opportunities.len(),
            best = ?opportunities.first().map(|o| o.estimate.profit.to_f64()),
            "Arbitrage pairs ranked"
        );

        opportunities
    }

    fn passes_threshold(&self, estimate: &ProfitEstimate) -> bool {
        match self.config.min_profit_percent {
            None => true,
            Some(min) => estimate.profit_percent.map_or(false, |p| p >= min),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
