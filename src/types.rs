//! Shared types for the arbitrage scanner.
//!
//! These types form the data model used across all modules.
//! Registry, DEX, ledger, and strategy modules depend on them without
//! depending on each other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DEX kinds
// ---------------------------------------------------------------------------

/// A supported decentralized exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DexKind {
    Ociswap,
    DefiPlaza,
    Caviar,
}

impl DexKind {
    /// All known DEX kinds.
    pub const ALL: &'static [DexKind] = &[DexKind::Ociswap, DexKind::DefiPlaza, DexKind::Caviar];

    /// Stable lowercase identifier used in config and registry data.
    pub fn as_str(&self) -> &'static str {
        match self {
            DexKind::Ociswap => "ociswap",
            DexKind::DefiPlaza => "defiplaza",
            DexKind::Caviar => "caviar",
        }
    }

    /// How this DEX's pools expect `swap` to be called, or `None` when the
    /// manifest builder has no calling convention for it.
    pub fn swap_convention(&self) -> Option<SwapConvention> {
        match self {
            DexKind::Ociswap => Some(SwapConvention::ImplicitOutput),
            DexKind::DefiPlaza => Some(SwapConvention::ExplicitOutput),
            DexKind::Caviar => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.swap_convention().is_some()
    }
}

impl fmt::Display for DexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a DEX identifier (case-insensitive).
impl std::str::FromStr for DexKind {
    type Err = ArbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ociswap" => Ok(DexKind::Ociswap),
            "defiplaza" => Ok(DexKind::DefiPlaza),
            "caviar" | "caviarnine" => Ok(DexKind::Caviar),
            other => Err(ArbError::UnsupportedDex(other.to_string())),
        }
    }
}

/// Calling convention of a pool's `swap` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapConvention {
    /// `swap(Bucket)`: the output token is fixed by the pool.
    ImplicitOutput,
    /// `swap(Bucket, Address)`: the caller names the output token.
    ExplicitOutput,
}

/// Structural sub-kind of a pool. Caviar runs two pool shapes under the same
/// DEX identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolVariant {
    Standard,
    CaviarSimple,
    CaviarShape,
}

impl fmt::Display for PoolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolVariant::Standard => write!(f, "standard"),
            PoolVariant::CaviarSimple => write!(f, "simple"),
            PoolVariant::CaviarShape => write!(f, "shape"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokens and pools
// ---------------------------------------------------------------------------

/// A fungible resource known to the registry. Identity is the address.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Token {
    pub address: &'static str,
    pub symbol: &'static str,
    pub icon_url: &'static str,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

/// Anything that identifies a pool and its two sides: registry entries and
/// live quotes both qualify.
pub trait PoolSides {
    fn address(&self) -> &str;
    fn dex(&self) -> DexKind;
    fn token0(&self) -> &str;
    fn token1(&self) -> &str;

    /// Whether `token` is either side of this pool.
    fn contains(&self, token: &str) -> bool {
        self.token0() == token || self.token1() == token
    }

    fn is_token0(&self, token: &str) -> bool {
        self.token0() == token
    }

    /// The side of the pair that is not `token`.
    fn other_token(&self, token: &str) -> Result<&str, ArbError> {
        if self.token0() == token {
            Ok(self.token1())
        } else if self.token1() == token {
            Ok(self.token0())
        } else {
            Err(ArbError::TokenNotInPool {
                token: token.to_string(),
                pool: self.address().to_string(),
            })
        }
    }

    /// Unordered pair key, equal for A/B and B/A pools.
    fn pair_key(&self) -> String {
        pair_key(self.token0(), self.token1())
    }
}

/// One on-ledger liquidity pool from the static registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub address: &'static str,
    pub dex: DexKind,
    pub variant: PoolVariant,
    pub token0: &'static str,
    pub token1: &'static str,
    pub name: &'static str,
}

impl PoolSides for Pool {
    fn address(&self) -> &str {
        self.address
    }
    fn dex(&self) -> DexKind {
        self.dex
    }
    fn token0(&self) -> &str {
        self.token0
    }
    fn token1(&self) -> &str {
        self.token1
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.dex)
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// One side of a quoted pool as reported by a DEX API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSide {
    pub address: String,
    pub symbol: String,
    /// Reserve amount as reported by the provider (kept verbatim).
    pub amount: String,
}

/// A live quote for a pool, valid for a single refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolQuote {
    pub pool_address: String,
    pub dex: DexKind,
    pub token0: QuoteSide,
    pub token1: QuoteSide,
    /// Amount of token1 per unit of token0.
    pub price: Decimal,
    /// Reciprocal of `price`, zero when `price` is zero.
    pub price_inverse: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PoolSides for PoolQuote {
    fn address(&self) -> &str {
        &self.pool_address
    }
    fn dex(&self) -> DexKind {
        self.dex
    }
    fn token0(&self) -> &str {
        &self.token0.address
    }
    fn token1(&self) -> &str {
        &self.token1.address
    }
}

impl fmt::Display for PoolQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}/{} price {} (inv {})",
            self.dex, self.token0.symbol, self.token1.symbol, self.price, self.price_inverse,
        )
    }
}

/// Build the unordered pair key for two token addresses: sorted, joined by `-`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// Reciprocal of a price, zero for a zero price.
pub fn inverse_price(price: Decimal) -> Decimal {
    if price.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE.checked_div(price).unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Arbitrage
// ---------------------------------------------------------------------------

/// Profit figures for buying on one pool and selling on another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitEstimate {
    pub cost: Decimal,
    pub proceeds: Decimal,
    /// Signed, in the other token's unit.
    pub profit: Decimal,
    /// `None` when `cost` is zero (percentage is undefined).
    pub profit_percent: Option<Decimal>,
}

impl ProfitEstimate {
    pub fn is_profitable(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

/// A ranked buy/sell pool pair for one token.
#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageOpportunity {
    pub token: String,
    pub buy: PoolQuote,
    pub sell: PoolQuote,
    pub amount: Decimal,
    pub estimate: ProfitEstimate,
}

impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = match self.estimate.profit_percent {
            Some(p) => format!("{:.2}%", p),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "buy {} -> sell {} | amount {} | profit {} ({})",
            self.buy.pool_address, self.sell.pool_address, self.amount, self.estimate.profit, pct,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum ArbError {
    #[error("Token {token} is not a side of pool {pool}")]
    TokenNotInPool { token: String, pool: String },

    #[error("Unsupported DEX: {0}")]
    UnsupportedDex(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("Ledger error (status {status}): {message}")]
    Ledger { status: u16, message: String },

    #[error("Account index {index} out of range ({available} accounts)")]
    AccountIndex { index: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
