//! Transaction manifest construction.
//!
//! Manifests are built from typed instructions and rendered to the ledger's
//! text format. Rendering is a pure function of the inputs: the same inputs
//! always produce byte-identical text.
//!
//! Amounts are `Decimal` and rendered in canonical decimal syntax (no
//! exponent, no trailing zeros, at most 18 fractional digits).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fmt;
use tracing::warn;

use crate::types::{ArbError, DexKind, PoolSides, SwapConvention};

/// Fractional digits supported by the ledger's `Decimal` type.
const LEDGER_DECIMAL_PLACES: u32 = 18;

/// Fee locked by simulated-trade probes.
pub const PROBE_LOCK_FEE: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Manifest model
// ---------------------------------------------------------------------------

/// An argument to a manifest instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValue {
    Address(String),
    Decimal(Decimal),
    Bucket(String),
    Expression(String),
}

impl fmt::Display for ManifestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestValue::Address(a) => write!(f, "Address(\"{a}\")"),
            ManifestValue::Decimal(d) => write!(f, "Decimal(\"{}\")", format_decimal(*d)),
            ManifestValue::Bucket(b) => write!(f, "Bucket(\"{b}\")"),
            ManifestValue::Expression(e) => write!(f, "Expression(\"{e}\")"),
        }
    }
}

/// A single manifest instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    CallMethod {
        address: String,
        method: String,
        args: Vec<ManifestValue>,
    },
    TakeFromWorktop {
        resource: String,
        amount: Decimal,
        bucket: String,
    },
    TakeAllFromWorktop {
        resource: String,
        bucket: String,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::CallMethod { address, method, args } => {
                writeln!(f, "CALL_METHOD")?;
                writeln!(f, "    {}", ManifestValue::Address(address.clone()))?;
                writeln!(f, "    \"{method}\"")?;
                for arg in args {
                    writeln!(f, "    {arg}")?;
                }
            }
            Instruction::TakeFromWorktop { resource, amount, bucket } => {
                writeln!(f, "TAKE_FROM_WORKTOP")?;
                writeln!(f, "    {}", ManifestValue::Address(resource.clone()))?;
                writeln!(f, "    {}", ManifestValue::Decimal(*amount))?;
                writeln!(f, "    {}", ManifestValue::Bucket(bucket.clone()))?;
            }
            Instruction::TakeAllFromWorktop { resource, bucket } => {
                writeln!(f, "TAKE_ALL_FROM_WORKTOP")?;
                writeln!(f, "    {}", ManifestValue::Address(resource.clone()))?;
                writeln!(f, "    {}", ManifestValue::Bucket(bucket.clone()))?;
            }
        }
        writeln!(f, ";")
    }
}

/// An ordered list of instructions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionManifest {
    instructions: Vec<Instruction>,
}

impl TransactionManifest {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of `swap` calls in the manifest.
    pub fn swap_count(&self) -> usize {
        self.count_method("swap")
    }

    /// Number of calls to `method` on any component.
    pub fn count_method(&self, name: &str) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::CallMethod { method, .. } if method == name))
            .count()
    }

    /// Render to manifest text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransactionManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// Render a decimal the way the ledger's manifest parser expects it.
pub fn format_decimal(value: Decimal) -> String {
    value
        .round_dp_with_strategy(LEDGER_DECIMAL_PLACES, RoundingStrategy::ToZero)
        .normalize()
        .to_string()
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for manifests.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    instructions: Vec<Instruction>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_method(mut self, address: &str, method: &str, args: Vec<ManifestValue>) -> Self {
        self.instructions.push(Instruction::CallMethod {
            address: address.to_string(),
            method: method.to_string(),
            args,
        });
        self
    }

    pub fn lock_fee(self, account: &str, amount: Decimal) -> Self {
        self.call_method(account, "lock_fee", vec![ManifestValue::Decimal(amount)])
    }

    pub fn withdraw(self, account: &str, resource: &str, amount: Decimal) -> Self {
        self.call_method(
            account,
            "withdraw",
            vec![
                ManifestValue::Address(resource.to_string()),
                ManifestValue::Decimal(amount),
            ],
        )
    }

    pub fn take_from_worktop(mut self, resource: &str, amount: Decimal, bucket: &str) -> Self {
        self.instructions.push(Instruction::TakeFromWorktop {
            resource: resource.to_string(),
            amount,
            bucket: bucket.to_string(),
        });
        self
    }

    pub fn take_all_from_worktop(mut self, resource: &str, bucket: &str) -> Self {
        self.instructions.push(Instruction::TakeAllFromWorktop {
            resource: resource.to_string(),
            bucket: bucket.to_string(),
        });
        self
    }

    /// Call a pool's `swap` with the given convention.
    pub fn swap(
        self,
        pool: &str,
        convention: SwapConvention,
        bucket: &str,
        output: &str,
    ) -> Self {
        let mut args = vec![ManifestValue::Bucket(bucket.to_string())];
        if convention == SwapConvention::ExplicitOutput {
            args.push(ManifestValue::Address(output.to_string()));
        }
        self.call_method(pool, "swap", args)
    }

    pub fn deposit_batch(self, account: &str) -> Self {
        self.call_method(
            account,
            "deposit_batch",
            vec![ManifestValue::Expression("ENTIRE_WORKTOP".to_string())],
        )
    }

    pub fn build(self) -> TransactionManifest {
        TransactionManifest {
            instructions: self.instructions,
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), ArbError> {
    if amount <= Decimal::ZERO {
        return Err(ArbError::InvalidAmount(format!("{amount} must be positive")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-hop swaps
// ---------------------------------------------------------------------------

/// Single swap shape shared by every DEX: withdraw, isolate, swap, deposit.
fn single_swap(
    account: &str,
    pool: &str,
    convention: SwapConvention,
    bucket: &str,
    token_in: &str,
    token_out: &str,
    amount_in: Decimal,
) -> Result<TransactionManifest, ArbError> {
    ensure_positive(amount_in)?;
    Ok(ManifestBuilder::new()
        .withdraw(account, token_in, amount_in)
        .take_from_worktop(token_in, amount_in, bucket)
        .swap(pool, convention, bucket, token_out)
        .deposit_batch(account)
        .build())
}

/// Swap through an Ociswap pool. The output token is implied by the pool.
pub fn ociswap_swap(
    account: &str,
    pool: &str,
    token_in: &str,
    amount_in: Decimal,
) -> Result<TransactionManifest, ArbError> {
    single_swap(
        account,
        pool,
        SwapConvention::ImplicitOutput,
        "tokens_in",
        token_in,
        "",
        amount_in,
    )
}

/// Swap through a DefiPlaza pair, naming the output token explicitly.
pub fn defiplaza_swap(
    account: &str,
    pool: &str,
    token_in: &str,
    token_out: &str,
    amount_in: Decimal,
) -> Result<TransactionManifest, ArbError> {
    single_swap(
        account,
        pool,
        SwapConvention::ExplicitOutput,
        "input_bucket",
        token_in,
        token_out,
        amount_in,
    )
}

/// Dispatch a single swap by DEX kind. Kinds without a known convention are
/// rejected.
pub fn single_swap_for(
    dex: DexKind,
    account: &str,
    pool: &str,
    token_in: &str,
    token_out: &str,
    amount_in: Decimal,
) -> Result<TransactionManifest, ArbError> {
    match dex {
        DexKind::Ociswap => ociswap_swap(account, pool, token_in, amount_in),
        DexKind::DefiPlaza => defiplaza_swap(account, pool, token_in, token_out, amount_in),
        other => Err(ArbError::UnsupportedDex(other.to_string())),
    }
}

/// Probe manifest used to infer a pool's price from a preview: lock a fee,
/// withdraw `amount` of `base`, swap all of it through `pool`, deposit.
///
/// Pools without a known convention are probed with a bucket-only `swap`;
/// a failing preview just leaves the pool unpriced.
pub fn probe_swap(
    account: &str,
    pool: &impl PoolSides,
    base: &str,
    amount: Decimal,
) -> Result<TransactionManifest, ArbError> {
    ensure_positive(amount)?;
    let output = pool.other_token(base)?;
    let convention = pool
        .dex()
        .swap_convention()
        .unwrap_or(SwapConvention::ImplicitOutput);

    Ok(ManifestBuilder::new()
        .lock_fee(account, PROBE_LOCK_FEE)
        .withdraw(account, base, amount)
        .take_all_from_worktop(base, "probe_bucket")
        .swap(pool.address(), convention, "probe_bucket", output)
        .deposit_batch(account)
        .build())
}

// ---------------------------------------------------------------------------
// Two-hop arbitrage
// ---------------------------------------------------------------------------

/// Buy `token` on `buy` with the buy pool's other side, then sell everything
/// received on `sell`, and deposit the whole worktop back to `account`.
///
/// `amount` is the amount of the buy pool's other token withdrawn. A pool
/// whose DEX has no calling convention is skipped (logged) instead of
/// rendering an invalid call; callers should check `DexKind::is_supported`
/// first. A token absent from either pool is an error.
pub fn arbitrage(
    account: &str,
    buy: &impl PoolSides,
    sell: &impl PoolSides,
    token: &str,
    amount: Decimal,
) -> Result<TransactionManifest, ArbError> {
    ensure_positive(amount)?;
    let buy_other = buy.other_token(token)?;
    let sell_other = sell.other_token(token)?;

    let mut builder = ManifestBuilder::new().withdraw(account, buy_other, amount);

    match buy.dex().swap_convention() {
        Some(convention) => {
            builder = builder
                .take_from_worktop(buy_other, amount, "buy_tokens")
                .swap(buy.address(), convention, "buy_tokens", token);
        }
        None => warn!(pool = buy.address(), dex = %buy.dex(), "Buy pool DEX unsupported, swap omitted"),
    }

    match sell.dex().swap_convention() {
        Some(convention) => {
            builder = builder
                .take_all_from_worktop(token, "sell_tokens")
                .swap(sell.address(), convention, "sell_tokens", sell_other);
        }
        None => warn!(pool = sell.address(), dex = %sell.dex(), "Sell pool DEX unsupported, swap omitted"),
    }

    Ok(builder.deposit_batch(account).build())
}

/// Round trip from `base` through `buy` and back through `sell`, taking the
/// full worktop balance between hops.
pub fn round_trip(
    account: &str,
    base: &str,
    buy: &impl PoolSides,
    sell: &impl PoolSides,
    amount: Decimal,
) -> Result<TransactionManifest, ArbError> {
    ensure_positive(amount)?;
    let intermediate = buy.other_token(base)?;
    // The sell pool has to trade the intermediate token back into base.
    if sell.other_token(intermediate)? != base {
        return Err(ArbError::TokenNotInPool {
            token: base.to_string(),
            pool: sell.address().to_string(),
        });
    }

    let mut builder = ManifestBuilder::new()
        .withdraw(account, base, amount)
        .take_all_from_worktop(base, "base_bucket");

    match buy.dex().swap_convention() {
        Some(convention) => {
            builder = builder.swap(buy.address(), convention, "base_bucket", intermediate);
        }
        None => return Err(ArbError::UnsupportedDex(buy.dex().to_string())),
    }

    match sell.dex().swap_convention() {
        Some(convention) => {
            builder = builder
                .take_all_from_worktop(intermediate, "token_bucket")
                .swap(sell.address(), convention, "token_bucket", base);
        }
        None => return Err(ArbError::UnsupportedDex(sell.dex().to_string())),
    }

    Ok(builder.deposit_batch(account).build())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
