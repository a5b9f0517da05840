//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Account addresses can be referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.
//!
//! Ledger amounts are kept as strings in the file and parsed to `Decimal`
//! on access so they never pass through a float.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

use crate::dex::parse_decimal;
use crate::types::ArbError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub dex: DexConfig,
    pub scanner: ScannerConfig,
    pub wallet: WalletConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    #[serde(default = "default_epoch_window")]
    pub epoch_window: u64,
}

fn default_epoch_window() -> u64 {
    99
}

#[derive(Debug, Deserialize, Clone)]
pub struct DexConfig {
    pub timeout_secs: u64,
    pub ociswap: ProviderConfig,
    pub defiplaza: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScannerConfig {
    /// Token symbol (e.g. "hUSDC") or resource address.
    pub token: String,
    pub trade_amount: String,
    pub probe_amount: String,
    /// Minimum profit percentage to keep an opportunity.
    #[serde(default)]
    pub min_profit_percent: Option<String>,
    pub refresh_interval_secs: u64,
    /// Rank only pairs the manifest builder can express.
    #[serde(default)]
    pub supported_only: bool,
}

impl ScannerConfig {
    pub fn trade_amount(&self) -> Result<Decimal> {
        parse_amount("scanner.trade_amount", &self.trade_amount)
    }

    pub fn probe_amount(&self) -> Result<Decimal> {
        parse_amount("scanner.probe_amount", &self.probe_amount)
    }

    pub fn min_profit_percent(&self) -> Result<Option<Decimal>> {
        self.min_profit_percent
            .as_deref()
            .map(|v| parse_amount("scanner.min_profit_percent", v))
            .transpose()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// Env var holding the account to act for.
    #[serde(default)]
    pub account_env: Option<String>,
    /// Account used for read-only simulations when no account is connected.
    pub probe_account: String,
}

fn parse_amount(field: &str, value: &str) -> Result<Decimal> {
    parse_decimal(value).map_err(|e| ArbError::Config(format!("{field} = {value:?}: {e}")).into())
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Account configured through `wallet.account_env`, if set and present.
    pub fn configured_account(&self) -> Option<String> {
        self.wallet
            .account_env
            .as_deref()
            .and_then(|env| Self::resolve_env(env).ok())
            .filter(|a| !a.trim().is_empty())
    }
}
