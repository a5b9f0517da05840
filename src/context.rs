//! Application context.
//!
//! Owns every network client and the wallet session. Built once at startup
//! and passed by reference to whatever needs ledger, DEX or account access;
//! `dispose` ends the session.

use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::AppConfig;
use crate::dex::defiplaza::DefiPlazaClient;
use crate::dex::ociswap::OciswapClient;
use crate::dex::DexQuoteProvider;
use crate::engine::previewer::ArbitragePreviewer;
use crate::engine::pricing::{PriceResolver, ProbeConfig};
use crate::ledger::gateway::GatewayClient;
use crate::ledger::LedgerClient;
use crate::registry::PoolRegistry;
use crate::types::ArbError;
use crate::wallet::{WalletAccount, WalletSession};

pub struct AppContext {
    ledger: Arc<dyn LedgerClient>,
    providers: Vec<Arc<dyn DexQuoteProvider>>,
    ociswap: Option<Arc<OciswapClient>>,
    registry: PoolRegistry,
    wallet: WalletSession,
    probe: ProbeConfig,
}

impl AppContext {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        providers: Vec<Arc<dyn DexQuoteProvider>>,
        probe: ProbeConfig,
    ) -> Self {
        Self {
            ledger,
            providers,
            ociswap: None,
            registry: PoolRegistry::mainnet(),
            wallet: WalletSession::new(),
            probe,
        }
    }

    /// Build the gateway client, the enabled DEX providers and a wallet
    /// session seeded from the configured account.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let gateway = GatewayClient::new(
            cfg.gateway.base_url.clone(),
            Duration::from_secs(cfg.gateway.timeout_secs),
        )?
        .with_epoch_window(cfg.gateway.epoch_window);

        let dex_timeout = Duration::from_secs(cfg.dex.timeout_secs);
        let mut providers: Vec<Arc<dyn DexQuoteProvider>> = Vec::new();

        let ociswap = if cfg.dex.ociswap.enabled {
            let client = Arc::new(OciswapClient::new(cfg.dex.ociswap.base_url.clone(), dex_timeout)?);
            providers.push(client.clone());
            Some(client)
        } else {
            None
        };

        if cfg.dex.defiplaza.enabled {
            providers.push(Arc::new(DefiPlazaClient::new(
                cfg.dex.defiplaza.base_url.clone(),
                dex_timeout,
            )?));
        }

        let probe = ProbeConfig {
            amount: cfg.scanner.probe_amount()?,
            fallback_account: cfg.wallet.probe_account.clone(),
            ..ProbeConfig::default()
        };

        let wallet = match cfg.configured_account() {
            Some(address) => WalletSession::with_accounts(vec![WalletAccount::new(address)]),
            None => WalletSession::new(),
        };

        info!(
            gateway = gateway.base_url(),
            providers = providers.len(),
            wallet_connected = wallet.is_connected(),
            "Context initialised"
        );

        Ok(Self {
            ledger: Arc::new(gateway),
            providers,
            ociswap,
            registry: PoolRegistry::mainnet(),
            wallet,
            probe,
        })
    }

    pub fn ledger(&self) -> Arc<dyn LedgerClient> {
        self.ledger.clone()
    }

    pub fn providers(&self) -> &[Arc<dyn DexQuoteProvider>] {
        &self.providers
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn wallet(&self) -> &WalletSession {
        &self.wallet
    }

    pub fn probe(&self) -> &ProbeConfig {
        &self.probe
    }

    /// Connected account, or the probe account when none is connected.
    pub fn account_or_probe(&self) -> String {
        self.wallet
            .current_account()
            .unwrap_or_else(|| self.probe.fallback_account.clone())
    }

    /// Resolve a token symbol ("hUSDC") or resource address to an address.
    pub fn resolve_token(&self, symbol_or_address: &str) -> Result<String, ArbError> {
        if let Some(token) = self.registry.token_by_symbol(symbol_or_address) {
            return Ok(token.address.to_string());
        }
        if symbol_or_address.starts_with("resource_") {
            return Ok(symbol_or_address.to_string());
        }
        Err(ArbError::Config(format!("unknown token {symbol_or_address:?}")))
    }

    pub fn price_resolver(&self) -> PriceResolver {
        PriceResolver::new(self.providers.clone(), self.ledger.clone(), self.probe.clone())
    }

    pub fn previewer(&self) -> ArbitragePreviewer {
        ArbitragePreviewer::new(self.ledger.clone())
    }

    /// USD reference price of `token` from Ociswap, when that provider is
    /// enabled.
    pub async fn usd_reference(&self, token: &str) -> Option<Decimal> {
        match &self.ociswap {
            Some(client) => client.token_usd_price(token).await,
            None => None,
        }
    }

    /// End the session: disconnect the wallet and release the clients.
    pub fn dispose(self) {
        self.wallet.disconnect();
        info!("Context disposed");
    }
}
