//! End-to-end: quotes → ranked opportunities → manifest → preview, with
//! in-memory providers and ledger.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use radix_arb::context::AppContext;
use radix_arb::dex::DexQuoteProvider;
use radix_arb::engine::pricing::ProbeConfig;
use radix_arb::engine::scanner::OpportunityScanner;
use radix_arb::registry::tokens::{HUSDC, HUSDT, XRD};
use radix_arb::registry::PoolRegistry;
use radix_arb::strategy::arbitrage::{ArbitrageConfig, ArbitrageEvaluator};
use radix_arb::types::{DexKind, Pool, PoolSides};
use radix_arb::wallet::WalletAccount;

use crate::mock_dex::{quote_for, MockDex};
use crate::mock_ledger::MockLedger;

fn husdc_pool(dex: DexKind) -> Pool {
    PoolRegistry::mainnet()
        .pools_for_token(HUSDC)
        .into_iter()
        .find(|p| p.dex == dex)
        .unwrap()
}

fn providers() -> (Arc<MockDex>, Vec<Arc<dyn DexQuoteProvider>>) {
    let oci = Arc::new(MockDex::new(
        DexKind::Ociswap,
        vec![quote_for(&husdc_pool(DexKind::Ociswap), dec!(0.0125))],
    ));
    let plaza = Arc::new(MockDex::new(
        DexKind::DefiPlaza,
        vec![quote_for(&husdc_pool(DexKind::DefiPlaza), dec!(0.0130))],
    ));
    let caviar = Arc::new(MockDex::new(
        DexKind::Caviar,
        vec![quote_for(&husdc_pool(DexKind::Caviar), dec!(0.0110))],
    ));
    let all: Vec<Arc<dyn DexQuoteProvider>> = vec![oci.clone(), plaza, caviar];
    (oci, all)
}

fn scanner_for(ctx: &AppContext, amount: Decimal) -> OpportunityScanner {
    OpportunityScanner::new(
        ctx.price_resolver(),
        ArbitrageEvaluator::new(ArbitrageConfig {
            amount,
            ..ArbitrageConfig::default()
        }),
    )
}

#[tokio::test]
async fn test_scan_build_and_preview_best_supported_pair() {
    let ledger = MockLedger::new();
    ledger.deposit(XRD, "1.55").deposit("resource_rdx1dust", "0.001");
    ledger.set_fee("0.35");

    let (_, providers) = providers();
    let ctx = AppContext::new(Arc::new(ledger.clone()), providers, ProbeConfig::default());
    ctx.wallet()
        .update_accounts(vec![WalletAccount::new("account_rdx1trader")]);

    let scanner = scanner_for(&ctx, dec!(100));
    let report = scanner.scan(HUSDC).await;

    // 3 pools in one pair group -> 6 ordered pairs.
    assert_eq!(report.quotes.len(), 3);
    assert_eq!(report.opportunities.len(), 6);
    assert!(report
        .opportunities
        .windows(2)
        .all(|w| w[0].estimate.profit >= w[1].estimate.profit));

    let best = report.best_supported().unwrap();
    assert!(best.buy.dex.is_supported() && best.sell.dex.is_supported());

    // Buy on DefiPlaza at 0.0130 XRD per hUSDC: 100 hUSDC cost 1.3 XRD.
    assert_eq!(best.buy.dex, DexKind::DefiPlaza);
    assert_eq!(best.estimate.cost, dec!(1.3));
    let manifest = scanner.build_manifest(&ctx.account_or_probe(), best).unwrap();
    assert_eq!(manifest.swap_count(), 2);
    assert_eq!(manifest.count_method("deposit_batch"), 1);

    let return_token = best.buy.other_token(HUSDC).unwrap();
    assert_eq!(return_token, XRD);

    let preview = ctx
        .previewer()
        .preview(&manifest, return_token, best.estimate.cost)
        .await
        .unwrap();
    assert_eq!(preview.returned, dec!(1.55));
    assert_eq!(preview.gross_profit, dec!(0.25));
    assert_eq!(preview.fees, dec!(0.35));

    let sent = ledger.manifests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], manifest.render());
    assert!(sent[0].contains("account_rdx1trader"));
    assert!(sent[0].contains("Decimal(\"1.3\")"));
    assert!(!sent[0].contains("Decimal(\"100\")"));
}

#[tokio::test]
async fn test_failing_provider_does_not_block_scan() {
    let (oci, providers) = providers();
    oci.set_error("Ociswap API error 500 Internal Server Error");

    let ctx = AppContext::new(Arc::new(MockLedger::new()), providers, ProbeConfig::default());
    let report = scanner_for(&ctx, dec!(10)).scan(HUSDC).await;

    assert_eq!(oci.calls(), 1);
    assert_eq!(report.quotes.len(), 2);
    assert!(report.quotes.iter().all(|q| q.dex != DexKind::Ociswap));
    assert_eq!(report.opportunities.len(), 2);
    // Only DefiPlaza and Caviar remain: nothing the builder can express.
    assert!(report.best_supported().is_none());
}

#[tokio::test]
async fn test_preview_failure_surfaces_to_caller() {
    let ledger = MockLedger::new();
    ledger.set_error("Ledger error (status 503): maintenance");

    let (_, providers) = providers();
    let ctx = AppContext::new(Arc::new(ledger), providers, ProbeConfig::default());
    let scanner = scanner_for(&ctx, dec!(100));
    let report = scanner.scan(HUSDC).await;
    let best = report.best_supported().unwrap();
    let manifest = scanner.build_manifest(&ctx.account_or_probe(), best).unwrap();

    assert!(ctx
        .previewer()
        .preview(&manifest, XRD, best.estimate.cost)
        .await
        .is_err());
}

#[tokio::test]
async fn test_simulated_prices_use_probe_account_and_skip_failures() {
    let registry = PoolRegistry::mainnet();
    let pools = registry.pools_for_token(HUSDC);

    let ledger = MockLedger::new();
    ledger.deposit(HUSDC, "12.5");
    ledger.fail_when_contains(pools[1].address);

    let ctx = AppContext::new(Arc::new(ledger.clone()), Vec::new(), ProbeConfig::default());
    let prices = ctx
        .price_resolver()
        .simulated_prices(&pools, ctx.wallet().current_account().as_deref())
        .await;

    assert_eq!(prices.len(), pools.len() - 1);
    assert!(!prices.contains_key(pools[1].address));
    assert!(prices.values().all(|p| *p == dec!(80)));

    let sent = ledger.manifests();
    assert_eq!(sent.len(), pools.len());
    let probe_account = ProbeConfig::default().fallback_account;
    assert!(sent.iter().all(|m| m.contains(&probe_account) && m.contains("lock_fee")));
}

#[tokio::test]
async fn test_simulated_usd_prices() {
    let pool = husdc_pool(DexKind::Ociswap);
    let ledger = MockLedger::new();
    ledger.deposit(HUSDC, "12.5");

    let ctx = AppContext::new(Arc::new(ledger), Vec::new(), ProbeConfig::default());
    let usd = ctx
        .price_resolver()
        .simulated_usd_prices(&[pool], None, dec!(0.0125))
        .await;
    assert_eq!(usd[pool.address], dec!(1));
}

#[tokio::test]
async fn test_scan_prices_unquoted_registry_pools_cheapest_first() {
    let registry = PoolRegistry::mainnet();
    let pools = registry.pools_for_token(HUSDC);
    let caviar: Vec<Pool> = pools.iter().filter(|p| p.dex == DexKind::Caviar).copied().collect();
    assert_eq!(caviar.len(), 2);
    let plaza = husdc_pool(DexKind::DefiPlaza);

    // Only Ociswap quotes directly; DefiPlaza and both Caviar pools are
    // left to simulation.
    let oci = Arc::new(MockDex::new(
        DexKind::Ociswap,
        vec![quote_for(&husdc_pool(DexKind::Ociswap), dec!(0.0125))],
    ));
    let ledger = MockLedger::new();
    ledger.deposit(HUSDC, "10");
    ledger.deposit_when_contains(caviar[1].address, HUSDC, "12.5");
    ledger.fail_when_contains(plaza.address);
    ledger.hold(caviar[0].address, XRD, "80000");
    ledger.hold(caviar[0].address, HUSDC, "1000");

    let ctx = AppContext::new(Arc::new(ledger.clone()), vec![oci], ProbeConfig::default());
    let report = scanner_for(&ctx, dec!(100))
        .scan_with_registry(ctx.registry(), HUSDC, None, Some(dec!(0.0125)))
        .await;

    assert_eq!(report.quotes.len(), 1);
    let order: Vec<_> = report.registry_prices.iter().map(|p| p.pool.address).collect();
    assert_eq!(order, vec![caviar[1].address, caviar[0].address, plaza.address]);

    let prices: Vec<_> = report.registry_prices.iter().map(|p| p.price).collect();
    // 1000 XRD / 12.5 = 80 XRD, 1000 / 10 = 100 XRD, at 0.0125 USD per XRD
    assert_eq!(prices, vec![Some(dec!(1)), Some(dec!(1.25)), None]);

    let reserves = &report.registry_prices[1].reserves;
    assert_eq!(reserves.len(), 2);
    assert_eq!(reserves[0].amount, dec!(80000));
    assert!(report.registry_prices[0].reserves.is_empty());

    // One preview per unquoted pool, none for the quoted Ociswap pool.
    assert_eq!(ledger.manifests().len(), 3);
}

#[tokio::test]
async fn test_scan_without_registry_leaves_prices_empty() {
    let (_, providers) = providers();
    let ledger = MockLedger::new();
    let ctx = AppContext::new(Arc::new(ledger.clone()), providers, ProbeConfig::default());

    let report = scanner_for(&ctx, dec!(100)).scan(HUSDC).await;
    assert!(report.registry_prices.is_empty());
    assert!(ledger.manifests().is_empty());

    // Every hUSDT registry pool is unquoted here.
    let priced = scanner_for(&ctx, dec!(100))
        .price_registry(ctx.registry(), HUSDT, &report.quotes, Some("account_rdx1trader"), None)
        .await;
    assert_eq!(priced.len(), ctx.registry().pools_for_token(HUSDT).len());
    assert!(priced.iter().all(|p| p.price.is_none()));
}
