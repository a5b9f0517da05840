//! RADIX-ARB: cross-DEX arbitrage scanner for Radix pools
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the application context and runs the refresh loop:
//! quotes → ranked opportunities → manifest → preview, plus simulated
//! prices for registry pools no provider quoted. Nothing is signed or
//! submitted.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};

use radix_arb::config;
use radix_arb::context::AppContext;
use radix_arb::engine::previewer::ArbitragePreview;
use radix_arb::engine::scanner::{OpportunityScanner, ScanReport};
use radix_arb::registry::truncate_address;
use radix_arb::strategy::arbitrage::{ArbitrageConfig, ArbitrageEvaluator};
use radix_arb::types::PoolSides;

const BANNER: &str = r#"
 ____      _    ____ _____  __      _    ____  ____
|  _ \    / \  |  _ \_ _\ \/ /     / \  |  _ \| __ )
| |_) |  / _ \ | | | | | \  /____ / _ \ | |_) |  _ \
|  _ <  / ___ \| |_| | | /  \____/ ___ \|  _ <| |_) |
|_| \_\/_/   \_\____/___/_/\_\  /_/   \_\_| \_\____/

  Cross-DEX arbitrage scanner
  v0.1.0, preview only
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        token = %cfg.scanner.token,
        estimate_amount = %cfg.scanner.trade_amount,
        refresh_interval_secs = cfg.scanner.refresh_interval_secs,
        "RADIX-ARB starting up"
    );

    // -- Initialise components -------------------------------------------

    let ctx = AppContext::from_config(&cfg)?;
    let token = ctx.resolve_token(&cfg.scanner.token)?;
    let trade_amount = cfg.scanner.trade_amount()?;

    let scanner = OpportunityScanner::new(
        ctx.price_resolver(),
        ArbitrageEvaluator::new(ArbitrageConfig {
            amount: trade_amount,
            min_profit_percent: cfg.scanner.min_profit_percent()?,
            supported_only: cfg.scanner.supported_only,
        }),
    );

    if let Some(usd) = ctx.usd_reference(&token).await {
        info!(token = %truncate_address(&token), usd = %usd, "USD reference price");
    }

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.scanner.refresh_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.scanner.refresh_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                cycle += 1;
                match run_cycle(&ctx, &scanner, &token).await {
                    Ok(Some((report, preview))) => log_cycle(cycle, &report, &preview),
                    Ok(None) => {}
                    Err(e) => error!(cycle, error = %e, "Cycle failed, continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    ctx.dispose();
    info!(cycles = cycle, "RADIX-ARB shut down cleanly.");
    Ok(())
}

/// Run one scan → manifest → preview cycle. `None` when there was nothing
/// to preview.
async fn run_cycle(
    ctx: &AppContext,
    scanner: &OpportunityScanner,
    token: &str,
) -> Result<Option<(ScanReport, ArbitragePreview)>> {
    let account = ctx.wallet().current_account();
    let base_usd = ctx.usd_reference(&ctx.probe().base_token).await;
    let report = scanner
        .scan_with_registry(ctx.registry(), token, account.as_deref(), base_usd)
        .await;
    let unit = match base_usd {
        Some(_) => "USD",
        None => ctx.registry().token_symbol(&ctx.probe().base_token),
    };
    log_registry_prices(&report, unit);

    let Some(best) = report.best_supported() else {
        warn!(
            quotes = report.quotes.len(),
            opportunities = report.opportunities.len(),
            "No supported opportunity this cycle"
        );
        return Ok(None);
    };
    info!(opportunity = %best, "Best supported opportunity");

    let manifest = scanner.build_manifest(&ctx.account_or_probe(), best)?;
    let return_token = best.buy.other_token(token)?.to_string();

    // The manifest withdraws the estimated cost in the return token.
    let preview = ctx
        .previewer()
        .preview(&manifest, &return_token, best.estimate.cost)
        .await?;
    Ok(Some((report, preview)))
}

fn log_registry_prices(report: &ScanReport, unit: &str) {
    for priced in &report.registry_prices {
        let reserves: Vec<String> = priced
            .reserves
            .iter()
            .map(|r| format!("{} {}", r.amount, truncate_address(&r.resource_address)))
            .collect();
        match priced.price {
            Some(price) => info!(
                pool = %priced.pool.name,
                price = %price,
                unit,
                reserves = ?reserves,
                "Simulated price"
            ),
            None => info!(pool = %priced.pool.name, reserves = ?reserves, "No simulated price"),
        }
    }
}

fn log_cycle(cycle: u64, report: &ScanReport, preview: &ArbitragePreview) {
    info!(
        cycle,
        quotes = report.quotes.len(),
        opportunities = report.opportunities.len(),
        profitable = report.profitable_count(),
        returned = %preview.returned,
        gross_profit = %preview.gross_profit,
        fees = %preview.fees,
        status = ?preview.receipt_status,
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("radix_arb=info"));

    let json_logging = std::env::var("RADIX_ARB_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
