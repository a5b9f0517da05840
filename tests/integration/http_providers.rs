//! HTTP-status behaviour of the REST clients against a local stub server.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use radix_arb::dex::defiplaza::DefiPlazaClient;
use radix_arb::dex::ociswap::OciswapClient;
use radix_arb::dex::DexQuoteProvider;
use radix_arb::engine::pricing::{PriceResolver, ProbeConfig};
use radix_arb::ledger::gateway::GatewayClient;
use radix_arb::ledger::LedgerClient;
use radix_arb::registry::tokens::{HUSDC, XRD};
use radix_arb::types::{ArbError, DexKind};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn failing_pools() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn plaza_pairs() -> Json<Value> {
    Json(json!([
        {
            "pair_address": "component_plaza_usdc",
            "base_token": { "address": XRD, "symbol": "XRD", "liquidity": "90000" },
            "quote_token": { "address": HUSDC, "symbol": "hUSDC", "liquidity": "1100" },
            "price": "0.0125"
        },
        {
            "pair_address": "component_plaza_other",
            "base_token": { "address": XRD, "symbol": "XRD" },
            "quote_token": { "address": "resource_rdx1other", "symbol": "OTHER" },
            "price": 3
        }
    ]))
}

async fn token_price(Path(address): Path<String>) -> (StatusCode, Json<Value>) {
    if address == XRD {
        (StatusCode::OK, Json(json!({ "price": { "usd": { "now": "0.0123" } } })))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown token" })))
    }
}

fn client_timeout() -> Duration {
    Duration::from_secs(5)
}

#[tokio::test]
async fn test_failing_provider_yields_nothing_while_other_succeeds() {
    let addr = serve(
        Router::new()
            .route("/pools", get(failing_pools))
            .route("/radix/pairs", get(plaza_pairs)),
    )
    .await;
    let base = format!("http://{addr}");

    let oci = OciswapClient::new(Some(base.clone()), client_timeout()).unwrap();
    assert!(oci.fetch_pools(Some(HUSDC)).await.is_err());

    let providers: Vec<Arc<dyn DexQuoteProvider>> = vec![
        Arc::new(oci),
        Arc::new(DefiPlazaClient::new(Some(base), client_timeout()).unwrap()),
    ];
    let resolver = PriceResolver::new(
        providers,
        Arc::new(GatewayClient::new(None, client_timeout()).unwrap()),
        ProbeConfig::default(),
    );

    let quotes = resolver.fetch_quotes(HUSDC).await;
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].pool_address, "component_plaza_usdc");
    assert_eq!(quotes[0].dex, DexKind::DefiPlaza);
    assert_eq!(quotes[0].price, dec!(0.0125));
    assert_eq!(quotes[0].price_inverse, dec!(80));
}

#[tokio::test]
async fn test_ociswap_usd_reference() {
    let addr = serve(Router::new().route("/tokens/:address", get(token_price))).await;
    let oci = OciswapClient::new(Some(format!("http://{addr}")), client_timeout()).unwrap();

    assert_eq!(oci.token_usd_price(XRD).await, Some(dec!(0.0123)));
    assert_eq!(oci.token_usd_price(HUSDC).await, None);
}

#[tokio::test]
async fn test_gateway_preview_parses_result() {
    let app = Router::new().route(
        "/transaction/preview",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["flags"]["use_free_credit"], json!(true));
            assert_eq!(body["end_epoch_exclusive"], json!(99));
            Json(json!({
                "resource_changes": [{
                    "index": 3,
                    "resource_changes": [{
                        "resource_address": HUSDC,
                        "component_entity": { "entity_type": "GlobalAccount", "is_global": true },
                        "amount": "12.5"
                    }]
                }],
                "fee_summary": { "execution_cost_sum": "0.3" },
                "receipt": { "status": "Succeeded" }
            }))
        }),
    );
    let addr = serve(app).await;
    let gateway = GatewayClient::new(Some(format!("http://{addr}")), client_timeout()).unwrap();

    let result = gateway.preview("CALL_METHOD;").await.unwrap();
    assert_eq!(result.deposited(HUSDC), Some(dec!(12.5)));
    assert_eq!(result.execution_fees(), dec!(0.3));
    assert_eq!(result.receipt_status(), Some("Succeeded"));
}

#[tokio::test]
async fn test_gateway_error_status_is_ledger_error() {
    let app = Router::new().route(
        "/transaction/preview",
        post(|| async { (StatusCode::BAD_REQUEST, "manifest parse error") }),
    );
    let addr = serve(app).await;
    let gateway = GatewayClient::new(Some(format!("http://{addr}")), client_timeout()).unwrap();

    let err = gateway.preview("NOT A MANIFEST").await.unwrap_err();
    match err.downcast_ref::<ArbError>() {
        Some(ArbError::Ledger { status, message }) => {
            assert_eq!(*status, 400);
            assert!(message.contains("manifest parse error"));
        }
        other => panic!("expected ledger error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_pool_resources_sums_vaults() {
    let app = Router::new().route(
        "/state/entity/details",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["addresses"], json!(["component_caviar_pool"]));
            assert_eq!(body["aggregation_level"], json!("Vault"));
            Json(json!({
                "items": [{
                    "address": "component_caviar_pool",
                    "fungible_resources": {
                        "items": [
                            {
                                "resource_address": XRD,
                                "vaults": { "items": [
                                    { "vault_address": "internal_vault_1", "amount": "60000" },
                                    { "vault_address": "internal_vault_2", "amount": "20000" }
                                ]}
                            },
                            {
                                "resource_address": HUSDC,
                                "vaults": { "items": [ { "amount": "1000.25" } ] }
                            }
                        ]
                    }
                }]
            }))
        }),
    );
    let addr = serve(app).await;
    let gateway = GatewayClient::new(Some(format!("http://{addr}")), client_timeout()).unwrap();

    let balances = gateway.pool_resources("component_caviar_pool").await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].resource_address, XRD);
    assert_eq!(balances[0].amount, dec!(80000));
    assert_eq!(balances[1].resource_address, HUSDC);
    assert_eq!(balances[1].amount, dec!(1000.25));
}

#[tokio::test]
async fn test_pool_reserves_empty_when_gateway_fails() {
    let app = Router::new().route(
        "/state/entity/details",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "state unavailable") }),
    );
    let addr = serve(app).await;
    let gateway = GatewayClient::new(Some(format!("http://{addr}")), client_timeout()).unwrap();

    let err = gateway.pool_resources("component_pool").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ArbError>(),
        Some(ArbError::Ledger { status: 500, .. })
    ));

    let resolver = PriceResolver::new(Vec::new(), Arc::new(gateway), ProbeConfig::default());
    assert!(resolver.pool_reserves("component_pool").await.is_empty());
}
