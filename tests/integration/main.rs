//! Integration tests: in-memory mocks for the network seams plus a local
//! HTTP stub for status-code behaviour.

mod mock_dex;
mod mock_ledger;

mod arbitrage_flow;
mod http_providers;
mod registry_scenarios;
