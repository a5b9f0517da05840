//! Registry lookups over the compiled-in mainnet tables.

use rust_decimal_macros::dec;
use std::collections::HashMap;

use radix_arb::registry::tokens::{HUSDC, HUSDT, XRD};
use radix_arb::registry::{sort_by_price, PoolRegistry};
use radix_arb::types::{pair_key, DexKind, PoolSides, PoolVariant};

#[test]
fn test_xrd_husdc_pools_across_three_dexes() {
    let registry = PoolRegistry::mainnet();
    let pools = registry.pools_for_token(HUSDC);

    assert_eq!(pools.len(), 4);
    assert!(pools.iter().all(|p| p.token0 == XRD && p.token1 == HUSDC));

    let mut dexes: Vec<DexKind> = pools.iter().map(|p| p.dex).collect();
    dexes.dedup();
    assert_eq!(dexes, vec![DexKind::Ociswap, DexKind::DefiPlaza, DexKind::Caviar]);

    // Both Caviar entries share a DEX kind but carry distinct variants.
    let caviar: Vec<PoolVariant> = pools
        .iter()
        .filter(|p| p.dex == DexKind::Caviar)
        .map(|p| p.variant)
        .collect();
    assert_eq!(caviar, vec![PoolVariant::CaviarSimple, PoolVariant::CaviarShape]);

    let groups = registry.group_by_pair();
    let group = &groups[&pair_key(XRD, HUSDC)];
    assert_eq!(group.len(), 4);
    assert!(pools.iter().all(|p| group.contains(p)));
}

#[test]
fn test_pools_containing_is_superset_of_pools_for_token() {
    let registry = PoolRegistry::mainnet();
    for token in registry.all_tokens() {
        let containing = registry.pools_containing(token.address);
        let for_token = registry.pools_for_token(token.address);

        assert!(for_token.iter().all(|p| containing.contains(p)));
        for pool in registry.all_pools() {
            assert_eq!(
                containing.contains(pool),
                pool.token0 == token.address || pool.token1 == token.address
            );
        }
    }
    // XRD is never token1, hUSDC is token0 of the shape pool.
    assert!(registry.pools_for_token(XRD).is_empty());
    assert_eq!(registry.pools_containing(HUSDC).len(), 5);
}

#[test]
fn test_unknown_token_yields_empty_results() {
    let registry = PoolRegistry::mainnet();
    assert!(registry.pools_for_token("resource_rdx1unknown").is_empty());
    assert!(registry.pools_containing("resource_rdx1unknown").is_empty());
    assert!(registry.find_pool("component_rdx1unknown").is_none());
    assert_eq!(registry.token_symbol("resource_rdx1unknown"), "");
}

#[test]
fn test_sort_by_price_puts_unpriced_last() {
    let registry = PoolRegistry::mainnet();
    let pools = registry.pools_for_token(HUSDT);
    assert_eq!(pools.len(), 5);
    let mut prices = HashMap::new();
    prices.insert(pools[3].address.to_string(), dec!(79.5));
    prices.insert(pools[1].address.to_string(), dec!(80.1));

    let sorted = sort_by_price(&pools, &prices);
    let order: Vec<&str> = sorted.iter().map(|p| p.address()).collect();
    assert_eq!(
        order,
        vec![
            pools[3].address,
            pools[1].address,
            pools[0].address,
            pools[2].address,
            pools[4].address,
        ]
    );
}

#[test]
fn test_find_pool_and_symbols() {
    let registry = PoolRegistry::mainnet();
    let first = &registry.all_pools()[0];
    assert_eq!(registry.find_pool(first.address), Some(first));
    assert_eq!(registry.token_symbol(HUSDC), "hUSDC");
    assert_eq!(registry.token_by_symbol("xrd").map(|t| t.address), Some(XRD));
}
