//! Known liquidity pools on mainnet.

use super::tokens::{HETH, HUSDC, HUSDT, HWBTC, XRD};
use crate::types::DexKind::{self, Caviar, DefiPlaza, Ociswap};
use crate::types::PoolVariant::{self, CaviarShape, CaviarSimple, Standard};
use crate::types::Pool;

const fn pool(
    address: &'static str,
    dex: DexKind,
    variant: PoolVariant,
    token0: &'static str,
    token1: &'static str,
    name: &'static str,
) -> Pool {
    Pool { address, dex, variant, token0, token1, name }
}

pub const ALL_POOLS: &[Pool] = &[
    // Ociswap
    pool("component_rdx1czy2naejcqx8gv46zdsex2syuxrs4jnqzug58e66zr8wglxzvu97qr", Ociswap, Standard, XRD, HUSDC, "OciSwap XRD/hUSDC"),
    pool("component_rdx1cprwh9r3wx6vvt0gnv8wscwljegzcevp0hzuju2873eza7fgg493fw", Ociswap, Standard, XRD, HUSDT, "OciSwap XRD/hUSDT"),
    pool("component_rdx1crumqsy0nu4pl3fwah3nkf8eg8qhltxenk83wh9tzlmr5jnsqs3x4c", Ociswap, Standard, XRD, HETH, "OciSwap XRD/hETH"),
    pool("component_rdx1crd7xk0nu07kj60artzz6evws7r6w69lwarf0nqmkxuwwluy5xjud0", Ociswap, Standard, XRD, HWBTC, "OciSwap XRD/hWBTC"),
    // DefiPlaza
    pool("component_rdx1cqs6t5t70fcgrva6ws6gs84u29w3kecn6j0zkjg0u0x9szx0xnusxj", DefiPlaza, Standard, XRD, HUSDC, "DefiPlaza XRD/hUSDC"),
    pool("component_rdx1crz9nv7mvp3lamx3kl4xq8lgwyalvn7rgmlzse2rfs4r9u5sdq0vzh", DefiPlaza, Standard, XRD, HUSDT, "DefiPlaza XRD/hUSDT"),
    pool("component_rdx1cq8nefdv75yqkgwqe9rhj436yr3z09du7g797y90prmwf9ugv0m8u2", DefiPlaza, Standard, XRD, HETH, "DefiPlaza XRD/hETH"),
    pool("component_rdx1cqy8gd5wk8cq7c4g4gpa2lgulk7tcqj673fgz90cu7fa6x2f9gshaz", DefiPlaza, Standard, XRD, HWBTC, "DefiPlaza XRD/hWBTC"),
    // Caviar simple pools
    pool("component_rdx1cqth4gp6fedux4rrjzk6gu04c24sfnhzrh9t052ufsh7n5ljrslltw", Caviar, CaviarSimple, XRD, HUSDC, "Caviar Simple XRD/hUSDC"),
    pool("component_rdx1crj9m0m45cy3a38968n8cs0sg2hvvnyl75x7y6wppg0x4dtf72092e", Caviar, CaviarSimple, XRD, HUSDT, "Caviar Simple XRD/hUSDT"),
    pool("component_rdx1cpwu2rv3p4qqsayk5tc072kw94ygqyusemuqje7udxhgt3253m830q", Caviar, CaviarSimple, XRD, HETH, "Caviar Simple XRD/hETH"),
    pool("component_rdx1cpftfjyyyrca5twzsr557at8uka20ynsn5wucy9pe7sgxnrse24m5h", Caviar, CaviarSimple, XRD, HWBTC, "Caviar Simple XRD/hWBTC"),
    // Caviar shape pools
    pool("component_rdx1cqelumvmmgwths34k9pp0htd2ykwq7d70m0r389etwh39ul3j5tyj5", Caviar, CaviarShape, XRD, HUSDC, "Caviar Shape XRD/hUSDC"),
    pool("component_rdx1cph6ayqwqgnavd5yjxjx966nfcnxwt85k9p8fqv37r5pfnn3qcm6az", Caviar, CaviarShape, XRD, HUSDT, "Caviar Shape XRD/hUSDT"),
    pool("component_rdx1cpat0a7p2ufty0lrawwtxfr3xm2qf5ys2xe6mlux4s074utzkz0w0y", Caviar, CaviarShape, HUSDC, HUSDT, "Caviar Shape hUSDC/hUSDT"),
];
