//! Fungible resources traded by the registered pools.

use crate::types::Token;

pub const XRD: &str = "resource_rdx1tknxxxxxxxxxradxrdxxxxxxxxx009923554798xxxxxxxxxradxrd";
pub const HUSDC: &str = "resource_rdx1thxj9m87sn5cc9ehgp9qxp6vzeqxtce90xm5cp33373tclyp4et4gv";
pub const HUSDT: &str = "resource_rdx1th4v03gezwgzkuma6p38lnum8ww8t4ds9nvcrkr2p9ft6kxx3kxvhe";
pub const HETH: &str = "resource_rdx1th09yvv7tgsrv708ffsgqjjf2mhy84mscmj5jwu4g670fh3e5zgef0";
pub const HWBTC: &str = "resource_rdx1t58kkcqdz0mavfz98m98qh9m4jexyl9tacsvlhns6yxs4r6hrm5re5";

pub const ALL_TOKENS: &[Token] = &[
    Token {
        address: XRD,
        symbol: "XRD",
        icon_url: "https://assets.radixdlt.com/icons/icon-xrd.png",
    },
    Token {
        address: HUSDC,
        symbol: "hUSDC",
        icon_url: "https://assets.radixdlt.com/icons/hyperlane/hUSDC.svg",
    },
    Token {
        address: HUSDT,
        symbol: "hUSDT",
        icon_url: "https://assets.radixdlt.com/icons/hyperlane/hUSDT.svg",
    },
    Token {
        address: HETH,
        symbol: "hETH",
        icon_url: "https://assets.radixdlt.com/icons/hyperlane/hETH.svg",
    },
    Token {
        address: HWBTC,
        symbol: "hWBTC",
        icon_url: "https://assets.radixdlt.com/icons/hyperlane/hBTC.svg",
    },
];
