//! Chain Catalog
//!
//! Static registry of supported EVM networks: chain ids, native currency
//! metadata, prioritized RPC endpoints, and explorer links. Loaded once and
//! read-only afterwards; custom chains can be supplied as plain values.

use arc_swap::ArcSwap;
use lazy_static::lazy_static;
use std::sync::Arc;

/// An EVM network and how to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Display name
    pub name: &'static str,
    /// Native currency symbol
    pub symbol: &'static str,
    /// Native currency decimals
    pub decimals: u8,
    /// RPC endpoints in priority order (primary first)
    pub rpc_endpoints: Vec<&'static str>,
    /// Explorer transaction-URL prefix
    pub explorer_tx_prefix: &'static str,
}

impl ChainSpec {
    /// Primary RPC endpoint (first in priority order)
    pub fn primary_endpoint(&self) -> &str {
        self.rpc_endpoints[0]
    }

    /// Explorer link for a transaction hash
    pub fn explorer_url(&self, txid: &str) -> String {
        format!("{}{}", self.explorer_tx_prefix, txid)
    }
}

lazy_static! {
    static ref REGISTRY: Vec<ChainSpec> = vec![
        ChainSpec {
            chain_id: 1,
            name: "Ethereum",
            symbol: "ETH",
            decimals: 18,
            rpc_endpoints: vec![
                "https://eth.llamarpc.com",
                "https://ethereum.publicnode.com",
                "https://rpc.ankr.com/eth",
            ],
            explorer_tx_prefix: "https://etherscan.io/tx/",
        },
        ChainSpec {
            chain_id: 11155111,
            name: "Ethereum Sepolia",
            symbol: "ETH",
            decimals: 18,
            rpc_endpoints: vec![
                "https://ethereum-sepolia-rpc.publicnode.com",
                "https://sepolia.drpc.org",
                "https://1rpc.io/sepolia",
            ],
            explorer_tx_prefix: "https://sepolia.etherscan.io/tx/",
        },
        ChainSpec {
            chain_id: 56,
            name: "BNB Chain",
            symbol: "BNB",
            decimals: 18,
            rpc_endpoints: vec![
                "https://bsc-dataseed.binance.org",
                "https://bsc-dataseed1.defibit.io",
                "https://bsc-dataseed1.ninicoin.io",
            ],
            explorer_tx_prefix: "https://bscscan.com/tx/",
        },
        ChainSpec {
            chain_id: 137,
            name: "Polygon",
            symbol: "POL",
            decimals: 18,
            rpc_endpoints: vec![
                "https://polygon-rpc.com",
                "https://rpc.ankr.com/polygon",
                "https://polygon.llamarpc.com",
            ],
            explorer_tx_prefix: "https://polygonscan.com/tx/",
        },
        ChainSpec {
            chain_id: 42161,
            name: "Arbitrum One",
            symbol: "ETH",
            decimals: 18,
            rpc_endpoints: vec![
                "https://arb1.arbitrum.io/rpc",
                "https://arbitrum.llamarpc.com",
                "https://rpc.ankr.com/arbitrum",
            ],
            explorer_tx_prefix: "https://arbiscan.io/tx/",
        },
        ChainSpec {
            chain_id: 10,
            name: "Optimism",
            symbol: "ETH",
            decimals: 18,
            rpc_endpoints: vec![
                "https://mainnet.optimism.io",
                "https://optimism.llamarpc.com",
                "https://rpc.ankr.com/optimism",
            ],
            explorer_tx_prefix: "https://optimistic.etherscan.io/tx/",
        },
        ChainSpec {
            chain_id: 8453,
            name: "Base",
            symbol: "ETH",
            decimals: 18,
            rpc_endpoints: vec![
                "https://mainnet.base.org",
                "https://base.llamarpc.com",
                "https://base.publicnode.com",
            ],
            explorer_tx_prefix: "https://basescan.org/tx/",
        },
        ChainSpec {
            chain_id: 43114,
            name: "Avalanche C-Chain",
            symbol: "AVAX",
            decimals: 18,
            rpc_endpoints: vec![
                "https://api.avax.network/ext/bc/C/rpc",
                "https://avalanche.llamarpc.com",
                "https://rpc.ankr.com/avalanche",
            ],
            explorer_tx_prefix: "https://snowtrace.io/tx/",
        },
    ];
}

/// Look up a built-in chain by chain id
pub fn find_chain(chain_id: u64) -> Option<&'static ChainSpec> {
    REGISTRY.iter().find(|c| c.chain_id == chain_id)
}

/// All built-in chains
pub fn all_chains() -> &'static [ChainSpec] {
    &REGISTRY
}

/// The currently selected chain, shared between the orchestration layer and
/// the transfer pipeline.
///
/// Selection swaps atomically; each transfer snapshots the cell exactly once
/// so its nonce, endpoints, and contract lookups all come from the same
/// chain even if the user switches mid-flight.
pub struct ActiveChain {
    current: ArcSwap<ChainSpec>,
}

impl ActiveChain {
    pub fn new(chain: ChainSpec) -> Self {
        Self {
            current: ArcSwap::from_pointee(chain),
        }
    }

    /// Atomically switch the selected chain
    pub fn select(&self, chain: ChainSpec) {
        self.current.store(Arc::new(chain));
    }

    /// Snapshot the selected chain
    pub fn snapshot(&self) -> Arc<ChainSpec> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chain() {
        let eth = find_chain(1).unwrap();
        assert_eq!(eth.name, "Ethereum");
        assert_eq!(eth.decimals, 18);
        assert!(!eth.rpc_endpoints.is_empty());

        assert!(find_chain(999_999).is_none());
    }

    #[test]
    fn test_explorer_url() {
        let eth = find_chain(1).unwrap();
        let url = eth.explorer_url("0xabc");
        assert_eq!(url, "https://etherscan.io/tx/0xabc");
    }

    #[test]
    fn test_endpoints_are_priority_ordered() {
        let bnb = find_chain(56).unwrap();
        assert_eq!(bnb.primary_endpoint(), bnb.rpc_endpoints[0]);
        assert!(bnb.rpc_endpoints.len() >= 2);
    }

    #[test]
    fn test_active_chain_swap() {
        let active = ActiveChain::new(find_chain(1).unwrap().clone());
        assert_eq!(active.snapshot().chain_id, 1);

        active.select(find_chain(137).unwrap().clone());
        assert_eq!(active.snapshot().chain_id, 137);
    }
}
