//! Token Catalog & Amount Scaling
//!
//! Tokens are chain-agnostic descriptions; which chains actually carry a
//! given ERC-20 is a separate (chain id, symbol) -> contract address map.
//! An absent mapping means "not available on that chain", never an error.

use crate::error::{WalletError, WalletResult};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Gas limit for a plain native-currency transfer
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// A transferable asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The chain's native currency
    Native,
    /// An ERC-20 token contract
    Erc20(Erc20Token),
}

/// ERC-20 token metadata (no contract address; that is per-chain)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    /// Fallback gas limit when the network estimate is unavailable
    pub transfer_gas_limit: u64,
}

impl Token {
    /// Decimals for amount scaling; native decimals come from the chain.
    pub fn decimals(&self, chain_decimals: u8) -> u8 {
        match self {
            Token::Native => chain_decimals,
            Token::Erc20(t) => t.decimals,
        }
    }

    /// Static gas-limit fallback when estimation fails
    pub fn default_gas_limit(&self) -> u64 {
        match self {
            Token::Native => NATIVE_TRANSFER_GAS,
            Token::Erc20(t) => t.transfer_gas_limit,
        }
    }

    pub fn symbol(&self, chain_symbol: &'static str) -> &'static str {
        match self {
            Token::Native => chain_symbol,
            Token::Erc20(t) => t.symbol,
        }
    }
}

pub const USDC: Erc20Token = Erc20Token {
    symbol: "USDC",
    name: "USD Coin",
    decimals: 6,
    transfer_gas_limit: 65_000,
};

pub const USDT: Erc20Token = Erc20Token {
    symbol: "USDT",
    name: "Tether USD",
    decimals: 6,
    transfer_gas_limit: 65_000,
};

pub const DAI: Erc20Token = Erc20Token {
    symbol: "DAI",
    name: "Dai Stablecoin",
    decimals: 18,
    transfer_gas_limit: 65_000,
};

fn addr(hex_str: &str) -> [u8; 20] {
    let bytes = hex::decode(hex_str.trim_start_matches("0x")).expect("valid catalog address");
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    out
}

lazy_static! {
    /// Known ERC-20 tokens
    static ref ERC20_TOKENS: Vec<Erc20Token> = vec![USDC, USDT, DAI];

    /// (chain id, symbol) -> contract address
    static ref CONTRACTS: HashMap<(u64, &'static str), [u8; 20]> = {
        let mut m = HashMap::new();
        // USDC
        m.insert((1u64, "USDC"), addr("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        m.insert((137u64, "USDC"), addr("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"));
        m.insert((42161u64, "USDC"), addr("0xaf88d065e77c8cC2239327C5EDb3A432268e5831"));
        m.insert((10u64, "USDC"), addr("0x0b2C639c533813f4Aa9D7837CACDc9521Ee15dA6"));
        m.insert((8453u64, "USDC"), addr("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        // USDT
        m.insert((1u64, "USDT"), addr("0xdAC17F958D2ee523a2206206994597C13D831ec7"));
        m.insert((56u64, "USDT"), addr("0x55d398326f99059fF775485246999027B3197955"));
        m.insert((137u64, "USDT"), addr("0xc2132D05D31c914a87C6611C10748AEb04B58e8F"));
        m.insert((42161u64, "USDT"), addr("0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"));
        // DAI
        m.insert((1u64, "DAI"), addr("0x6B175474E89094C44Da98b954EedeAC495271d0F"));
        m.insert((137u64, "DAI"), addr("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"));
        m
    };
}

/// Contract address of a token on a chain; None means unavailable there.
/// Native tokens have no contract and are available everywhere.
pub fn contract_address(token: &Token, chain_id: u64) -> Option<[u8; 20]> {
    match token {
        Token::Native => None,
        Token::Erc20(t) => CONTRACTS.get(&(chain_id, t.symbol)).copied(),
    }
}

/// Whether a token can be transferred on a chain
pub fn is_available(token: &Token, chain_id: u64) -> bool {
    match token {
        Token::Native => true,
        Token::Erc20(t) => CONTRACTS.contains_key(&(chain_id, t.symbol)),
    }
}

/// Native plus every ERC-20 with a registered contract on the chain
pub fn tokens_for_chain(chain_id: u64) -> Vec<Token> {
    let mut out = vec![Token::Native];
    for t in ERC20_TOKENS.iter() {
        if CONTRACTS.contains_key(&(chain_id, t.symbol)) {
            out.push(Token::Erc20(t.clone()));
        }
    }
    out
}

// =============================================================================
// Amount Scaling
// =============================================================================

/// Scale a human-readable decimal amount to the token's smallest unit.
///
/// Fractional digits beyond `decimals` are truncated, never rounded, so the
/// authorized amount is never larger than what the user typed.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> WalletResult<u128> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(WalletError::invalid_amount("Empty amount"));
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(WalletError::invalid_amount(format!("Invalid amount: {}", trimmed)));
    }

    let (whole_str, frac_str) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if frac_str.contains('.') {
        return Err(WalletError::invalid_amount(format!("Invalid amount: {}", trimmed)));
    }
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(WalletError::invalid_amount(format!("Invalid amount: {}", trimmed)));
    }
    if !whole_str.chars().all(|c| c.is_ascii_digit())
        || !frac_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(WalletError::invalid_amount(format!("Invalid amount: {}", trimmed)));
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str
            .parse()
            .map_err(|_| WalletError::invalid_amount(format!("Amount too large: {}", trimmed)))?
    };

    // Truncate excess fractional digits, then right-pad to `decimals`
    let decimals = decimals as usize;
    let frac_kept: String = frac_str.chars().take(decimals).collect();
    let frac: u128 = if frac_kept.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_kept, width = decimals);
        padded
            .parse()
            .map_err(|_| WalletError::invalid_amount(format!("Amount too large: {}", trimmed)))?
    };

    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| WalletError::invalid_amount("Unsupported decimal precision"))?;

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| WalletError::invalid_amount(format!("Amount too large: {}", trimmed)))
}

/// Format a smallest-unit value back to a human-readable decimal string
pub fn from_smallest_unit(value: u128, decimals: u8) -> String {
    let scale = 10u128.pow(decimals as u32);
    let whole = value / scale;
    let frac = value % scale;

    if frac == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
    let frac_trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, frac_trimmed)
}
