//! Transaction Builder
//!
//! Turns a validated transfer intent into an [`UnsignedTransaction`]. All
//! validation happens before any signing hash exists; all network reads are
//! single point-in-time reads from the chain's primary endpoint and are
//! issued concurrently.

use super::UnsignedTransaction;
use crate::abi;
use crate::chains::ChainSpec;
use crate::error::{WalletError, WalletResult};
use crate::log_warn;
use crate::rpc::RpcClient;
use crate::tokens::{self, Token};

/// A transfer intent from the orchestration layer
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Recipient address, 0x-prefixed; mixed-case input is checksum-verified
    pub recipient: String,
    /// Human-readable decimal amount ("1.5", "0.0042")
    pub amount: String,
    pub token: Token,
    /// Explicit gas limit; used verbatim, never buffered or reduced
    pub gas_limit_override: Option<u64>,
}

/// Build an unsigned transfer on the given chain.
///
/// Fails before any network call for configuration problems, and before any
/// signing hash for validation problems. Nonce and gas-price read failures
/// propagate; only a failed gas estimate falls back (to the token's static
/// default).
pub async fn build_transfer(
    client: &RpcClient,
    chain: &ChainSpec,
    sender: &[u8; 20],
    request: &TransferRequest,
) -> WalletResult<UnsignedTransaction> {
    // Configuration: token must exist on this chain before anything else
    let contract = match &request.token {
        Token::Native => None,
        Token::Erc20(t) => Some(tokens::contract_address(&request.token, chain.chain_id).ok_or_else(
            || {
                WalletError::token_unavailable(format!(
                    "{} has no contract on {}",
                    t.symbol, chain.name
                ))
            },
        )?),
    };

    // Validation, all before any network traffic
    let recipient = parse_address(&request.recipient)?;

    let decimals = request.token.decimals(chain.decimals);
    let amount = tokens::to_smallest_unit(&request.amount, decimals)?;
    if amount == 0 {
        return Err(WalletError::invalid_amount("Amount must be positive"));
    }

    if &recipient == sender {
        return Err(WalletError::self_transfer(
            "Recipient equals the sending address",
        ));
    }

    // Where the transaction points and what it carries
    let (to, value, data) = match contract {
        None => (recipient, amount, Vec::new()),
        Some(contract) => (contract, 0u128, abi::encode_transfer(&recipient, amount)),
    };

    // Independent point-in-time reads, all concurrent, all from the primary
    // endpoint. Only the gas estimate may fail without aborting the build.
    let endpoint = chain.primary_endpoint();

    let (native_balance, nonce, gas_price, estimate, token_balance) = tokio::join!(
        client.get_balance(endpoint, sender),
        client.get_pending_nonce(endpoint, sender),
        client.get_gas_price(endpoint),
        client.estimate_gas(endpoint, sender, &to, value, &data),
        async {
            match contract {
                Some(contract) => Some(client.get_erc20_balance(endpoint, &contract, sender).await),
                None => None,
            }
        },
    );

    let native_balance = native_balance?;
    let nonce = nonce?;
    let gas_price = gas_price?;
    let token_balance = token_balance.transpose()?;

    let gas_limit = match request.gas_limit_override {
        Some(explicit) => explicit,
        None => match estimate {
            Ok(estimated) => buffer_gas_limit(estimated),
            Err(e) => {
                log_warn!(
                    "tx.builder",
                    "Gas estimate failed, using token default",
                    error = e,
                    default = request.token.default_gas_limit(),
                );
                request.token.default_gas_limit()
            }
        },
    };

    // Funds checks: the fee always comes out of the native balance
    let max_fee = (gas_limit as u128)
        .checked_mul(gas_price)
        .ok_or_else(|| WalletError::invalid_amount("Maximum fee overflows"))?;
    match token_balance {
        None => {
            let required = amount
                .checked_add(max_fee)
                .ok_or_else(|| WalletError::invalid_amount("Amount overflows with fee"))?;
            if required > native_balance {
                return Err(WalletError::insufficient_funds(format!(
                    "Need {} wei (incl. max fee), have {}",
                    required, native_balance
                )));
            }
        }
        Some(balance) => {
            if amount > balance {
                return Err(WalletError::insufficient_funds(format!(
                    "Token balance {} below transfer amount {}",
                    balance, amount
                )));
            }
            if max_fee > native_balance {
                return Err(WalletError::insufficient_funds(format!(
                    "Native balance {} cannot cover max fee {}",
                    native_balance, max_fee
                )));
            }
        }
    }

    Ok(UnsignedTransaction {
        nonce,
        gas_price,
        gas_limit,
        to,
        value,
        data,
    })
}

/// Inflate a gas estimate by exactly 20%, rounding up.
///
/// A safety margin against estimate drift between build and inclusion;
/// never applied to a caller-supplied override.
pub fn buffer_gas_limit(estimate: u64) -> u64 {
    ((estimate as u128 * 6 + 4) / 5) as u64
}

/// Parse a 0x-prefixed 20-byte address.
///
/// All-lowercase and all-uppercase hex is accepted as-is; mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> WalletResult<[u8; 20]> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::invalid_address(format!("Missing 0x prefix: {}", trimmed)))?;

    if hex_part.len() != 40 {
        return Err(WalletError::invalid_address(format!(
            "Expected 40 hex chars, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|_| WalletError::invalid_address(format!("Invalid hex: {}", trimmed)))?;
    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);

    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower && trimmed != checksum_address(&address) {
        return Err(WalletError::invalid_address(format!(
            "EIP-55 checksum mismatch: {}",
            trimmed
        )));
    }

    Ok(address)
}

/// Compute the EIP-55 checksum form of an address
pub fn checksum_address(address: &[u8; 20]) -> String {
    let hex_addr = hex::encode(address);
    let hash = abi::keccak256(hex_addr.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_addr.chars().enumerate() {
        let hash_char = hash_hex.as_bytes()[i] as char;
        if c.is_ascii_alphabetic() && hash_char.to_digit(16).unwrap_or(0) >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_gas_limit_exact_multiple() {
        assert_eq!(buffer_gas_limit(50_000), 60_000);
        assert_eq!(buffer_gas_limit(21_000), 25_200);
    }

    #[test]
    fn test_buffer_gas_limit_rounds_up() {
        assert_eq!(buffer_gas_limit(50_001), 60_002);
        assert_eq!(buffer_gas_limit(1), 2);
        assert_eq!(buffer_gas_limit(0), 0);
    }

    #[test]
    fn test_checksum_address_known_vector() {
        let bytes = hex::decode("cd2a3d9f938e13cd947ec05abc7fe734df8dd826").unwrap();
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&bytes);
        assert_eq!(
            checksum_address(&addr),
            "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
        );
    }

    #[test]
    fn test_parse_address_accepts_lowercase() {
        let addr = parse_address("0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826").unwrap();
        assert_eq!(addr[0], 0xcd);
    }

    #[test]
    fn test_parse_address_verifies_mixed_case() {
        // Correct EIP-55 casing
        assert!(parse_address("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826").is_ok());
        // One flipped letter
        assert!(parse_address("0xcD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826").is_err());
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        assert!(parse_address("cd2a3d9f938e13cd947ec05abc7fe734df8dd826").is_err());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzz2a3d9f938e13cd947ec05abc7fe734df8dd826").is_err());
    }
}
