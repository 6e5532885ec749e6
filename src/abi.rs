//! Contract Call Encoder
//!
//! Stateless ABI encoding for the two standard token-contract calls the
//! transfer pipeline needs: `transfer(address,uint256)` and
//! `balanceOf(address)`. Selectors are the first four bytes of the
//! keccak256 of the canonical signature; arguments are 32-byte words.

use crate::error::{WalletError, WalletResult};
use tiny_keccak::{Hasher, Keccak};

/// keccak256 helper
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// First four bytes of keccak256 of the canonical function signature
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pad a 20-byte address into a 32-byte word
fn address_word(addr: &[u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr);
    word
}

/// Big-endian u128 into a 32-byte word
fn uint_word(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Calldata for `transfer(address,uint256)`
pub fn encode_transfer(recipient: &[u8; 20], amount: u128) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&selector("transfer(address,uint256)"));
    data.extend_from_slice(&address_word(recipient));
    data.extend_from_slice(&uint_word(amount));
    data
}

/// Calldata for `balanceOf(address)`
pub fn encode_balance_of(owner: &[u8; 20]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&selector("balanceOf(address)"));
    data.extend_from_slice(&address_word(owner));
    data
}

/// Decode a single uint256 return value (as hex, with or without 0x)
pub fn decode_uint(result_hex: &str) -> WalletResult<u128> {
    let cleaned = result_hex.trim_start_matches("0x");
    if cleaned.is_empty() {
        return Ok(0);
    }

    let bytes = hex::decode(cleaned)
        .map_err(|e| WalletError::parse_error(format!("Invalid uint256 hex: {}", e)))?;
    if bytes.len() > 32 {
        return Err(WalletError::parse_error(format!(
            "uint256 word too long: {} bytes",
            bytes.len()
        )));
    }

    // Values above u128 would not fit any balance this wallet handles
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    if word[..16].iter().any(|&b| b != 0) {
        return Err(WalletError::parse_error("uint256 value exceeds 128 bits"));
    }

    let mut out = [0u8; 16];
    out.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_selector() {
        // Well-known ERC-20 selector
        let data = encode_transfer(&[0u8; 20], 0);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn test_balance_of_selector() {
        let data = encode_balance_of(&[0u8; 20]);
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data.len(), 36);
    }

    #[test]
    fn test_transfer_layout() {
        let mut recipient = [0u8; 20];
        recipient[19] = 0x42;
        let data = encode_transfer(&recipient, 1_000_000);

        // Address is right-aligned in the first word
        assert_eq!(data[4 + 31], 0x42);
        assert!(data[4..4 + 12].iter().all(|&b| b == 0));

        // Amount is right-aligned in the second word
        let amount = decode_uint(&hex::encode(&data[36..68])).unwrap();
        assert_eq!(amount, 1_000_000);
    }

    #[test]
    fn test_decode_uint() {
        assert_eq!(decode_uint("0x").unwrap(), 0);
        assert_eq!(decode_uint("0x0de0b6b3a7640000").unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(
            decode_uint("0x00000000000000000000000000000000000000000000000000000000000f4240")
                .unwrap(),
            1_000_000
        );

        // Top 16 bytes set: out of range
        let too_big = format!("0x01{}", "00".repeat(31));
        assert!(decode_uint(&too_big).is_err());
    }
}
