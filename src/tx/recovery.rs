//! Recovery-ID Resolution
//!
//! The keycard returns (r, s) with no recovery bit, and a given (hash, r, s)
//! is consistent with exactly two public keys. This module brute-forces the
//! two candidates against the expected signer identity. Recovery math is
//! chain-agnostic: candidates correspond to the legacy 27/28 version values
//! regardless of which mode produced the hash.

use super::SigningHash;
use crate::abi::keccak256;
use crate::error::{WalletError, WalletResult};
use crate::signer::RawSignature;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};

/// Normalize an expected public key to uncompressed 64-byte form.
///
/// Accepts 33-byte compressed keys (decompressed on the curve), 65-byte
/// uncompressed keys with the 0x04 tag (tag stripped), and bare 64-byte
/// keys.
pub fn normalize_public_key(key: &[u8]) -> WalletResult<[u8; 64]> {
    let mut out = [0u8; 64];
    match key.len() {
        33 => {
            let parsed = PublicKey::from_slice(key)?;
            out.copy_from_slice(&parsed.serialize_uncompressed()[1..]);
        }
        65 => {
            if key[0] != 0x04 {
                return Err(WalletError::crypto_error(format!(
                    "Unexpected public key tag: 0x{:02x}",
                    key[0]
                )));
            }
            out.copy_from_slice(&key[1..]);
        }
        64 => {
            out.copy_from_slice(key);
        }
        n => {
            return Err(WalletError::crypto_error(format!(
                "Unsupported public key length: {}",
                n
            )));
        }
    }
    Ok(out)
}

/// Ethereum-style address: last 20 bytes of keccak256(uncompressed key)
pub fn public_key_to_address(uncompressed: &[u8; 64]) -> [u8; 20] {
    let hash = keccak256(uncompressed);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    address
}

/// Determine which recovery id ∈ {0, 1} recovers the expected signer.
///
/// Fails terminally if neither candidate matches; a guessed id would be
/// rejected by every node and wastes a network round trip at best.
pub fn resolve_recovery_id(
    hash: &SigningHash,
    signature: &RawSignature,
    expected_public_key: &[u8],
) -> WalletResult<u8> {
    let expected = normalize_public_key(expected_public_key)?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest_slice(&hash.digest)?;
    let compact = signature.to_bytes();

    // The domain guarantees exactly two candidates; check both explicitly.
    for candidate in 0u8..2 {
        let recovery_id = RecoveryId::from_i32(candidate as i32)?;
        let recoverable = match RecoverableSignature::from_compact(&compact, recovery_id) {
            Ok(sig) => sig,
            Err(_) => continue,
        };
        let recovered = match secp.recover_ecdsa(&message, &recoverable) {
            Ok(key) => key,
            Err(_) => continue,
        };

        let mut recovered_bytes = [0u8; 64];
        recovered_bytes.copy_from_slice(&recovered.serialize_uncompressed()[1..]);

        if recovered_bytes == expected {
            return Ok(candidate);
        }
    }

    Err(WalletError::recovery_mismatch(
        "Neither recovery candidate matches the expected signer",
    ))
}
