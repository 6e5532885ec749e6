//! Signing-Hash Computation
//!
//! Produces the exact 32-byte digest the keycard signs. Two mutually
//! exclusive serializations exist; the chosen [`SigningMode`] rides along in
//! the returned [`SigningHash`] and later fixes the version-byte formula, so
//! hash and assembly can never disagree.

use super::rlp;
use super::{SigningHash, SigningMode, UnsignedTransaction};
use crate::abi::keccak256;

/// Compute the signing digest for a transaction in the given mode.
///
/// Legacy: keccak256(RLP([nonce, gasPrice, gasLimit, to, value, data]))
/// Eip155: keccak256(RLP([nonce, gasPrice, gasLimit, to, value, data,
///                        chainId, 0, 0]))
pub fn signing_hash(tx: &UnsignedTransaction, mode: SigningMode) -> SigningHash {
    let mut items = vec![
        rlp::encode_u64(tx.nonce),
        rlp::encode_u128(tx.gas_price),
        rlp::encode_u64(tx.gas_limit),
        rlp::encode_address(&tx.to),
        rlp::encode_u128(tx.value),
        rlp::encode_bytes(&tx.data),
    ];

    if let SigningMode::Eip155 { chain_id } = mode {
        items.push(rlp::encode_u64(chain_id));
        items.push(rlp::encode_u64(0));
        items.push(rlp::encode_u64(0));
    }

    let encoded = rlp::encode_list(&items);

    SigningHash {
        digest: keccak256(&encoded),
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: [0x35; 20],
            value: 1_000_000_000_000_000_000,
            data: vec![],
        }
    }

    #[test]
    fn test_modes_differ() {
        let tx = sample_tx();
        let legacy = signing_hash(&tx, SigningMode::Legacy);
        let bound = signing_hash(&tx, SigningMode::Eip155 { chain_id: 1 });
        assert_ne!(legacy.digest, bound.digest);
        assert_eq!(legacy.mode, SigningMode::Legacy);
        assert_eq!(bound.mode, SigningMode::Eip155 { chain_id: 1 });
    }

    #[test]
    fn test_chain_id_changes_digest() {
        let tx = sample_tx();
        let on_one = signing_hash(&tx, SigningMode::Eip155 { chain_id: 1 });
        let on_137 = signing_hash(&tx, SigningMode::Eip155 { chain_id: 137 });
        assert_ne!(on_one.digest, on_137.digest);
    }

    #[test]
    fn test_deterministic() {
        let tx = sample_tx();
        let a = signing_hash(&tx, SigningMode::Eip155 { chain_id: 1 });
        let b = signing_hash(&tx, SigningMode::Eip155 { chain_id: 1 });
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn test_eip155_reference_vector() {
        // The worked example from the EIP-155 specification: nonce 9,
        // 20 gwei, 21000 gas, to 0x3535...35, 1 ether, no data, chain 1.
        let tx = UnsignedTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: [0x35; 20],
            value: 1_000_000_000_000_000_000,
            data: vec![],
        };
        let hash = signing_hash(&tx, SigningMode::Eip155 { chain_id: 1 });
        assert_eq!(
            hash.digest_hex(),
            "0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }
}
