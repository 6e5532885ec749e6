//! Final Assembly
//!
//! Computes the signature version byte from the mode that produced the
//! signing hash and serializes the signed 9-field transaction with canonical
//! RLP, ready for `eth_sendRawTransaction`.

use super::rlp;
use super::{SignedTransaction, SigningHash, SigningMode, UnsignedTransaction};
use crate::signer::RawSignature;

/// Version byte for a resolved recovery id.
///
/// Legacy: `v = 27 + recovery_id`
/// Eip155: `v = chain_id * 2 + 35 + recovery_id`
pub fn version_byte(mode: SigningMode, recovery_id: u8) -> u64 {
    match mode {
        SigningMode::Legacy => 27 + recovery_id as u64,
        SigningMode::Eip155 { chain_id } => chain_id * 2 + 35 + recovery_id as u64,
    }
}

/// Assemble and serialize the signed transaction.
///
/// The mode is taken from the [`SigningHash`] the signature was produced
/// over, so the version byte always agrees with the hash serialization.
pub fn encode_signed(
    tx: &UnsignedTransaction,
    hash: &SigningHash,
    signature: &RawSignature,
    recovery_id: u8,
) -> (SignedTransaction, Vec<u8>) {
    let v = version_byte(hash.mode, recovery_id);

    let items = vec![
        rlp::encode_u64(tx.nonce),
        rlp::encode_u128(tx.gas_price),
        rlp::encode_u64(tx.gas_limit),
        rlp::encode_address(&tx.to),
        rlp::encode_u128(tx.value),
        rlp::encode_bytes(&tx.data),
        rlp::encode_u64(v),
        rlp::encode_scalar(&signature.r),
        rlp::encode_scalar(&signature.s),
    ];

    let raw = rlp::encode_list(&items);

    let signed = SignedTransaction {
        tx: tx.clone(),
        v,
        r: signature.r,
        s: signature.s,
    };

    (signed, raw)
}
