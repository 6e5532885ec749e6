//! Transaction Pipeline
//!
//! Everything between a validated transfer intent and a broadcast-ready byte
//! string: construction, signing-hash computation, recovery-id resolution,
//! final RLP assembly, and endpoint-fallback broadcast.

pub mod broadcaster;
pub mod builder;
pub mod encoder;
pub mod hashing;
pub mod recovery;
mod rlp;

pub use broadcaster::{broadcast, BroadcastReceipt};
pub use builder::{build_transfer, TransferRequest};
pub use encoder::{encode_signed, version_byte};
pub use hashing::signing_hash;
pub use recovery::{normalize_public_key, public_key_to_address, resolve_recovery_id};

use serde::{Deserialize, Serialize};

/// A fully constructed but unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: [u8; 20],
    pub value: u128,
    /// Empty for native transfers; ABI-encoded call for token transfers
    pub data: Vec<u8>,
}

/// How the signing hash binds (or doesn't bind) the transaction to a chain.
///
/// The mode that produced a hash also fixes the final version-byte formula;
/// the two travel together inside [`SigningHash`] so they can never be
/// mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningMode {
    /// Plain 6-field hash, version byte 27/28. No replay protection.
    Legacy,
    /// 9-field hash with the chain id folded in, version byte
    /// `chain_id * 2 + 35 + recovery_id`.
    Eip155 { chain_id: u64 },
}

/// A 32-byte signing digest, inseparable from the mode that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningHash {
    pub digest: [u8; 32],
    pub mode: SigningMode,
}

impl SigningHash {
    pub fn digest_hex(&self) -> String {
        format!("0x{}", hex::encode(self.digest))
    }
}

/// An unsigned transaction plus its resolved signature components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx: UnsignedTransaction,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}
