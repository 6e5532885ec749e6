//! Keycard Wallet Core
//!
//! Rust core that lets a hardware signing card (a device that can only
//! produce raw secp256k1 signatures over opaque 32-byte digests) authorize
//! transfers on EVM chains it was never told about.
//!
//! # Architecture
//!
//! - **chains / tokens**: static catalogs of supported networks, tokens,
//!   and per-chain contract addresses
//! - **tx**: transaction construction, signing-hash computation,
//!   recovery-id resolution, RLP assembly, and endpoint-fallback broadcast
//! - **signer**: the async hardware-signer seam, with cancellation and a
//!   one-operation-at-a-time gate
//! - **rpc**: JSON-RPC node client (balances, nonce, gas, submission)
//! - **pipeline**: drives one transfer through
//!   Built → HashComputed → Signed → RecoveryResolved → Encoded → Broadcast
//!
//! The card never learns about chains; the chain-binding policy (legacy vs
//! replay-protected signing) is fixed in [`config::WalletConfig`] and
//! threaded through the pipeline as a type, never inferred.

pub mod abi;
pub mod chains;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod rpc;
pub mod signer;
pub mod tokens;
pub mod tx;

// Re-export key types for convenience
pub use chains::{find_chain, ChainSpec};
pub use config::{SigningPolicy, WalletConfig};
pub use error::{ErrorCode, WalletError, WalletResult};
pub use pipeline::TransferPipeline;
pub use signer::{CancelHandle, CancelToken, HardwareSigner, RawSignature, SignerRef};
pub use tokens::Token;
pub use tx::{SignedTransaction, SigningHash, SigningMode, TransferRequest, UnsignedTransaction};
