//! Wallet Configuration
//!
//! Values the embedding layer fixes at startup and passes in explicitly.

use serde::{Deserialize, Serialize};

/// How transfer signing hashes are bound to a chain.
///
/// This is a deployment policy, chosen once by the embedder and never
/// auto-detected. `Legacy` signs the plain transaction tuple and broadcasts
/// with the pre-replay-protection version byte; `ChainBound` folds the chain
/// id into the signed hash and the version byte so a signature cannot be
/// replayed on another chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningPolicy {
    Legacy,
    ChainBound,
}

/// Configuration for the transfer pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Signing-hash policy applied to every transfer
    pub signing_policy: SigningPolicy,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// HTTP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            signing_policy: SigningPolicy::ChainBound,
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
        }
    }
}
