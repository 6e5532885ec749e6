//! Unified error types for the keycard wallet core
//!
//! All failures flow through this module so the embedding layer can tell
//! configuration, validation, network, cryptographic, and cancellation
//! failures apart without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all wallet-core operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl WalletError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn unknown_chain(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownChain, msg)
    }

    pub fn token_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::TokenUnavailable, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, msg)
    }

    pub fn self_transfer(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SelfTransfer, msg)
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, msg)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn node_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NodeRejected, msg)
    }

    pub fn broadcast_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BroadcastFailed, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn recovery_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RecoveryMismatch, msg)
    }

    pub fn signing_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailed, msg)
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// True for failures the caller should treat as a normal user abort.
    pub fn is_cancellation(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WalletError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Configuration errors (detected before any network call)
    UnknownChain,
    TokenUnavailable,

    // Validation errors (detected before a signing hash is computed)
    InvalidAddress,
    InvalidAmount,
    SelfTransfer,
    InsufficientFunds,

    // Network errors
    NetworkError,
    Timeout,
    NodeRejected,
    BroadcastFailed,

    // Cryptographic errors
    CryptoError,
    RecoveryMismatch,
    SigningFailed,

    // Cancellation (a normal abort, not a fault)
    Cancelled,

    // Parse / internal
    ParseError,
    Internal,
}

/// Result type alias for wallet-core operations
pub type WalletResult<T> = Result<T, WalletError>;

// Conversions from common error types

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::new(ErrorCode::ParseError, e.to_string())
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(e: hex::FromHexError) -> Self {
        WalletError::new(ErrorCode::ParseError, e.to_string())
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WalletError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            WalletError::new(ErrorCode::NetworkError, "Connection failed")
        } else {
            WalletError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}

impl From<secp256k1::Error> for WalletError {
    fn from(e: secp256k1::Error) -> Self {
        WalletError::new(ErrorCode::CryptoError, format!("Secp256k1 error: {}", e))
    }
}
