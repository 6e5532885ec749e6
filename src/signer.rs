//! Hardware Signer Interface
//!
//! The keycard is an external device that signs opaque 32-byte digests with
//! secp256k1 and returns a bare (r, s) pair. It exposes no recovery bit and
//! no private key, knows nothing about chains or transaction formats, and a
//! single physical card can only run one signing session at a time.

use crate::error::WalletError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// A bare secp256k1 signature: exactly (r, s), no recovery information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl RawSignature {
    /// Parse a 64-byte r || s blob
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        if bytes.len() != 64 {
            return Err(SignerError::MalformedSignature(bytes.len()));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s })
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

/// Identifies which key on the device should sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerRef {
    /// The signer's public key as the device reports it (33, 64, or 65 bytes)
    pub public_key: Vec<u8>,
}

/// Errors from the signing device
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Signing cancelled")]
    Cancelled,

    #[error("Device failure: {0}")]
    Device(String),

    #[error("Malformed signature: expected 64 bytes, got {0}")]
    MalformedSignature(usize),
}

impl From<SignerError> for WalletError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::Cancelled => WalletError::cancelled("Signing cancelled"),
            other => WalletError::signing_failed(other.to_string()),
        }
    }
}

/// Interface to the hardware signing device.
///
/// A signing call may block for a human-timescale duration: the user has to
/// present the card and enter an access code. Implementations must return
/// [`SignerError::Cancelled`] promptly once the paired [`CancelToken`]
/// fires.
#[async_trait]
pub trait HardwareSigner: Send + Sync {
    /// Sign an opaque 32-byte digest with the referenced key
    async fn sign(
        &self,
        digest: [u8; 32],
        signer: &SignerRef,
        cancel: CancelToken,
    ) -> Result<RawSignature, SignerError>;
}

/// Hands the caller a way to abort an in-flight signing request
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Passed to the signer; resolves once cancellation is requested
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// Request cancellation of the in-flight signing operation
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    /// A token that never fires, for callers without a cancel surface
    pub fn never() -> Self {
        let (_handle, token) = CancelHandle::new();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is requested
    pub async fn cancelled(&mut self) {
        // Channel closure (handle dropped) means cancellation can no longer
        // arrive; park forever rather than spuriously aborting the signer.
        if self.rx.wait_for(|&c| c).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Serializes access to the single physical signing device.
///
/// Exactly one signing operation may be outstanding; a second request waits
/// until the first completes, fails, or is cancelled.
pub struct SignerGate {
    device: Arc<dyn HardwareSigner>,
    slot: tokio::sync::Mutex<()>,
}

impl SignerGate {
    pub fn new(device: Arc<dyn HardwareSigner>) -> Self {
        Self {
            device,
            slot: tokio::sync::Mutex::new(()),
        }
    }

    /// Acquire the device and sign, racing the signer against cancellation
    pub async fn sign(
        &self,
        digest: [u8; 32],
        signer: &SignerRef,
        mut cancel: CancelToken,
    ) -> Result<RawSignature, SignerError> {
        let _slot = self.slot.lock().await;

        if cancel.is_cancelled() {
            return Err(SignerError::Cancelled);
        }

        tokio::select! {
            result = self.device.sign(digest, signer, cancel.clone()) => result,
            _ = cancel.cancelled() => Err(SignerError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Signer that completes after a delay, tracking concurrent entries
    struct SlowSigner {
        concurrent: AtomicUsize,
        max_seen: AtomicUsize,
    }

    #[async_trait]
    impl HardwareSigner for SlowSigner {
        async fn sign(
            &self,
            _digest: [u8; 32],
            _signer: &SignerRef,
            _cancel: CancelToken,
        ) -> Result<RawSignature, SignerError> {
            let now = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.concurrent.fetch_sub(1, Ordering::SeqCst);
            Ok(RawSignature {
                r: [1u8; 32],
                s: [2u8; 32],
            })
        }
    }

    /// Signer that never returns on its own
    struct HangingSigner;

    #[async_trait]
    impl HardwareSigner for HangingSigner {
        async fn sign(
            &self,
            _digest: [u8; 32],
            _signer: &SignerRef,
            mut cancel: CancelToken,
        ) -> Result<RawSignature, SignerError> {
            cancel.cancelled().await;
            Err(SignerError::Cancelled)
        }
    }

    fn test_ref() -> SignerRef {
        SignerRef {
            public_key: vec![0x02; 33],
        }
    }

    #[test]
    fn test_raw_signature_roundtrip() {
        let sig = RawSignature {
            r: [0xaa; 32],
            s: [0xbb; 32],
        };
        let parsed = RawSignature::from_bytes(&sig.to_bytes()).unwrap();
        assert_eq!(parsed, sig);

        assert!(matches!(
            RawSignature::from_bytes(&[0u8; 63]),
            Err(SignerError::MalformedSignature(63))
        ));
    }

    #[tokio::test]
    async fn test_gate_serializes_signing() {
        let signer = Arc::new(SlowSigner {
            concurrent: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
        });
        let gate = Arc::new(SignerGate::new(signer.clone()));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                gate.sign([0u8; 32], &test_ref(), CancelToken::never())
                    .await
            }));
        }
        for h in handles {
            assert!(h.await.unwrap().is_ok());
        }

        assert_eq!(signer.max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_signing() {
        let gate = SignerGate::new(Arc::new(HangingSigner));
        let (handle, token) = CancelHandle::new();

        let sign = tokio::spawn(async move {
            let gate = gate;
            gate.sign([0u8; 32], &test_ref(), token).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();

        let result = sign.await.unwrap();
        assert!(matches!(result, Err(SignerError::Cancelled)));
    }
}
