//! Transfer Pipeline
//!
//! Drives one transfer through the fixed sequence
//! Built -> HashComputed -> Signed -> RecoveryResolved -> Encoded ->
//! Broadcast. Failure at any stage halts the pipeline; nothing partially
//! signed or partially encoded is ever broadcast.

use crate::chains::{ActiveChain, ChainSpec};
use crate::config::{SigningPolicy, WalletConfig};
use crate::error::{WalletError, WalletResult};
use crate::rpc::RpcClient;
use crate::signer::{CancelToken, HardwareSigner, SignerGate, SignerRef};
use crate::tokens::{self, Token};
use crate::tx::broadcaster::{self, BroadcastReceipt};
use crate::tx::builder::{self, TransferRequest};
use crate::tx::recovery;
use crate::tx::{encoder, hashing, SigningMode};
use crate::{log_debug, log_info};
use std::sync::Arc;

/// One pipeline per signing device, shared by the orchestration layer
pub struct TransferPipeline {
    config: WalletConfig,
    rpc: RpcClient,
    gate: SignerGate,
    signer_ref: SignerRef,
    sender: [u8; 20],
    active_chain: ActiveChain,
}

impl TransferPipeline {
    /// Create a pipeline for a device whose public key is already known
    /// from the card session.
    pub fn new(
        config: WalletConfig,
        device: Arc<dyn HardwareSigner>,
        signer_ref: SignerRef,
        initial_chain: ChainSpec,
    ) -> WalletResult<Self> {
        let rpc = RpcClient::new(&config)?;
        let normalized = recovery::normalize_public_key(&signer_ref.public_key)?;
        let sender = recovery::public_key_to_address(&normalized);

        Ok(Self {
            config,
            rpc,
            gate: SignerGate::new(device),
            signer_ref,
            sender,
            active_chain: ActiveChain::new(initial_chain),
        })
    }

    /// The wallet address derived from the device's public key
    pub fn sender_address(&self) -> [u8; 20] {
        self.sender
    }

    /// Switch to a built-in chain by id
    pub fn select_chain(&self, chain_id: u64) -> WalletResult<()> {
        let chain = crate::chains::find_chain(chain_id)
            .ok_or_else(|| WalletError::unknown_chain(format!("Unknown chain id {}", chain_id)))?;
        self.active_chain.select(chain.clone());
        Ok(())
    }

    /// Switch to a caller-supplied chain definition
    pub fn select_custom_chain(&self, chain: ChainSpec) {
        self.active_chain.select(chain);
    }

    /// The chain the next transfer will use
    pub fn current_chain(&self) -> Arc<ChainSpec> {
        self.active_chain.snapshot()
    }

    /// Tokens transferable on the currently selected chain
    pub fn available_tokens(&self) -> Vec<Token> {
        tokens::tokens_for_chain(self.active_chain.snapshot().chain_id)
    }

    /// Balance of a token for the wallet address, in smallest units
    pub async fn get_balance(&self, token: &Token) -> WalletResult<u128> {
        let chain = self.active_chain.snapshot();
        let endpoint = chain.primary_endpoint();
        match token {
            Token::Native => self.rpc.get_balance(endpoint, &self.sender).await,
            Token::Erc20(t) => {
                let contract =
                    tokens::contract_address(token, chain.chain_id).ok_or_else(|| {
                        WalletError::token_unavailable(format!(
                            "{} has no contract on {}",
                            t.symbol, chain.name
                        ))
                    })?;
                self.rpc
                    .get_erc20_balance(endpoint, &contract, &self.sender)
                    .await
            }
        }
    }

    /// Execute one transfer end to end.
    ///
    /// The selected chain is snapshotted exactly once, so nonce, contract
    /// lookups, and broadcast endpoints all agree even if the selection
    /// changes mid-flight. Cancellation during signing discards the
    /// unsigned transaction with no side effects.
    pub async fn send_transfer(
        &self,
        request: &TransferRequest,
        cancel: CancelToken,
    ) -> WalletResult<BroadcastReceipt> {
        let chain = self.active_chain.snapshot();
        let mode = match self.config.signing_policy {
            SigningPolicy::Legacy => SigningMode::Legacy,
            SigningPolicy::ChainBound => SigningMode::Eip155 {
                chain_id: chain.chain_id,
            },
        };

        let unsigned = builder::build_transfer(&self.rpc, &chain, &self.sender, request).await?;
        log_debug!(
            "pipeline",
            "Transfer built",
            chain = chain.name,
            nonce = unsigned.nonce,
            gas_limit = unsigned.gas_limit,
        );

        let hash = hashing::signing_hash(&unsigned, mode);
        log_debug!("pipeline", "Signing hash computed", digest = hash.digest_hex());

        let signature = self
            .gate
            .sign(hash.digest, &self.signer_ref, cancel)
            .await?;

        let recovery_id = recovery::resolve_recovery_id(&hash, &signature, &self.signer_ref.public_key)?;
        log_debug!("pipeline", "Recovery id resolved", recovery_id = recovery_id);

        let (signed, raw) = encoder::encode_signed(&unsigned, &hash, &signature, recovery_id);
        log_debug!("pipeline", "Transaction encoded", v = signed.v, bytes = raw.len());

        let receipt = broadcaster::broadcast(&self.rpc, &chain, &raw).await?;
        log_info!(
            "pipeline",
            "Transfer broadcast",
            chain = chain.name,
            txid = receipt.txid,
            endpoint = receipt.endpoint,
        );

        Ok(receipt)
    }
}
