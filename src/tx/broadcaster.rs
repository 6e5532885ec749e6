//! Broadcast Dispatcher
//!
//! Submits the final byte string through the chain's RPC endpoints in
//! priority order. "Retry" here means strictly "try the next endpoint":
//! there is no per-endpoint retry and no backoff, and the terminal error
//! carries the last attempt's failure.

use crate::chains::ChainSpec;
use crate::error::{WalletError, WalletResult};
use crate::log_warn;
use crate::rpc::RpcClient;
use std::future::Future;

/// Outcome of a successful broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReceipt {
    /// Transaction hash as returned by the accepting node
    pub txid: String,
    /// Endpoint that accepted the transaction
    pub endpoint: String,
    /// Explorer link for the transaction
    pub explorer_url: String,
}

/// Broadcast a raw signed transaction on the given chain
pub async fn broadcast(
    client: &RpcClient,
    chain: &ChainSpec,
    raw: &[u8],
) -> WalletResult<BroadcastReceipt> {
    let (txid, endpoint) = submit_with_fallback(&chain.rpc_endpoints, |endpoint| {
        client.send_raw_transaction(endpoint, raw)
    })
    .await?;

    Ok(BroadcastReceipt {
        explorer_url: chain.explorer_url(&txid),
        endpoint: endpoint.to_string(),
        txid,
    })
}

/// Walk the endpoint list in order, returning the first success.
///
/// Each failure is recorded and logged but only the last one survives into
/// the terminal error.
pub async fn submit_with_fallback<'a, F, Fut>(
    endpoints: &'a [&'a str],
    submit: F,
) -> WalletResult<(String, &'a str)>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = WalletResult<String>>,
{
    let mut last_error = WalletError::broadcast_failed("No RPC endpoints configured");

    for endpoint in endpoints {
        match submit(endpoint).await {
            Ok(txid) => return Ok((txid, endpoint)),
            Err(e) => {
                log_warn!(
                    "tx.broadcaster",
                    "Endpoint rejected submission, advancing",
                    endpoint = endpoint,
                    error = e,
                );
                last_error = e.with_details(format!("last attempt: {}", endpoint));
            }
        }
    }

    Err(last_error)
}
