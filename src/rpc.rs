//! Blockchain Node RPC Client
//!
//! Thin async JSON-RPC 2.0 client for the handful of node calls the
//! transfer pipeline needs. Node-reported errors surface as `NodeRejected`
//! so callers can tell a rejecting node from a dead one; every failure
//! names the originating operation.

use crate::abi;
use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// JSON-RPC client, one per pipeline, connection pool shared across calls
pub struct RpcClient {
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u32,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcClient {
    pub fn new(config: &WalletConfig) -> WalletResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| WalletError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Issue a single JSON-RPC call against one endpoint
    pub async fn call(&self, endpoint: &str, method: &str, params: Value) -> WalletResult<Value> {
        let response = self
            .client
            .post(endpoint)
            .json(&RpcRequest {
                jsonrpc: "2.0",
                method,
                params,
                id: 1,
            })
            .send()
            .await
            .map_err(|e| {
                WalletError::from(e).with_details(format!("{} via {}", method, endpoint))
            })?;

        if !response.status().is_success() {
            return Err(WalletError::network_error(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::parse_error(format!("{} response: {}", method, e)))?;

        if let Some(err) = body.error {
            return Err(WalletError::node_rejected(format!(
                "{} rejected ({}): {}",
                method, err.code, err.message
            )));
        }

        body.result
            .ok_or_else(|| WalletError::parse_error(format!("{}: empty result", method)))
    }

    async fn call_quantity(
        &self,
        endpoint: &str,
        method: &str,
        params: Value,
    ) -> WalletResult<u128> {
        let result = self.call(endpoint, method, params).await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| WalletError::parse_error(format!("{}: non-string result", method)))?;
        parse_quantity(hex_str)
    }

    /// Native balance in wei (`eth_getBalance`, latest)
    pub async fn get_balance(&self, endpoint: &str, address: &[u8; 20]) -> WalletResult<u128> {
        self.call_quantity(
            endpoint,
            "eth_getBalance",
            serde_json::json!([format_address(address), "latest"]),
        )
        .await
    }

    /// ERC-20 balance via `eth_call` of `balanceOf(owner)`
    pub async fn get_erc20_balance(
        &self,
        endpoint: &str,
        contract: &[u8; 20],
        owner: &[u8; 20],
    ) -> WalletResult<u128> {
        let calldata = abi::encode_balance_of(owner);
        let result = self
            .call(
                endpoint,
                "eth_call",
                serde_json::json!([
                    {
                        "to": format_address(contract),
                        "data": format!("0x{}", hex::encode(&calldata)),
                    },
                    "latest"
                ]),
            )
            .await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| WalletError::parse_error("eth_call: non-string result"))?;
        abi::decode_uint(hex_str)
    }

    /// Next nonce including pending transactions
    pub async fn get_pending_nonce(&self, endpoint: &str, address: &[u8; 20]) -> WalletResult<u64> {
        let nonce = self
            .call_quantity(
                endpoint,
                "eth_getTransactionCount",
                serde_json::json!([format_address(address), "pending"]),
            )
            .await?;
        Ok(nonce as u64)
    }

    /// Current gas price in wei
    pub async fn get_gas_price(&self, endpoint: &str) -> WalletResult<u128> {
        self.call_quantity(endpoint, "eth_gasPrice", serde_json::json!([]))
            .await
    }

    /// Gas estimate for a call
    pub async fn estimate_gas(
        &self,
        endpoint: &str,
        from: &[u8; 20],
        to: &[u8; 20],
        value: u128,
        data: &[u8],
    ) -> WalletResult<u64> {
        let mut call = serde_json::json!({
            "from": format_address(from),
            "to": format_address(to),
            "value": format!("0x{:x}", value),
        });
        if !data.is_empty() {
            call["data"] = Value::String(format!("0x{}", hex::encode(data)));
        }

        let estimate = self
            .call_quantity(endpoint, "eth_estimateGas", serde_json::json!([call]))
            .await?;
        Ok(estimate as u64)
    }

    /// Submit a raw signed transaction; returns the transaction hash
    pub async fn send_raw_transaction(&self, endpoint: &str, raw: &[u8]) -> WalletResult<String> {
        let result = self
            .call(
                endpoint,
                "eth_sendRawTransaction",
                serde_json::json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| WalletError::parse_error("eth_sendRawTransaction: non-string result"))
    }
}

/// 0x-prefixed lowercase hex address
pub fn format_address(address: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parse a 0x-prefixed hex quantity
pub fn parse_quantity(hex_str: &str) -> WalletResult<u128> {
    let cleaned = hex_str.trim_start_matches("0x");
    if cleaned.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(cleaned, 16)
        .map_err(|e| WalletError::parse_error(format!("Invalid quantity {}: {}", hex_str, e)))
}
