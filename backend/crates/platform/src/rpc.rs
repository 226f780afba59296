//! JSON-RPC 2.0 Client
//!
//! Minimal HTTP JSON-RPC client for reading chain state from an
//! Ethereum-compatible node. Each call is independent; the per-request
//! timeout is enforced by the underlying HTTP client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC failure
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport failure (connect, timeout, non-2xx status)
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    /// Response had neither `result` nor `error`, or `result` had the wrong shape
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Build a client with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Call `method` with `params` and decode the `result` field
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_response(method, response)
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, response: RpcResponse) -> Result<T, RpcError> {
    if let Some(err) = response.error {
        tracing::debug!(method, code = err.code, "RPC node returned error");
        return Err(RpcError::Node {
            code: err.code,
            message: err.message,
        });
    }
    let result = response
        .result
        .ok_or_else(|| RpcError::Malformed(format!("{method}: missing result")))?;
    serde_json::from_value(result).map_err(|e| RpcError::Malformed(format!("{method}: {e}")))
}

/// Parse an Ethereum hex quantity (`0x1f4`) into `u128`.
///
/// `0x` alone is rejected; leading zeros are tolerated.
pub fn parse_quantity(s: &str) -> Result<u128, RpcError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Malformed(format!("quantity without 0x prefix: {s}")))?;
    if digits.is_empty() {
        return Err(RpcError::Malformed("empty quantity".to_string()));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Malformed(format!("bad quantity {s}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1f4").unwrap(), 500);
        assert_eq!(parse_quantity("0x00ff").unwrap(), 255);
        assert_eq!(
            parse_quantity("0xde0b6b3a7640000").unwrap(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_parse_quantity_rejects_malformed() {
        assert!(parse_quantity("1f4").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_decode_response_result() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x1f4"}"#).unwrap();
        let value: String = decode_response("eth_blockNumber", response).unwrap();
        assert_eq!(value, "0x1f4");
    }

    #[test]
    fn test_decode_response_error_object() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"header not found"}}"#,
        )
        .unwrap();
        let err = decode_response::<String>("eth_getBalance", response).unwrap_err();
        assert!(matches!(err, RpcError::Node { code: -32000, .. }));
    }

    #[test]
    fn test_decode_response_missing_result() {
        let response: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        let err = decode_response::<String>("eth_blockNumber", response).unwrap_err();
        assert!(matches!(err, RpcError::Malformed(_)));
    }

    #[test]
    fn test_client_construction() {
        let client = JsonRpcClient::new("http://localhost:8545", Duration::from_secs(1)).unwrap();
        assert_eq!(client.next_id.load(Ordering::Relaxed), 1);
    }
}
