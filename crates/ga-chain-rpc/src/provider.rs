use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use ga_chain_client::WalletProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::{DEFAULT_RPC_URL, endpoint_or_env};

/// JSON-RPC 2.0 wallet endpoint over HTTP.
///
/// Reads `GREMLIN_RPC_URL` from environment at construction time
/// (default: `http://localhost:8545`). The endpoint must sign
/// `eth_sendTransaction` for the authorized account itself.
pub struct JsonRpcWalletProvider {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for JsonRpcWalletProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl JsonRpcWalletProvider {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint_or_env(endpoint, "GREMLIN_RPC_URL", DEFAULT_RPC_URL),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ── JSON-RPC wire types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[async_trait(?Send)]
impl WalletProvider for JsonRpcWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = body.id, "json-rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{method} HTTP {status}: {text}");
        }

        let body: RpcResponse = response
            .json()
            .await
            .with_context(|| format!("{method} parse"))?;

        if let Some(err) = body.error {
            return Err(anyhow!("{method} rejected ({}): {}", err.code, err.message));
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
