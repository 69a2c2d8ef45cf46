use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use ga_api_types::ContractDescriptor;
use ga_chain_client::ContractRegistry;
use serde_json::Value;
use tracing::debug;

use crate::{DEFAULT_BACKEND_URL, endpoint_or_env};

/// HTTP client for the backend's `GET /contract_data` document.
///
/// Reads `GREMLIN_BACKEND_URL` from environment at construction time
/// (default: `http://localhost:5000`).
pub struct HttpContractRegistry {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for HttpContractRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpContractRegistry {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint_or_env(endpoint, "GREMLIN_BACKEND_URL", DEFAULT_BACKEND_URL),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl ContractRegistry for HttpContractRegistry {
    async fn fetch_descriptor(&self) -> Result<ContractDescriptor> {
        let url = format!("{}/contract_data", self.endpoint);
        debug!(%url, "fetching contract descriptor");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("contract_data transport")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("contract_data HTTP {status}: {text}");
        }

        let body: Value = response.json().await.context("contract_data parse")?;
        ContractDescriptor::from_json(&body).context("contract_data shape")
    }
}
