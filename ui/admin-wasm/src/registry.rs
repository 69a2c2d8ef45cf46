//! Same-origin fetch of the contract descriptor.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use ga_api_types::ContractDescriptor;
use ga_chain_client::ContractRegistry;
use gloo_net::http::Request;
use serde_json::Value;

pub struct SameOriginRegistry {
    path: String,
}

impl Default for SameOriginRegistry {
    fn default() -> Self {
        Self {
            path: "/contract_data".to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl ContractRegistry for SameOriginRegistry {
    async fn fetch_descriptor(&self) -> Result<ContractDescriptor> {
        let response = Request::get(&self.path)
            .send()
            .await
            .map_err(|err| anyhow!("contract_data transport: {err}"))?;

        if !response.ok() {
            let text = response.text().await.unwrap_or_default();
            bail!("contract_data HTTP {}: {text}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| anyhow!("contract_data parse: {err}"))?;
        ContractDescriptor::from_json(&body).context("contract_data shape")
    }
}
