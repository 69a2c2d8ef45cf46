//! Native HTTP adapters: the `/contract_data` backend and a JSON-RPC wallet
//! endpoint (a node with unlocked accounts, or a signer proxy).

mod provider;
mod registry;

pub use provider::JsonRpcWalletProvider;
pub use registry::HttpContractRegistry;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

fn endpoint_or_env(endpoint: Option<String>, var: &str, default: &str) -> String {
    let endpoint = endpoint
        .or_else(|| std::env::var(var).ok())
        .unwrap_or_else(|| default.to_string());
    endpoint.trim_end_matches('/').to_string()
}
