pub mod abi;

use alloy_json_abi::JsonAbi;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use ga_api_types::{ContractDescriptor, ContractRole, WalletAddress};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Delay between receipt lookups while a transaction is being mined.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Request-based wallet capability (EIP-1193 shaped).
///
/// The browser implementation forwards to `window.ethereum.request`; the
/// native one speaks JSON-RPC over HTTP. Both run on a single thread, so the
/// trait does not require `Send`.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// Suspends the caller on the provider's own runtime timer.
    async fn pause(&self, delay: Duration);
}

/// Source of the contract descriptor (addresses and ABIs).
#[async_trait(?Send)]
pub trait ContractRegistry {
    async fn fetch_descriptor(&self) -> Result<ContractDescriptor>;
}

/// Asks the provider to authorize accounts and returns them in wallet order.
pub async fn request_accounts(provider: &dyn WalletProvider) -> Result<Vec<WalletAddress>> {
    let accounts = provider
        .request("eth_requestAccounts", json!([]))
        .await
        .context("eth_requestAccounts")?;

    let accounts = accounts
        .as_array()
        .ok_or_else(|| anyhow!("eth_requestAccounts returned {accounts}"))?;

    accounts
        .iter()
        .map(|account| {
            account
                .as_str()
                .map(|address| WalletAddress(address.to_owned()))
                .ok_or_else(|| anyhow!("account entry is not a string: {account}"))
        })
        .collect()
}

/// A mined transaction with a successful receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// A contract from the descriptor bound to the signing identity of a session.
#[derive(Clone)]
pub struct ContractHandle {
    role: ContractRole,
    address: WalletAddress,
    abi: JsonAbi,
    from: WalletAddress,
    provider: Rc<dyn WalletProvider>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("role", &self.role)
            .field("address", &self.address)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl ContractHandle {
    /// Validates both accounts and parses the ABI document.
    pub fn new(
        role: ContractRole,
        address: WalletAddress,
        abi: &Value,
        from: WalletAddress,
        provider: Rc<dyn WalletProvider>,
    ) -> Result<Self> {
        abi::parse_address(&address.0)?;
        abi::parse_address(&from.0).context("signing identity")?;
        let abi = abi::parse_abi(abi)?;

        Ok(Self {
            role,
            address,
            abi,
            from,
            provider,
        })
    }

    pub fn role(&self) -> ContractRole {
        self.role
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn from(&self) -> &WalletAddress {
        &self.from
    }

    fn call_object(&self, method: &str, args: &[String]) -> Result<Value> {
        let function = abi::find_function(&self.abi, method, args.len())
            .with_context(|| format!("{} {method}", self.role))?;
        let data = abi::encode_call(function, args)?;

        Ok(json!({
            "from": self.from.0,
            "to": self.address.0,
            "data": format!("0x{}", hex::encode(data)),
        }))
    }

    /// Sends `method(args)` as a transaction signed by the bound identity and
    /// waits until it is mined.
    ///
    /// The transaction is submitted once. Its receipt is then polled every
    /// [`RECEIPT_POLL_INTERVAL`] until present; a receipt with status `0x0`
    /// or a failed lookup is an error.
    pub async fn send(&self, method: &str, args: &[String]) -> Result<SubmittedTx> {
        let tx = self.call_object(method, args)?;

        debug!(role = %self.role, method, from = %self.from, "sending transaction");
        let tx_hash = self
            .provider
            .request("eth_sendTransaction", json!([tx]))
            .await
            .with_context(|| format!("{} {method} eth_sendTransaction", self.role))?;
        let tx_hash = tx_hash
            .as_str()
            .ok_or_else(|| anyhow!("eth_sendTransaction returned {tx_hash}"))?
            .to_owned();

        let receipt = self.wait_for_receipt(&tx_hash).await?;

        if receipt.get("status").and_then(Value::as_str) == Some("0x0") {
            bail!("transaction {tx_hash} reverted");
        }

        let block_number = receipt
            .get("blockNumber")
            .and_then(Value::as_str)
            .and_then(|n| u64::from_str_radix(n.trim_start_matches("0x"), 16).ok());

        Ok(SubmittedTx {
            tx_hash,
            block_number,
        })
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Value> {
        let mut lookups = 0_u32;
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await
                .with_context(|| format!("receipt lookup for {tx_hash}"))?;
            lookups += 1;

            if !receipt.is_null() {
                debug!(%tx_hash, lookups, "receipt available");
                return Ok(receipt);
            }
            self.provider.pause(RECEIPT_POLL_INTERVAL).await;
        }
    }

    /// Read-only `eth_call`; returns the first declared output rendered as text.
    pub async fn call(&self, method: &str, args: &[String]) -> Result<String> {
        let call = self.call_object(method, args)?;

        let result = self
            .provider
            .request("eth_call", json!([call, "latest"]))
            .await
            .with_context(|| format!("{} {method} eth_call", self.role))?;
        let result = result
            .as_str()
            .ok_or_else(|| anyhow!("eth_call returned {result}"))?;

        let function = abi::find_function(&self.abi, method, args.len())?;
        abi::decode_first_output(function, &abi::decode_hex(result)?)
    }
}

/// Handles for every contract role, all bound to the same identity.
#[derive(Debug, Clone, Default)]
pub struct HandleSet {
    handles: HashMap<ContractRole, ContractHandle>,
}

impl HandleSet {
    pub fn register(&mut self, handle: ContractHandle) {
        self.handles.insert(handle.role(), handle);
    }

    pub fn handle(&self, role: ContractRole) -> Option<&ContractHandle> {
        self.handles.get(&role)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractHandle> {
        self.handles.values()
    }
}
