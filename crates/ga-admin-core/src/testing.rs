//! In-memory stand-ins for the wallet, registry and UI seams.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ga_api_types::{ContractDescriptor, ContractEntry, ContractRole, WalletAddress};
use ga_chain_client::{ContractRegistry, WalletProvider, abi};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

pub const ADMIN: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

pub fn contract_address(role: ContractRole) -> String {
    let digit = match role {
        ContractRole::DaoGovernance => '1',
        ContractRole::ThreadRegistry => '2',
        ContractRole::PostRegistry => '3',
        ContractRole::SysAdmin => '4',
        ContractRole::Poster => '5',
    };
    format!("0x{}", digit.to_string().repeat(40))
}

fn function(name: &str, inputs: &[&str], outputs: &[&str]) -> Value {
    let params = |types: &[&str]| -> Vec<Value> {
        types
            .iter()
            .map(|kind| json!({"name": "", "type": kind}))
            .collect()
    };
    let mutability = if outputs.is_empty() { "nonpayable" } else { "view" };
    json!({
        "type": "function",
        "name": name,
        "inputs": params(inputs),
        "outputs": params(outputs),
        "stateMutability": mutability,
    })
}

pub fn abi_for(role: ContractRole) -> Value {
    match role {
        ContractRole::DaoGovernance => json!([
            function("setMaxSupply", &["uint256"], &[]),
            function("setReserve", &["uint256"], &[]),
            function("reserve", &[], &["uint256"]),
        ]),
        ContractRole::SysAdmin => json!([
            function("addModerator", &["address"], &[]),
            function("blacklistThread", &["uint256"], &[]),
            function("setSysAdmin", &["address"], &[]),
            function("owner", &[], &["address"]),
        ]),
        ContractRole::PostRegistry => json!([function("getPostCount", &[], &["uint256"])]),
        ContractRole::ThreadRegistry | ContractRole::Poster => json!([]),
    }
}

pub fn descriptor() -> ContractDescriptor {
    ContractDescriptor::new(
        ContractRole::ALL
            .into_iter()
            .map(|role| ContractEntry {
                name: role.descriptor_name().to_owned(),
                address: WalletAddress(contract_address(role)),
                abi: abi_for(role),
            })
            .collect(),
    )
}

pub fn descriptor_without(role: ContractRole) -> ContractDescriptor {
    ContractDescriptor::new(
        descriptor()
            .entries()
            .iter()
            .filter(|entry| entry.name != role.descriptor_name())
            .cloned()
            .collect(),
    )
}

/// Hex selector of `role.method` as it appears at the start of call data.
pub fn selector(role: ContractRole, method: &str, arity: usize) -> String {
    let abi = abi::parse_abi(&abi_for(role)).unwrap();
    let function = abi::find_function(&abi, method, arity).unwrap();
    format!("0x{}", hex::encode(function.selector().as_slice()))
}

#[derive(Debug, Clone)]
pub struct SentTx {
    pub from: String,
    pub to: String,
    pub data: String,
}

/// Wallet that authorizes a fixed account list and records transactions.
pub struct FakeWallet {
    accounts: Result<Vec<String>, String>,
    send_failures: RefCell<VecDeque<Option<String>>>,
    receipts: RefCell<VecDeque<Value>>,
    pub sent: RefCell<Vec<SentTx>>,
    pub calls: RefCell<Vec<SentTx>>,
    pub account_requests: Cell<usize>,
    pub receipt_lookups: Cell<usize>,
}

impl FakeWallet {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self::new(Ok(accounts.iter().map(|a| (*a).to_owned()).collect()))
    }

    pub fn denying(message: &str) -> Self {
        Self::new(Err(message.to_owned()))
    }

    fn new(accounts: Result<Vec<String>, String>) -> Self {
        Self {
            accounts,
            send_failures: RefCell::new(VecDeque::new()),
            receipts: RefCell::new(VecDeque::new()),
            sent: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            account_requests: Cell::new(0),
            receipt_lookups: Cell::new(0),
        }
    }

    /// Queues the outcome of the next `eth_sendTransaction`; `Some` rejects.
    pub fn queue_send(&self, failure: Option<&str>) {
        self.send_failures
            .borrow_mut()
            .push_back(failure.map(ToOwned::to_owned));
    }

    /// Scripts the next receipt lookups; afterwards every receipt succeeds.
    pub fn queue_receipts(&self, receipts: &[Value]) {
        self.receipts.borrow_mut().extend(receipts.iter().cloned());
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

fn tx_fields(params: &Value) -> SentTx {
    let tx = &params[0];
    SentTx {
        from: tx["from"].as_str().unwrap_or_default().to_owned(),
        to: tx["to"].as_str().unwrap_or_default().to_owned(),
        data: tx["data"].as_str().unwrap_or_default().to_owned(),
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match method {
            "eth_requestAccounts" => {
                self.account_requests.set(self.account_requests.get() + 1);
                match &self.accounts {
                    Ok(accounts) => Ok(json!(accounts)),
                    Err(message) => Err(anyhow!(message.clone())),
                }
            }
            "eth_sendTransaction" => {
                self.sent.borrow_mut().push(tx_fields(&params));
                // Yield so concurrent actions interleave like a real wallet.
                tokio::task::yield_now().await;
                let failure = self.send_failures.borrow_mut().pop_front().flatten();
                match failure {
                    Some(message) => Err(anyhow!(message)),
                    None => Ok(json!(format!("0x{:064x}", self.sent.borrow().len()))),
                }
            }
            "eth_getTransactionReceipt" => {
                self.receipt_lookups.set(self.receipt_lookups.get() + 1);
                let scripted = self.receipts.borrow_mut().pop_front();
                Ok(scripted.unwrap_or_else(|| json!({"status": "0x1", "blockNumber": "0x1"})))
            }
            "eth_call" => {
                self.calls.borrow_mut().push(tx_fields(&params));
                Ok(json!(format!("0x{:064x}", 1000)))
            }
            other => Err(anyhow!("unexpected method {other}")),
        }
    }

    async fn pause(&self, _delay: Duration) {
        tokio::task::yield_now().await;
    }
}

pub struct FakeRegistry {
    result: Result<ContractDescriptor, String>,
    pub fetches: Cell<usize>,
}

impl FakeRegistry {
    pub fn serving(descriptor: ContractDescriptor) -> Self {
        Self {
            result: Ok(descriptor),
            fetches: Cell::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_owned()),
            fetches: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl ContractRegistry for FakeRegistry {
    async fn fetch_descriptor(&self) -> Result<ContractDescriptor> {
        self.fetches.set(self.fetches.get() + 1);
        self.result.clone().map_err(|message| anyhow!(message))
    }
}

/// Answers prompts from a queue; an empty queue behaves like cancel.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Option<String>>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: RefCell::new(
                answers
                    .iter()
                    .map(|answer| answer.map(ToOwned::to_owned))
                    .collect(),
            ),
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl crate::ParameterPrompt for ScriptedPrompt {
    fn request(&self, message: &str) -> Option<String> {
        self.asked.borrow_mut().push(message.to_owned());
        self.answers.borrow_mut().pop_front().flatten()
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub notices: RefCell<Vec<String>>,
    pub diagnostics: RefCell<Vec<String>>,
    pub visible: Cell<bool>,
}

impl crate::AdminSurface for RecordingSurface {
    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_owned());
    }

    fn diagnostic(&self, message: &str) {
        self.diagnostics.borrow_mut().push(message.to_owned());
    }

    fn set_admin_controls_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}
