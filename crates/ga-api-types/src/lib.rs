use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

const ADDRESS_SUFFIX: &str = "Address";
const ABI_SUFFIX: &str = "ABI";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical contract roles the admin client binds after connecting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ContractRole {
    DaoGovernance,
    ThreadRegistry,
    PostRegistry,
    SysAdmin,
    Poster,
}

impl ContractRole {
    pub const ALL: [ContractRole; 5] = [
        ContractRole::DaoGovernance,
        ContractRole::ThreadRegistry,
        ContractRole::PostRegistry,
        ContractRole::SysAdmin,
        ContractRole::Poster,
    ];

    /// Entry name used by the `/contract_data` document.
    pub fn descriptor_name(self) -> &'static str {
        match self {
            ContractRole::DaoGovernance => "gremlinDAO",
            ContractRole::ThreadRegistry => "gremlinThread",
            ContractRole::PostRegistry => "gremlinPost",
            ContractRole::SysAdmin => "sysAdminContract",
            ContractRole::Poster => "poster",
        }
    }

    pub fn from_descriptor_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.descriptor_name() == name)
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor_name())
    }
}

/// Wire shape served by the backend at `GET /contract_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDataResponse {
    #[serde(rename = "gremlinDAOABI")]
    pub gremlin_dao_abi: Value,
    #[serde(rename = "gremlinDAOAddress")]
    pub gremlin_dao_address: String,
    #[serde(rename = "gremlinThreadABI")]
    pub gremlin_thread_abi: Value,
    #[serde(rename = "gremlinThreadAddress")]
    pub gremlin_thread_address: String,
    #[serde(rename = "gremlinPostABI")]
    pub gremlin_post_abi: Value,
    #[serde(rename = "gremlinPostAddress")]
    pub gremlin_post_address: String,
    #[serde(rename = "sysAdminContractABI")]
    pub sys_admin_contract_abi: Value,
    #[serde(rename = "sysAdminContractAddress")]
    pub sys_admin_contract_address: String,
    #[serde(rename = "posterABI")]
    pub poster_abi: Value,
    #[serde(rename = "posterAddress")]
    pub poster_address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractEntry {
    pub name: String,
    pub address: WalletAddress,
    pub abi: Value,
}

/// Addresses and ABIs for every named contract, fetched once per connect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractDescriptor {
    entries: Vec<ContractEntry>,
}

impl ContractDescriptor {
    pub fn new(entries: Vec<ContractEntry>) -> Self {
        Self { entries }
    }

    /// Parses the flat `<name>Address` / `<name>ABI` document.
    ///
    /// Every address field must be a string and must have a matching ABI
    /// field; an ABI without an address is rejected as well. Other fields are
    /// skipped. Entries for the known roles come first in role order,
    /// anything else follows by name.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| anyhow!("contract data must be a JSON object"))?;

        let mut entries = Vec::new();
        for (key, value) in object {
            if let Some(name) = key.strip_suffix(ABI_SUFFIX) {
                if !object.contains_key(&format!("{name}{ADDRESS_SUFFIX}")) {
                    return Err(anyhow!("{key} has no matching {name}{ADDRESS_SUFFIX}"));
                }
                continue;
            }

            let Some(name) = key.strip_suffix(ADDRESS_SUFFIX) else {
                debug!(field = %key, "ignoring contract data field");
                continue;
            };
            let address = value
                .as_str()
                .ok_or_else(|| anyhow!("{key} must be a string"))?;
            let abi = object
                .get(&format!("{name}{ABI_SUFFIX}"))
                .ok_or_else(|| anyhow!("{key} has no matching {name}{ABI_SUFFIX}"))?;

            entries.push(ContractEntry {
                name: name.to_owned(),
                address: WalletAddress(address.to_owned()),
                abi: abi.clone(),
            });
        }

        entries.sort_by(|a, b| {
            let rank = |entry: &ContractEntry| {
                ContractRole::from_descriptor_name(&entry.name)
                    .map(|role| role as usize)
                    .unwrap_or(ContractRole::ALL.len())
            };
            rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
        });

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ContractEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&ContractEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<ContractDataResponse> for ContractDescriptor {
    type Error = anyhow::Error;

    fn try_from(response: ContractDataResponse) -> Result<Self> {
        let body = serde_json::to_value(response)?;
        Self::from_json(&body)
    }
}
