use ga_api_types::{ContractDescriptor, ContractRole};
use ga_chain_client::{ContractHandle, HandleSet, WalletProvider};
use std::rc::Rc;
use tracing::debug;

use crate::{AdminError, Session};

/// Builds one handle per role, all scoped to the session's address.
///
/// All-or-nothing: every role must have a well-formed entry, otherwise no
/// handles are returned.
pub fn bind(
    descriptor: &ContractDescriptor,
    session: &Session,
    provider: Rc<dyn WalletProvider>,
) -> Result<HandleSet, AdminError> {
    let mut problems = Vec::new();
    let mut handles = HandleSet::default();

    for role in ContractRole::ALL {
        let name = role.descriptor_name();
        let Some(entry) = descriptor.entry(name) else {
            problems.push(format!("{name} missing"));
            continue;
        };

        match ContractHandle::new(
            role,
            entry.address.clone(),
            &entry.abi,
            session.authorized_address().clone(),
            provider.clone(),
        ) {
            Ok(handle) => handles.register(handle),
            Err(err) => problems.push(format!("{name} {err:#}")),
        }
    }

    if !problems.is_empty() {
        return Err(AdminError::BindingIncomplete(problems.join(", ")));
    }

    for entry in descriptor.entries() {
        if ContractRole::from_descriptor_name(&entry.name).is_none() {
            debug!(name = %entry.name, "ignoring descriptor entry without a role");
        }
    }

    Ok(handles)
}
