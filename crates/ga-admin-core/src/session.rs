use ga_api_types::WalletAddress;
use ga_chain_client::{WalletProvider, request_accounts};
use std::rc::Rc;
use tracing::info;

use crate::AdminError;

/// Identity every transaction of a connect cycle is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    authorized_address: WalletAddress,
}

impl Session {
    pub fn authorized_address(&self) -> &WalletAddress {
        &self.authorized_address
    }
}

pub struct SessionManager {
    provider: Option<Rc<dyn WalletProvider>>,
}

impl SessionManager {
    /// `provider` is `None` when the environment exposes no wallet.
    pub fn new(provider: Option<Rc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Option<Rc<dyn WalletProvider>> {
        self.provider.clone()
    }

    /// Requests account authorization and keeps the first account.
    ///
    /// Waits for the wallet with no timeout.
    pub async fn connect(&self) -> Result<Session, AdminError> {
        let Some(provider) = self.provider.as_deref() else {
            return Err(AdminError::ProviderAbsent);
        };

        let accounts = request_accounts(provider)
            .await
            .map_err(|err| AdminError::AuthorizationDenied(format!("{err:#}")))?;

        let Some(authorized_address) = accounts.into_iter().next() else {
            return Err(AdminError::AuthorizationDenied(
                "wallet returned no accounts".to_owned(),
            ));
        };

        info!(address = %authorized_address, "wallet connected");
        Ok(Session { authorized_address })
    }
}
