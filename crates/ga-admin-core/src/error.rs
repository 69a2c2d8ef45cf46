use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("no wallet provider detected")]
    ProviderAbsent,
    #[error("wallet authorization denied: {0}")]
    AuthorizationDenied(String),
    #[error("contract registry unavailable: {0}")]
    RegistryUnavailable(String),
    #[error("contract binding incomplete: {0}")]
    BindingIncomplete(String),
    #[error("{action} failed: {reason}")]
    ActionFailed { action: String, reason: String },
    #[error("no wallet session, connect first")]
    NotConnected,
}

impl AdminError {
    /// Errors raised while establishing a session.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            AdminError::ProviderAbsent
                | AdminError::AuthorizationDenied(_)
                | AdminError::RegistryUnavailable(_)
                | AdminError::BindingIncomplete(_)
        )
    }
}
