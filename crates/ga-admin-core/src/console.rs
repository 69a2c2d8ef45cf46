use ga_api_types::{ContractRole, WalletAddress};
use ga_chain_client::{ContractRegistry, HandleSet, WalletProvider};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

use crate::{
    ActionOutcome, AdminAction, AdminError, AdminSurface, Dispatcher, ParameterPrompt, Session,
    SessionManager, bind,
};

const PROVIDER_ABSENT_NOTICE: &str =
    "No wallet provider found. Install a browser wallet such as MetaMask to use this feature.";

/// Read-only calls shown by [`AdminConsole::overview`].
const OVERVIEW: [(&str, ContractRole, &str); 3] = [
    ("SysAdmin owner", ContractRole::SysAdmin, "owner"),
    ("DAO reserve", ContractRole::DaoGovernance, "reserve"),
    ("Post count", ContractRole::PostRegistry, "getPostCount"),
];

/// Session plus the handles bound to it; replaced as a whole on reconnect.
#[derive(Debug)]
pub struct ActiveSession {
    pub session: Session,
    pub handles: HandleSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub label: &'static str,
    pub role: ContractRole,
    pub method: &'static str,
    pub value: Result<String, String>,
}

/// Owns the connect lifecycle and exposes one hook per admin action.
pub struct AdminConsole {
    sessions: SessionManager,
    registry: Rc<dyn ContractRegistry>,
    dispatcher: Dispatcher,
    surface: Rc<dyn AdminSurface>,
    active: RefCell<Option<Rc<ActiveSession>>>,
}

impl AdminConsole {
    pub fn new(
        provider: Option<Rc<dyn WalletProvider>>,
        registry: Rc<dyn ContractRegistry>,
        prompt: Rc<dyn ParameterPrompt>,
        surface: Rc<dyn AdminSurface>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(provider),
            registry,
            dispatcher: Dispatcher::new(prompt, surface.clone()),
            surface,
            active: RefCell::new(None),
        }
    }

    /// Authorizes, fetches the descriptor and binds handles.
    ///
    /// Any previous session is dropped first. On failure the console stays
    /// unauthenticated and the admin controls hidden.
    pub async fn connect(&self) -> Result<Rc<ActiveSession>, AdminError> {
        self.active.replace(None);
        self.surface.set_admin_controls_visible(false);

        match self.establish().await {
            Ok(active) => {
                let active = Rc::new(active);
                self.active.replace(Some(active.clone()));
                self.surface.set_admin_controls_visible(true);
                info!(
                    address = %active.session.authorized_address(),
                    handles = active.handles.len(),
                    "admin session ready"
                );
                Ok(active)
            }
            Err(err) => {
                if err == AdminError::ProviderAbsent {
                    self.surface.notify(PROVIDER_ABSENT_NOTICE);
                } else {
                    self.surface.diagnostic(&err.to_string());
                }
                warn!("connect failed: {err}");
                Err(err)
            }
        }
    }

    async fn establish(&self) -> Result<ActiveSession, AdminError> {
        let session = self.sessions.connect().await?;

        let descriptor = self
            .registry
            .fetch_descriptor()
            .await
            .map_err(|err| AdminError::RegistryUnavailable(format!("{err:#}")))?;

        let provider = self.sessions.provider().ok_or(AdminError::ProviderAbsent)?;
        let handles = bind(&descriptor, &session, provider)?;

        Ok(ActiveSession { session, handles })
    }

    pub fn is_connected(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn authorized_address(&self) -> Option<WalletAddress> {
        self.active
            .borrow()
            .as_ref()
            .map(|active| active.session.authorized_address().clone())
    }

    pub fn active(&self) -> Option<Rc<ActiveSession>> {
        self.active.borrow().clone()
    }

    /// Runs one independent instance of the action state machine.
    ///
    /// Before a successful connect this is a no-op that records a diagnostic
    /// and returns `NotConnected` without prompting.
    pub async fn run(&self, action: AdminAction) -> ActionOutcome {
        let Some(active) = self.active() else {
            self.surface.diagnostic(&format!(
                "{} ignored: {}",
                action.command_name(),
                AdminError::NotConnected
            ));
            return ActionOutcome::Failed(AdminError::NotConnected);
        };

        self.dispatcher
            .execute(&action.spec(), &active.session, &active.handles)
            .await
    }

    pub async fn add_moderator(&self) -> ActionOutcome {
        self.run(AdminAction::AddModerator).await
    }

    pub async fn blacklist_thread(&self) -> ActionOutcome {
        self.run(AdminAction::BlacklistThread).await
    }

    pub async fn set_max_supply(&self) -> ActionOutcome {
        self.run(AdminAction::SetMaxSupply).await
    }

    pub async fn set_reserve(&self) -> ActionOutcome {
        self.run(AdminAction::SetReserve).await
    }

    pub async fn set_sys_admin(&self) -> ActionOutcome {
        self.run(AdminAction::SetSysAdmin).await
    }

    /// Read-only status of the bound contracts; a failed read is reported in
    /// its own line.
    pub async fn overview(&self) -> Result<Vec<StatusLine>, AdminError> {
        let active = self.active().ok_or(AdminError::NotConnected)?;

        let mut lines = Vec::with_capacity(OVERVIEW.len());
        for (label, role, method) in OVERVIEW {
            let value = match active.handles.handle(role) {
                Some(handle) => handle.call(method, &[]).await.map_err(|err| format!("{err:#}")),
                None => Err(format!("no {role} handle bound")),
            };
            if let Err(reason) = &value {
                self.surface.diagnostic(&format!("{role} {method} failed: {reason}"));
            }
            lines.push(StatusLine {
                label,
                role,
                method,
                value,
            });
        }
        Ok(lines)
    }
}
