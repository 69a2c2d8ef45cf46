use ga_api_types::{ContractRole, WalletAddress};
use ga_chain_client::{HandleSet, SubmittedTx};
use std::rc::Rc;
use tracing::{debug, info};

use crate::{AdminError, AdminSurface, ParameterPrompt, Session};

/// Administrative actions, each a single-parameter transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    AddModerator,
    BlacklistThread,
    SetMaxSupply,
    SetReserve,
    SetSysAdmin,
}

impl AdminAction {
    pub const ALL: [AdminAction; 5] = [
        AdminAction::AddModerator,
        AdminAction::BlacklistThread,
        AdminAction::SetMaxSupply,
        AdminAction::SetReserve,
        AdminAction::SetSysAdmin,
    ];

    pub fn spec(self) -> ActionSpec {
        match self {
            AdminAction::AddModerator => ActionSpec {
                role: ContractRole::SysAdmin,
                method: "addModerator",
                prompt: "Enter the address of the moderator:",
                success_message: "Moderator added successfully.",
                failure_message: "Adding the moderator failed.",
            },
            AdminAction::BlacklistThread => ActionSpec {
                role: ContractRole::SysAdmin,
                method: "blacklistThread",
                prompt: "Enter the Thread ID to blacklist:",
                success_message: "Thread blacklisted successfully.",
                failure_message: "Blacklisting the thread failed.",
            },
            AdminAction::SetMaxSupply => ActionSpec {
                role: ContractRole::DaoGovernance,
                method: "setMaxSupply",
                prompt: "Enter the new max supply:",
                success_message: "Max supply set successfully.",
                failure_message: "Setting the max supply failed.",
            },
            AdminAction::SetReserve => ActionSpec {
                role: ContractRole::DaoGovernance,
                method: "setReserve",
                prompt: "Enter the new reserve:",
                success_message: "Reserve set successfully.",
                failure_message: "Setting the reserve failed.",
            },
            AdminAction::SetSysAdmin => ActionSpec {
                role: ContractRole::SysAdmin,
                method: "setSysAdmin",
                prompt: "Enter the address of the new sysadmin:",
                success_message: "SysAdmin set successfully.",
                failure_message: "Setting the sysadmin failed.",
            },
        }
    }

    /// Hook name used by the front ends (`add-moderator`, ...).
    pub fn command_name(self) -> &'static str {
        match self {
            AdminAction::AddModerator => "add-moderator",
            AdminAction::BlacklistThread => "blacklist-thread",
            AdminAction::SetMaxSupply => "set-max-supply",
            AdminAction::SetReserve => "set-reserve",
            AdminAction::SetSysAdmin => "set-sysadmin",
        }
    }

    pub fn from_command_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.command_name() == name)
    }
}

/// Everything the dispatcher needs to run one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub role: ContractRole,
    pub method: &'static str,
    pub prompt: &'static str,
    pub success_message: &'static str,
    pub failure_message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    ParameterCollected,
    Submitted,
    Confirmed,
    Failed,
}

/// One user trigger, built after the parameter is collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub role: ContractRole,
    pub method: &'static str,
    pub parameter: String,
    pub invoking_address: WalletAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Prompt cancelled or left empty; nothing was sent.
    Cancelled,
    Confirmed(SubmittedTx),
    Failed(AdminError),
}

impl ActionOutcome {
    /// Terminal state of the run that produced this outcome.
    pub fn state(&self) -> ActionState {
        match self {
            ActionOutcome::Cancelled => ActionState::Idle,
            ActionOutcome::Confirmed(_) => ActionState::Confirmed,
            ActionOutcome::Failed(_) => ActionState::Failed,
        }
    }
}

pub struct Dispatcher {
    prompt: Rc<dyn ParameterPrompt>,
    surface: Rc<dyn AdminSurface>,
}

impl Dispatcher {
    pub fn new(prompt: Rc<dyn ParameterPrompt>, surface: Rc<dyn AdminSurface>) -> Self {
        Self { prompt, surface }
    }

    /// Idle → ParameterCollected → Submitted → Confirmed | Failed.
    ///
    /// Fault detail only reaches the diagnostic channel; the user gets the
    /// action's generic failure message.
    pub async fn execute(
        &self,
        spec: &ActionSpec,
        session: &Session,
        handles: &HandleSet,
    ) -> ActionOutcome {
        let parameter = self
            .prompt
            .request(spec.prompt)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let Some(parameter) = parameter else {
            debug!(method = spec.method, "action cancelled at prompt");
            return ActionOutcome::Cancelled;
        };

        let request = ActionRequest {
            role: spec.role,
            method: spec.method,
            parameter,
            invoking_address: session.authorized_address().clone(),
        };
        debug!(?request, state = ?ActionState::ParameterCollected, "action request");

        let result = match handles.handle(request.role) {
            Some(handle) => {
                debug!(method = request.method, state = ?ActionState::Submitted, "submitting");
                handle
                    .send(request.method, std::slice::from_ref(&request.parameter))
                    .await
            }
            None => Err(anyhow::anyhow!("no {} handle bound", request.role)),
        };

        match result {
            Ok(tx) => {
                info!(
                    method = request.method,
                    tx_hash = %tx.tx_hash,
                    from = %request.invoking_address,
                    "action confirmed"
                );
                self.surface.notify(spec.success_message);
                ActionOutcome::Confirmed(tx)
            }
            Err(err) => {
                let reason = format!("{err:#}");
                self.surface
                    .diagnostic(&format!("{} {} failed: {reason}", request.role, request.method));
                self.surface.notify(spec.failure_message);
                ActionOutcome::Failed(AdminError::ActionFailed {
                    action: request.method.to_owned(),
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        ADMIN, FakeWallet, RecordingSurface, ScriptedPrompt, contract_address, descriptor, selector,
    };
    use crate::{SessionManager, bind};

    struct Fixture {
        wallet: Rc<FakeWallet>,
        surface: Rc<RecordingSurface>,
        session: Session,
        handles: HandleSet,
    }

    async fn fixture() -> Fixture {
        let wallet = Rc::new(FakeWallet::with_accounts(&[ADMIN]));
        let session = SessionManager::new(Some(wallet.clone()))
            .connect()
            .await
            .unwrap();
        let handles = bind(&descriptor(), &session, wallet.clone()).unwrap();
        Fixture {
            wallet,
            surface: Rc::new(RecordingSurface::default()),
            session,
            handles,
        }
    }

    impl Fixture {
        async fn run(&self, action: AdminAction, answer: Option<&str>) -> ActionOutcome {
            let prompt = Rc::new(ScriptedPrompt::answering(&[answer]));
            let dispatcher = Dispatcher::new(prompt.clone(), self.surface.clone());
            let outcome = dispatcher
                .execute(&action.spec(), &self.session, &self.handles)
                .await;
            assert_eq!(prompt.asked.borrow().as_slice(), &[action.spec().prompt.to_owned()]);
            outcome
        }
    }

    #[tokio::test]
    async fn cancelled_or_empty_prompt_sends_nothing() {
        let fx = fixture().await;

        for action in [
            AdminAction::AddModerator,
            AdminAction::BlacklistThread,
            AdminAction::SetMaxSupply,
        ] {
            for answer in [None, Some(""), Some("   ")] {
                let outcome = fx.run(action, answer).await;
                assert_eq!(outcome, ActionOutcome::Cancelled);
                assert_eq!(outcome.state(), ActionState::Idle);
            }
        }

        assert_eq!(fx.wallet.sent_count(), 0);
        assert!(fx.surface.notices.borrow().is_empty());
        assert!(fx.surface.diagnostics.borrow().is_empty());
    }

    #[tokio::test]
    async fn each_action_sends_one_transaction_to_its_role() {
        let cases = [
            (AdminAction::AddModerator, "0x70Af4FD96E41a3C8adbd5011deb2C27C00eC5380"),
            (AdminAction::BlacklistThread, "17"),
            (AdminAction::SetMaxSupply, "1000000"),
        ];

        for (action, parameter) in cases {
            let fx = fixture().await;
            let outcome = fx.run(action, Some(parameter)).await;
            assert_eq!(outcome.state(), ActionState::Confirmed);

            let spec = action.spec();
            let sent = fx.wallet.sent.borrow();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].from, ADMIN);
            assert_eq!(sent[0].to, contract_address(spec.role));
            assert!(sent[0].data.starts_with(&selector(spec.role, spec.method, 1)));
            assert_eq!(
                fx.surface.notices.borrow().as_slice(),
                &[spec.success_message.to_owned()]
            );
        }
    }

    #[tokio::test]
    async fn wallet_rejection_reports_generic_failure() {
        let fx = fixture().await;
        fx.wallet
            .queue_send(Some("MetaMask Tx Signature: User denied transaction signature."));

        let outcome = fx.run(AdminAction::SetMaxSupply, Some("500")).await;

        assert_eq!(outcome.state(), ActionState::Failed);
        assert!(matches!(
            outcome,
            ActionOutcome::Failed(AdminError::ActionFailed { ref action, .. }) if action == "setMaxSupply"
        ));
        assert_eq!(fx.wallet.sent_count(), 1);

        let notices = fx.surface.notices.borrow();
        assert_eq!(notices.as_slice(), &["Setting the max supply failed.".to_owned()]);
        assert!(!notices[0].contains("User denied"));

        let diagnostics = fx.surface.diagnostics.borrow();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("User denied"));
    }

    #[tokio::test]
    async fn revert_after_pending_receipt_reports_generic_failure() {
        let fx = fixture().await;
        fx.wallet
            .queue_receipts(&[serde_json::Value::Null, serde_json::json!({"status": "0x0"})]);

        let outcome = fx.run(AdminAction::SetMaxSupply, Some("500")).await;

        assert_eq!(outcome.state(), ActionState::Failed);
        assert_eq!(fx.wallet.sent_count(), 1);
        assert_eq!(fx.wallet.receipt_lookups.get(), 2);
        assert_eq!(
            fx.surface.notices.borrow().as_slice(),
            &["Setting the max supply failed.".to_owned()]
        );
        let diagnostics = fx.surface.diagnostics.borrow();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("reverted"));
    }

    #[tokio::test]
    async fn confirmation_waits_for_the_receipt() {
        let fx = fixture().await;
        fx.wallet
            .queue_receipts(&[serde_json::Value::Null, serde_json::Value::Null]);

        let outcome = fx.run(AdminAction::BlacklistThread, Some("9")).await;

        assert_eq!(outcome.state(), ActionState::Confirmed);
        assert_eq!(fx.wallet.receipt_lookups.get(), 3);
        assert_eq!(
            fx.surface.notices.borrow().as_slice(),
            &["Thread blacklisted successfully.".to_owned()]
        );
    }

    #[tokio::test]
    async fn unencodable_parameter_fails_without_sending() {
        let fx = fixture().await;

        let outcome = fx.run(AdminAction::BlacklistThread, Some("not-a-number")).await;

        assert_eq!(outcome.state(), ActionState::Failed);
        assert_eq!(fx.wallet.sent_count(), 0);
        assert_eq!(fx.surface.diagnostics.borrow().len(), 1);
    }

    #[test]
    fn command_names_round_trip() {
        for action in AdminAction::ALL {
            assert_eq!(AdminAction::from_command_name(action.command_name()), Some(action));
        }
        assert_eq!(AdminAction::from_command_name("connect"), None);
    }
}
