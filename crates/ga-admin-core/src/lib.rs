//! Session and contract-binding lifecycle for the sysadmin client.
//!
//! `connect` authorizes a wallet account, fetches the contract descriptor and
//! binds one handle per role; each admin action then runs through the
//! dispatcher's prompt/submit/report cycle against those handles.

mod binder;
mod console;
mod dispatcher;
mod error;
mod session;
mod surface;

#[cfg(test)]
mod testing;

pub use binder::bind;
pub use console::{ActiveSession, AdminConsole, StatusLine};
pub use dispatcher::{ActionOutcome, ActionRequest, ActionSpec, ActionState, AdminAction, Dispatcher};
pub use error::AdminError;
pub use session::{Session, SessionManager};
pub use surface::{AdminSurface, ParameterPrompt};
