//! Gremlin sysadmin page, browser side.
//!
//! Wires the page's connect and admin buttons to an `AdminConsole` backed by
//! the injected `window.ethereum` wallet and the same-origin
//! `/contract_data` endpoint.

pub mod dom;
pub mod events;
pub mod provider;
pub mod registry;
pub mod surface;

use ga_admin_core::{AdminConsole, AdminSurface};
use ga_chain_client::WalletProvider;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init()
}

fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let provider = provider::InjectedProvider::detect()
        .map(|provider| Rc::new(provider) as Rc<dyn WalletProvider>);

    // Admin controls stay hidden until a connect succeeds.
    let surface = Rc::new(surface::BrowserSurface::new(els.sysadmin_actions.clone()));
    surface.set_admin_controls_visible(false);

    let console = Rc::new(AdminConsole::new(
        provider,
        Rc::new(registry::SameOriginRegistry::default()),
        Rc::new(surface::BrowserPrompt),
        surface,
    ));

    events::bind_events(&els, &console)
}
