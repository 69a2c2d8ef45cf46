//! Event binding.
//!
//! Each click spawns its own task, so two admin actions may be in flight at
//! once; the console does not serialise them.

use crate::dom::Elements;
use ga_admin_core::{AdminAction, AdminConsole};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Page button id → admin action.
pub const ACTION_BUTTONS: [(&str, AdminAction); 5] = [
    ("addModeratorBtn", AdminAction::AddModerator),
    ("blacklistThreadBtn", AdminAction::BlacklistThread),
    ("setMaxSupplyBtn", AdminAction::SetMaxSupply),
    ("setReserveBtn", AdminAction::SetReserve),
    ("setSysAdminBtn", AdminAction::SetSysAdmin),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Connect,
    Action(AdminAction),
}

fn action_for(id: &str) -> Option<AdminAction> {
    ACTION_BUTTONS
        .iter()
        .find(|(button, _)| *button == id)
        .map(|(_, action)| *action)
}

/// Attach an async click handler running `hook` on the console.
fn on_click(el: &web_sys::Element, console: &Rc<AdminConsole>, hook: Hook) -> Result<(), JsValue> {
    let console = console.clone();
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        let console = console.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match hook {
                Hook::Connect => {
                    let _ = console.connect().await;
                }
                Hook::Action(action) => {
                    console.run(action).await;
                }
            }
        });
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements, console: &Rc<AdminConsole>) -> Result<(), JsValue> {
    on_click(&els.connect_btn, console, Hook::Connect)?;

    for (id, button) in &els.action_buttons {
        if let Some(action) = action_for(id) {
            on_click(button, console, Hook::Action(action))?;
        }
    }
    Ok(())
}
