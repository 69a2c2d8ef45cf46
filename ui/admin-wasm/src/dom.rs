//! DOM element bindings.
//!
//! All fields are resolved once at startup. Buttons for the supplementary
//! actions are optional so older page templates keep working.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

pub const CONNECT_BUTTON: &str = "connectWalletBtn";
pub const SYSADMIN_ACTIONS: &str = "sysadminActions";

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

fn doc() -> Option<Document> {
    window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

fn required(id: &str) -> Result<Element, JsValue> {
    by_id(id).ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

pub fn set_visible(el: &Element, visible: bool) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }
}

#[derive(Clone)]
pub struct Elements {
    pub connect_btn: Element,
    pub sysadmin_actions: Element,
    /// Admin buttons by element id; only those present in the page.
    pub action_buttons: Vec<(&'static str, Element)>,
}

impl Elements {
    pub fn bind() -> Result<Self, JsValue> {
        let action_buttons = crate::events::ACTION_BUTTONS
            .iter()
            .filter_map(|(id, _)| by_id(id).map(|el| (*id, el)))
            .collect();

        Ok(Self {
            connect_btn: required(CONNECT_BUTTON)?,
            sysadmin_actions: required(SYSADMIN_ACTIONS)?,
            action_buttons,
        })
    }
}
