//! `alert`/`prompt` and the console as the page's user surface.

use crate::dom;
use ga_admin_core::{AdminSurface, ParameterPrompt};
use web_sys::Element;

pub struct BrowserPrompt;

impl ParameterPrompt for BrowserPrompt {
    fn request(&self, message: &str) -> Option<String> {
        dom::window()?.prompt_with_message(message).ok().flatten()
    }
}

pub struct BrowserSurface {
    sysadmin_actions: Element,
}

impl BrowserSurface {
    pub fn new(sysadmin_actions: Element) -> Self {
        Self { sysadmin_actions }
    }
}

impl AdminSurface for BrowserSurface {
    fn notify(&self, message: &str) {
        if let Some(window) = dom::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn diagnostic(&self, message: &str) {
        gloo_console::error!(message);
    }

    fn set_admin_controls_visible(&self, visible: bool) {
        dom::set_visible(&self.sysadmin_actions, visible);
    }
}
