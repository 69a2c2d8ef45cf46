/// Source of the single free-text parameter an admin action needs.
///
/// `None` means the user cancelled.
pub trait ParameterPrompt {
    fn request(&self, message: &str) -> Option<String>;
}

/// User-facing side of the console.
pub trait AdminSurface {
    /// Blocking notice shown to the user.
    fn notify(&self, message: &str);

    /// Diagnostic channel for fault detail; never shown as a notice.
    fn diagnostic(&self, message: &str);

    fn set_admin_controls_visible(&self, visible: bool);
}
