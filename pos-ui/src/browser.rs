//! Native browser dialogs

/// `window.confirm`; false when there is no window
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `window.prompt`; `None` when cancelled
pub fn prompt(message: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.prompt_with_message(message).ok())
        .flatten()
}

pub fn log_error(context: &str, error: &impl std::fmt::Display) {
    web_sys::console::error_1(&format!("{}: {}", context, error).into());
}
