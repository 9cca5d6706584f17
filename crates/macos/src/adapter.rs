use crate::{key_dispatch::key_statement, script};
use client_launcher_core::{
    action::KeyCombo,
    adapter::{poll_until, BackendStatus, PlatformAdapter},
    error::AdapterError,
};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drives the launched client through System Events via `osascript`.
pub struct MacOSAdapter;

impl MacOSAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacOSAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for MacOSAdapter {
    fn backend_name(&self) -> &'static str {
        "osascript"
    }

    fn check_backend(&self) -> BackendStatus {
        match script::run(script::ui_elements_enabled()) {
            Ok(out) if out == "true" => BackendStatus::Available,
            Ok(_) => BackendStatus::Unavailable {
                suggestion: "Open System Settings > Privacy & Security > Accessibility and add the launcher".into(),
            },
            Err(e) => BackendStatus::Unavailable {
                suggestion: e.suggestion.unwrap_or(e.message),
            },
        }
    }

    fn wait_window_active(&self, title: &str, timeout: Duration) -> Result<(), AdapterError> {
        let activate = script::activate_window(title);
        let front = script::front_window_title();
        let found = poll_until(timeout, POLL_INTERVAL, || {
            if script::run(&activate)? != "found" {
                return Ok(false);
            }
            Ok(script::run(&front)?.contains(title))
        })?;
        if found {
            Ok(())
        } else {
            Err(AdapterError::window_not_found(title))
        }
    }

    fn send_text(&self, control: &str, text: &str) -> Result<(), AdapterError> {
        script::run(&script::keystroke(control, text)).map(drop)
    }

    fn set_text(&self, control: &str, text: &str) -> Result<(), AdapterError> {
        script::run(&script::set_value(control, text)).map(drop)
    }

    fn click(&self, control: &str, x: i32, y: i32) -> Result<(), AdapterError> {
        script::run(&script::click_at(control, x, y)).map(drop)
    }

    fn send_keys(&self, combo: &KeyCombo) -> Result<(), AdapterError> {
        let source = format!(
            "tell application \"System Events\" to {}",
            key_statement(combo)
        );
        script::run(&source).map(drop)
    }
}
