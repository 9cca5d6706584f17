use crate::sendkeys;
use client_launcher_core::{
    action::KeyCombo,
    adapter::{poll_until, BackendStatus, PlatformAdapter},
    error::AdapterError,
};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Activates windows and sends keystrokes through `WScript.Shell`.
/// Controls inside a window cannot be addressed.
pub struct WindowsAdapter;

impl WindowsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for WindowsAdapter {
    fn backend_name(&self) -> &'static str {
        "wscript"
    }

    fn addresses_controls(&self) -> bool {
        false
    }

    fn check_backend(&self) -> BackendStatus {
        match sendkeys::run(sendkeys::CHECK_SCRIPT, None) {
            Ok(_) => BackendStatus::Available,
            Err(e) => BackendStatus::Unavailable {
                suggestion: e.suggestion.unwrap_or(e.message),
            },
        }
    }

    fn wait_window_active(&self, title: &str, timeout: Duration) -> Result<(), AdapterError> {
        let found = poll_until(timeout, POLL_INTERVAL, || {
            Ok(sendkeys::run(sendkeys::APP_ACTIVATE_SCRIPT, Some(title))? == "found")
        })?;
        if found {
            Ok(())
        } else {
            Err(AdapterError::window_not_found(title))
        }
    }

    fn send_text(&self, _control: &str, text: &str) -> Result<(), AdapterError> {
        let keys = sendkeys::escape_literal(text);
        sendkeys::run(sendkeys::SEND_KEYS_SCRIPT, Some(&keys)).map(drop)
    }

    fn send_keys(&self, combo: &KeyCombo) -> Result<(), AdapterError> {
        sendkeys::run(sendkeys::SEND_KEYS_SCRIPT, Some(&sendkeys::combo_keys(combo))).map(drop)
    }
}
