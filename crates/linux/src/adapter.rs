use crate::xdotool;
use client_launcher_core::{
    action::{KeyCombo, Modifier},
    adapter::{poll_until, BackendStatus, PlatformAdapter},
    error::AdapterError,
};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// X11 automation through `xdotool`. Controls have no addressable
/// identity here, so control-level actions go to the focused widget.
pub struct LinuxAdapter;

impl LinuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for LinuxAdapter {
    fn backend_name(&self) -> &'static str {
        "xdotool"
    }

    fn addresses_controls(&self) -> bool {
        false
    }

    fn check_backend(&self) -> BackendStatus {
        if std::env::var_os("DISPLAY").is_none() {
            return BackendStatus::Unavailable {
                suggestion: "No X display; set DISPLAY or run under XWayland".into(),
            };
        }
        match xdotool::run(&["version".to_string()]) {
            Ok(Some(_)) => BackendStatus::Available,
            Ok(None) => BackendStatus::Unavailable { suggestion: "xdotool did not run cleanly".into() },
            Err(e) => BackendStatus::Unavailable {
                suggestion: e.suggestion.unwrap_or(e.message),
            },
        }
    }

    fn wait_window_active(&self, title: &str, timeout: Duration) -> Result<(), AdapterError> {
        let search = xdotool::search_args(title);
        let found = poll_until(timeout, POLL_INTERVAL, || {
            let Some(ids) = xdotool::run(&search)? else {
                return Ok(false);
            };
            let Some(id) = ids.lines().next() else {
                return Ok(false);
            };
            if xdotool::run(&xdotool::activate_args(id))?.is_none() {
                return Ok(false);
            }
            Ok(xdotool::run(&xdotool::active_name_args())?
                .is_some_and(|name| name.contains(title)))
        })?;
        if found {
            Ok(())
        } else {
            Err(AdapterError::window_not_found(title))
        }
    }

    fn send_text(&self, _control: &str, text: &str) -> Result<(), AdapterError> {
        xdotool::type_text(text).map(drop)
    }

    fn set_text(&self, _control: &str, text: &str) -> Result<(), AdapterError> {
        let select_all = KeyCombo { key: "a".into(), modifiers: vec![Modifier::Ctrl] };
        xdotool::run_checked(&xdotool::key_args(&select_all))?;
        xdotool::type_text(text).map(drop)
    }

    fn click(&self, _control: &str, x: i32, y: i32) -> Result<(), AdapterError> {
        xdotool::run_checked(&xdotool::click_args(x, y)).map(drop)
    }

    fn send_keys(&self, combo: &KeyCombo) -> Result<(), AdapterError> {
        xdotool::run_checked(&xdotool::key_args(combo)).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_controls_are_not_addressable() {
        assert!(!LinuxAdapter::new().addresses_controls());
        assert_eq!(LinuxAdapter::new().backend_name(), "xdotool");
    }
}
