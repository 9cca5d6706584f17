use crate::{action::KeyCombo, error::AdapterError};
use std::time::{Duration, Instant};

pub enum BackendStatus {
    Available,
    Unavailable { suggestion: String },
}

/// Window automation capability of the host platform.
///
/// Control-level methods act on the active window. An empty `control`
/// means whichever control currently has keyboard focus. Every method
/// reports one attempt; retrying is the caller's business.
pub trait PlatformAdapter: Send + Sync {
    fn backend_name(&self) -> &'static str {
        "none"
    }

    fn check_backend(&self) -> BackendStatus {
        BackendStatus::Unavailable {
            suggestion: "No window automation backend for this platform".into(),
        }
    }

    /// False when a named `control` is ignored and input goes to the
    /// focused control instead.
    fn addresses_controls(&self) -> bool {
        true
    }

    /// Waits up to `timeout` for a window whose title contains `title` to be active.
    fn wait_window_active(&self, _title: &str, _timeout: Duration) -> Result<(), AdapterError> {
        Err(AdapterError::not_supported("wait_window_active"))
    }

    fn send_text(&self, _control: &str, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::not_supported("send_text"))
    }

    fn set_text(&self, _control: &str, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::not_supported("set_text"))
    }

    /// Left click at `x`,`y` relative to the control (or window) origin.
    fn click(&self, _control: &str, _x: i32, _y: i32) -> Result<(), AdapterError> {
        Err(AdapterError::not_supported("click"))
    }

    fn send_keys(&self, _combo: &KeyCombo) -> Result<(), AdapterError> {
        Err(AdapterError::not_supported("send_keys"))
    }
}

/// Adapter for platforms without an automation backend.
pub struct NoopAdapter;

impl PlatformAdapter for NoopAdapter {}

/// Polls `check` every `interval` until it returns true or `timeout`
/// elapses. The check always runs at least once. A timeout too large to
/// represent as an `Instant` never expires.
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut check: F) -> Result<bool, AdapterError>
where
    F: FnMut() -> Result<bool, AdapterError>,
{
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if check()? {
            return Ok(true);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(false);
        }
        std::thread::sleep(interval);
    }
}
