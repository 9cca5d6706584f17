//! Best-effort UI automation for clients without a scriptable interface.
//!
//! Steps run strictly in order. Each one either succeeds or exhausts its
//! retry budget, and the sequencer moves on either way. There is no
//! deadline across the whole sequence, only per-step bounds.

use crate::{
    action::{AutomationStep, KeyCombo, StepAction},
    adapter::PlatformAdapter,
    error::{AdapterError, ErrorCode},
    mapping::SubstitutionMapping,
    retry::{retry_with, Attempt, RetryOutcome},
    template::expand,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_WAIT_SECS: u64 = 1;
const MAX_WAIT_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct Timing {
    /// Pause before every step, for redraw latency.
    pub settle: Duration,
    /// Pause after each send/set/click attempt.
    pub action_delay: Duration,
    pub action_retries: u32,
    pub wait_retries: u32,
    /// Pause after a wait attempt, per second of the step's timeout.
    pub wait_tick: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(300),
            action_delay: Duration::from_millis(300),
            action_retries: 10,
            wait_retries: 30,
            wait_tick: Duration::from_millis(100),
        }
    }
}

impl Timing {
    /// Same bounds, no sleeping.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            action_delay: Duration::ZERO,
            wait_tick: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    /// The adapter accepted the input but sent it to the focused control,
    /// not the named one.
    Unaddressed,
    Exhausted,
    Sent,
    /// The adapter cannot perform this action at all.
    Unsupported,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub target: String,
    pub status: StepStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SequenceReport {
    pub steps: Vec<StepReport>,
}

impl SequenceReport {
    pub fn completed(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.status, StepStatus::Succeeded | StepStatus::Sent))
    }
}

pub struct Sequencer<'a> {
    adapter: &'a dyn PlatformAdapter,
    mapping: &'a SubstitutionMapping,
    timing: &'a Timing,
}

impl<'a> Sequencer<'a> {
    pub fn new(
        adapter: &'a dyn PlatformAdapter,
        mapping: &'a SubstitutionMapping,
        timing: &'a Timing,
    ) -> Self {
        Self { adapter, mapping, timing }
    }

    pub fn run(&self, steps: &[AutomationStep]) -> SequenceReport {
        let mut report = SequenceReport::default();
        for (index, step) in steps.iter().enumerate() {
            if !self.timing.settle.is_zero() {
                std::thread::sleep(self.timing.settle);
            }
            let result = self.run_step(index, step);
            match result.status {
                StepStatus::Succeeded | StepStatus::Sent => {}
                StepStatus::Unaddressed => warn!(
                    step = index,
                    action = result.action,
                    target = %result.target,
                    backend = self.adapter.backend_name(),
                    "backend cannot address named controls, input went to the focused control"
                ),
                _ => warn!(
                    step = index,
                    action = result.action,
                    target = %result.target,
                    attempts = result.attempts,
                    status = ?result.status,
                    "automation step did not succeed, continuing"
                ),
            }
            report.steps.push(result);
        }
        report
    }

    fn run_step(&self, index: usize, step: &AutomationStep) -> StepReport {
        let target = expand(&step.target, self.mapping);
        let payload = expand(&step.payload, self.mapping);
        let mut report = StepReport {
            index,
            action: step.action.as_str(),
            target: self.mapping.redact(&target),
            status: StepStatus::Failed,
            attempts: 0,
            error: None,
        };
        let mut last_error: Option<AdapterError> = None;

        let outcome = match step.action {
            StepAction::WaitForWindow => {
                let secs = payload
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .unwrap_or(DEFAULT_WAIT_SECS)
                    .min(MAX_WAIT_SECS);
                let delay = self.timing.wait_tick.saturating_mul(secs as u32);
                retry_with(self.timing.wait_retries, delay, |n| {
                    self.attempt(index, n, &mut last_error, || {
                        self.adapter.wait_window_active(&target, Duration::from_secs(secs))
                    })
                })
            }
            StepAction::SendText => self.retry_action(index, &mut last_error, || {
                self.adapter.send_text(&target, &payload)
            }),
            StepAction::SetText => self.retry_action(index, &mut last_error, || {
                self.adapter.set_text(&target, &payload)
            }),
            StepAction::Click => match parse_point(&payload) {
                Some((x, y)) => self.retry_action(index, &mut last_error, || {
                    self.adapter.click(&target, x, y)
                }),
                None => {
                    report.error = Some(format!("invalid click coordinates '{payload}'"));
                    return report;
                }
            },
            StepAction::SendKeyCombination => {
                let keys = if payload.trim().is_empty() { &target } else { &payload };
                report.attempts = 1;
                match self.send_key_sequence(keys) {
                    Ok(()) => report.status = StepStatus::Sent,
                    Err(e) => report.error = Some(self.mapping.redact(&e)),
                }
                return report;
            }
        };

        report.attempts = outcome.attempts;
        let unsupported = last_error
            .as_ref()
            .is_some_and(|e| e.code == ErrorCode::PlatformNotSupported);
        report.status = if outcome.succeeded {
            let addresses_control = matches!(step.action, StepAction::WaitForWindow)
                || target.is_empty()
                || self.adapter.addresses_controls();
            if addresses_control {
                StepStatus::Succeeded
            } else {
                StepStatus::Unaddressed
            }
        } else if unsupported {
            StepStatus::Unsupported
        } else {
            StepStatus::Exhausted
        };
        if !outcome.succeeded {
            report.error = last_error.map(|e| self.mapping.redact(&e.message));
        }
        report
    }

    /// Sends every key of `keys` once, in order, stopping at the first failure.
    fn send_key_sequence(&self, keys: &str) -> Result<(), String> {
        let combos = KeyCombo::parse_sequence(keys).map_err(|e| e.to_string())?;
        for combo in &combos {
            self.adapter.send_keys(combo).map_err(|e| e.message)?;
        }
        Ok(())
    }

    fn retry_action<F>(&self, index: usize, last_error: &mut Option<AdapterError>, op: F) -> RetryOutcome
    where
        F: Fn() -> Result<(), AdapterError>,
    {
        retry_with(self.timing.action_retries, self.timing.action_delay, |n| {
            self.attempt(index, n, last_error, &op)
        })
    }

    fn attempt<F>(&self, index: usize, n: u32, last_error: &mut Option<AdapterError>, op: F) -> Attempt
    where
        F: Fn() -> Result<(), AdapterError>,
    {
        match op() {
            Ok(()) => Attempt::Succeeded,
            Err(e) => {
                debug!(step = index, attempt = n, code = e.code.as_str(), "automation attempt failed");
                let verdict = if e.code == ErrorCode::PlatformNotSupported {
                    Attempt::GiveUp
                } else {
                    Attempt::Retry
                };
                *last_error = Some(e);
                verdict
            }
        }
    }
}

/// Parses `x,y`.
fn parse_point(s: &str) -> Option<(i32, i32)> {
    let (x, y) = s.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapter::NoopAdapter;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Records every call; fails the first `fail_first` calls of each kind.
    #[derive(Default)]
    pub(crate) struct FakeAdapter {
        pub calls: Mutex<Vec<String>>,
        pub fail_first: u32,
        pub window_never_appears: bool,
        /// Behave like a backend that types into the focused control.
        pub focus_only: bool,
        counts: Mutex<std::collections::HashMap<&'static str, u32>>,
    }

    impl FakeAdapter {
        pub fn failing_first(n: u32) -> Self {
            Self { fail_first: n, ..Self::default() }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, kind: &'static str, call: String) -> Result<(), AdapterError> {
            self.calls.lock().unwrap().push(call);
            let mut counts = self.counts.lock().unwrap();
            let n = counts.entry(kind).or_insert(0);
            *n += 1;
            if *n <= self.fail_first {
                Err(AdapterError::new(ErrorCode::ActionFailed, format!("{kind} not ready")))
            } else {
                Ok(())
            }
        }
    }

    impl PlatformAdapter for FakeAdapter {
        fn addresses_controls(&self) -> bool {
            !self.focus_only
        }

        fn wait_window_active(&self, title: &str, timeout: Duration) -> Result<(), AdapterError> {
            if self.window_never_appears {
                self.calls.lock().unwrap().push(format!("wait:{title}:{}", timeout.as_secs()));
                return Err(AdapterError::window_not_found(title));
            }
            self.record("wait", format!("wait:{title}:{}", timeout.as_secs()))
        }

        fn send_text(&self, control: &str, text: &str) -> Result<(), AdapterError> {
            self.record("send", format!("send:{control}:{text}"))
        }

        fn set_text(&self, control: &str, text: &str) -> Result<(), AdapterError> {
            self.record("set", format!("set:{control}:{text}"))
        }

        fn click(&self, control: &str, x: i32, y: i32) -> Result<(), AdapterError> {
            self.record("click", format!("click:{control}:{x},{y}"))
        }

        fn send_keys(&self, combo: &KeyCombo) -> Result<(), AdapterError> {
            self.record("keys", format!("keys:{}", combo.key))
        }
    }

    fn mapping() -> SubstitutionMapping {
        let mut m = SubstitutionMapping::new();
        m.insert("host", "db1");
        m.insert("username", "scott");
        m.insert_secret("value", "tiger");
        m
    }

    #[test]
    fn steps_run_in_order_with_expanded_payloads() {
        let adapter = FakeAdapter::default();
        let m = mapping();
        let timing = Timing::immediate();
        let steps = vec![
            AutomationStep::new(StepAction::WaitForWindow, "Login - {host}", "5"),
            AutomationStep::new(StepAction::SetText, "Edit1", "{username}"),
            AutomationStep::new(StepAction::SendText, "Edit2", "{value}"),
            AutomationStep::new(StepAction::Click, "Button1", "10, 20"),
            AutomationStep::new(StepAction::SendKeyCombination, "{ENTER}", ""),
        ];
        let report = Sequencer::new(&adapter, &m, &timing).run(&steps);

        assert_eq!(
            adapter.calls(),
            vec![
                "wait:Login - db1:5",
                "set:Edit1:scott",
                "send:Edit2:tiger",
                "click:Button1:10,20",
                "keys:enter",
            ]
        );
        assert!(report.completed());
        assert_eq!(report.steps[4].status, StepStatus::Sent);
    }

    #[test]
    fn action_steps_retry_until_success() {
        let adapter = FakeAdapter::failing_first(3);
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::SetText, "Edit1", "x")]);
        assert_eq!(report.steps[0].status, StepStatus::Succeeded);
        assert_eq!(report.steps[0].attempts, 4);
        assert!(report.steps[0].error.is_none());
    }

    #[test]
    fn exhausted_step_does_not_stop_later_steps() {
        let adapter = FakeAdapter::failing_first(100);
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing).run(&[
            AutomationStep::new(StepAction::SendText, "Edit1", "a"),
            AutomationStep::new(StepAction::Click, "Button1", "1,1"),
        ]);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].status, StepStatus::Exhausted);
        assert_eq!(report.steps[0].attempts, 11);
        assert_eq!(report.steps[1].attempts, 11);
        assert!(report.steps[0].error.as_deref().unwrap().contains("not ready"));
        assert!(!report.completed());
    }

    #[test]
    fn missing_window_gives_up_after_bounded_attempts() {
        let adapter = FakeAdapter { window_never_appears: true, ..FakeAdapter::default() };
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::WaitForWindow, "Never", "2")]);
        assert_eq!(report.steps[0].status, StepStatus::Exhausted);
        assert_eq!(report.steps[0].attempts, timing.wait_retries + 1);
        assert_eq!(adapter.calls().len(), 31);
    }

    #[test]
    fn key_combination_is_sent_once_even_on_failure() {
        let adapter = FakeAdapter::failing_first(1);
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::SendKeyCombination, "", "ctrl+enter")]);
        assert_eq!(adapter.calls(), vec!["keys:enter"]);
        assert_eq!(report.steps[0].status, StepStatus::Failed);
        assert_eq!(report.steps[0].attempts, 1);
    }

    #[test]
    fn bad_click_coordinates_fail_without_touching_the_adapter() {
        let adapter = FakeAdapter::default();
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::Click, "Button1", "left")]);
        assert!(adapter.calls().is_empty());
        assert_eq!(report.steps[0].status, StepStatus::Failed);
    }

    #[test]
    fn report_never_contains_the_secret() {
        let adapter = FakeAdapter::failing_first(100);
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::SendText, "pw-{value}", "{value}")]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("tiger"));
        assert_eq!(report.steps[0].target, "pw-***");
    }

    #[test]
    fn huge_wait_timeout_is_clamped() {
        let adapter = FakeAdapter::default();
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::WaitForWindow, "Login", "18446744073709551615")]);
        assert_eq!(adapter.calls(), vec!["wait:Login:3600"]);
        assert_eq!(report.steps[0].status, StepStatus::Succeeded);
    }

    #[test]
    fn settle_pause_precedes_every_step() {
        let adapter = FakeAdapter::default();
        let m = mapping();
        let timing = Timing { settle: Duration::from_millis(5), ..Timing::immediate() };
        let start = Instant::now();
        Sequencer::new(&adapter, &m, &timing).run(&[
            AutomationStep::new(StepAction::SetText, "Edit1", "a"),
            AutomationStep::new(StepAction::SetText, "Edit2", "b"),
            AutomationStep::new(StepAction::SetText, "Edit3", "c"),
        ]);
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn wait_delay_scales_with_the_step_timeout() {
        let adapter = FakeAdapter { window_never_appears: true, ..FakeAdapter::default() };
        let m = mapping();
        let timing = Timing { wait_retries: 2, wait_tick: Duration::from_millis(2), ..Timing::immediate() };
        let start = Instant::now();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::WaitForWindow, "Never", "3")]);
        assert_eq!(report.steps[0].attempts, 3);
        // three attempts, each followed by 3 s x 2 ms
        assert!(start.elapsed() >= Duration::from_millis(18));
        assert_eq!(adapter.calls(), vec!["wait:Never:3"; 3]);
    }

    #[test]
    fn unsupported_actions_are_not_retried() {
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&NoopAdapter, &m, &timing).run(&[
            AutomationStep::new(StepAction::SetText, "Edit1", "x"),
            AutomationStep::new(StepAction::WaitForWindow, "Login", "1"),
        ]);
        assert_eq!(report.steps[0].attempts, 1);
        assert_eq!(report.steps[0].status, StepStatus::Unsupported);
        assert_eq!(report.steps[1].attempts, 1);
        assert!(report.steps[0].error.as_deref().unwrap().contains("not supported"));
        assert!(!report.completed());
    }

    #[test]
    fn named_control_on_focus_only_backend_is_reported() {
        let adapter = FakeAdapter { focus_only: true, ..FakeAdapter::default() };
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing).run(&[
            AutomationStep::new(StepAction::SetText, "Edit1", "x"),
            AutomationStep::new(StepAction::SendText, "", "y"),
        ]);
        assert_eq!(report.steps[0].status, StepStatus::Unaddressed);
        assert_eq!(report.steps[1].status, StepStatus::Succeeded);
        assert!(!report.completed());
    }

    #[test]
    fn key_sequences_send_each_key_in_order() {
        let adapter = FakeAdapter::default();
        let m = mapping();
        let timing = Timing::immediate();
        let report = Sequencer::new(&adapter, &m, &timing)
            .run(&[AutomationStep::new(StepAction::SendKeyCombination, "", "{TAB}{TAB}{ENTER}")]);
        assert_eq!(adapter.calls(), vec!["keys:tab", "keys:tab", "keys:enter"]);
        assert_eq!(report.steps[0].status, StepStatus::Sent);
    }

    #[test]
    fn parse_point_accepts_spaces_and_rejects_garbage() {
        assert_eq!(parse_point(" 3 , -4 "), Some((3, -4)));
        assert_eq!(parse_point("3"), None);
        assert_eq!(parse_point("a,b"), None);
    }
}
