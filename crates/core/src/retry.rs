use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryOutcome {
    pub succeeded: bool,
    pub attempts: u32,
}

/// What a single try reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Succeeded,
    Retry,
    /// Further tries cannot change the result.
    GiveUp,
}

/// Calls `attempt` until it succeeds or `bound` retries are spent, so at
/// most `bound + 1` calls. `delay` is slept after every call, the
/// successful one included, to give the target time to react.
pub fn bounded_retry<F>(bound: u32, delay: Duration, mut attempt: F) -> RetryOutcome
where
    F: FnMut(u32) -> bool,
{
    retry_with(bound, delay, |n| if attempt(n) { Attempt::Succeeded } else { Attempt::Retry })
}

/// [`bounded_retry`] for callers that can tell a permanent failure apart.
/// A [`Attempt::GiveUp`] ends the loop at once, without the delay.
pub fn retry_with<F>(bound: u32, delay: Duration, mut attempt: F) -> RetryOutcome
where
    F: FnMut(u32) -> Attempt,
{
    let mut attempts = 0;
    loop {
        let result = attempt(attempts);
        attempts += 1;
        if result == Attempt::GiveUp {
            return RetryOutcome { succeeded: false, attempts };
        }
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if result == Attempt::Succeeded {
            return RetryOutcome { succeeded: true, attempts };
        }
        if attempts > bound {
            return RetryOutcome { succeeded: false, attempts };
        }
    }
}
