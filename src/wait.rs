// SPDX-License-Identifier: MIT
//
// Timed retry of a non-blocking operation.
//
// `wait_for` calls a poll function, returns its first non-empty result, and
// sleeps a fixed interval between empty results until an optional deadline
// passes. The first poll happens immediately. The last sleep is shortened so
// the deadline is never overshot by more than one poll.

use std::convert::Infallible;
use std::thread;
use std::time::{Duration, Instant};

/// Cadence and deadline for [`wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Pause between two empty polls.
    pub interval: Duration,
    /// Give up once this much time has passed. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl WaitOptions {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    /// Poll every 50 ms, forever.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            timeout: None,
        }
    }

    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the deadline.
    #[must_use]
    pub const fn forever(mut self) -> Self {
        self.timeout = None;
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Call `poll` until it yields a value or the timeout passes.
///
/// ```
/// use std::time::Duration;
/// use cellscreen::wait::{wait_for, WaitOptions};
///
/// let mut calls = 0;
/// let found = wait_for(WaitOptions::new().interval(Duration::from_millis(1)), || {
///     calls += 1;
///     (calls == 3).then_some(calls)
/// });
/// assert_eq!(found, Some(3));
/// ```
pub fn wait_for<T>(options: WaitOptions, mut poll: impl FnMut() -> Option<T>) -> Option<T> {
    match try_wait_for(options, || Ok::<_, Infallible>(poll())) {
        Ok(found) => found,
        Err(never) => match never {},
    }
}

/// [`wait_for`] for fallible polls. The first error ends the wait.
///
/// # Errors
///
/// Returns whatever error `poll` returns.
pub fn try_wait_for<T, E>(
    options: WaitOptions,
    mut poll: impl FnMut() -> Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    let started = Instant::now();
    loop {
        if let Some(found) = poll()? {
            return Ok(Some(found));
        }
        let pause = match options.timeout {
            None => options.interval,
            Some(timeout) => {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Ok(None);
                }
                options.interval.min(timeout - elapsed)
            }
        };
        thread::sleep(pause);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = WaitOptions::default();
        assert_eq!(options.interval, Duration::from_millis(50));
        assert_eq!(options.timeout, None);
        assert_eq!(
            options.timeout(Duration::from_secs(1)).forever(),
            WaitOptions::new()
        );
    }

    #[test]
    fn returns_immediately_when_first_poll_succeeds() {
        let options = WaitOptions::new().interval(Duration::from_secs(10));
        let started = Instant::now();
        let mut calls = 0;
        let found = wait_for(options, || {
            calls += 1;
            Some('k')
        });
        assert_eq!(found, Some('k'));
        assert_eq!(calls, 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn times_out_with_nothing() {
        let options = WaitOptions::new()
            .interval(Duration::from_millis(50))
            .timeout(Duration::from_millis(200));
        let started = Instant::now();
        let found: Option<()> = wait_for(options, || None);
        let elapsed = started.elapsed();
        assert_eq!(found, None);
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");
    }

    #[test]
    fn zero_timeout_polls_once() {
        let mut calls = 0;
        let found: Option<()> = wait_for(WaitOptions::new().timeout(Duration::ZERO), || {
            calls += 1;
            None
        });
        assert_eq!(found, None);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_success() {
        let options = WaitOptions::new()
            .interval(Duration::from_millis(1))
            .timeout(Duration::from_secs(10));
        let mut calls = 0;
        let found = wait_for(options, || {
            calls += 1;
            (calls >= 4).then_some(calls)
        });
        assert_eq!(found, Some(4));
    }

    #[test]
    fn errors_stop_the_wait() {
        let mut calls = 0;
        let result: Result<Option<()>, &str> =
            try_wait_for(WaitOptions::new().interval(Duration::from_millis(1)), || {
                calls += 1;
                if calls == 2 { Err("gone") } else { Ok(None) }
            });
        assert_eq!(result, Err("gone"));
        assert_eq!(calls, 2);
    }
}
