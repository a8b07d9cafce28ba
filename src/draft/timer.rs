//! Cancellable single-slot debounce timer

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds at most one pending value with a deadline. Scheduling again
/// replaces both the value and the deadline, so only the latest value
/// ever comes out, and only after a full quiet period.
pub struct DebounceTimer<T> {
    pending: Option<Pending<T>>,
}

impl<T> Default for DebounceTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DebounceTimer<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// (Re)start the countdown for `value`. Returns the value it superseded.
    pub fn schedule(&mut self, value: T, delay: Duration) -> Option<T> {
        let deadline = Instant::now() + delay;
        self.pending
            .replace(Pending { value, deadline })
            .map(|p| p.value)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the value if its deadline has passed at `now`
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.cancel(),
            _ => None,
        }
    }

    /// Wait for the pending deadline and take the value.
    ///
    /// Never resolves while nothing is pending, which makes it safe to use
    /// as one arm of `tokio::select!`. Dropping the future leaves the
    /// pending value in place.
    pub async fn elapsed(&mut self) -> T {
        loop {
            match self.deadline() {
                Some(deadline) => {
                    sleep_until(deadline).await;
                    if let Some(value) = self.take_due(Instant::now()) {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
