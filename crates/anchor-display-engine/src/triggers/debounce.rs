use std::time::{Duration, Instant};

/// Quiet period the debounced rewriter waits for after the last keystroke.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);

/// A trailing-edge debounce deadline.
///
/// There is no timer thread: the owner reschedules on every event and asks
/// [`Debouncer::fire`] whether the deadline has passed, typically from an
/// event loop that polls with [`Debouncer::time_until`] as its timeout.
/// Callers pass `now` explicitly so behaviour is deterministic under test.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and starts a new one from `now`.
    pub fn schedule(&mut self, now: Instant) {
        let deadline = now + self.delay;
        log::trace!("debounce rescheduled, fires in {:?}", self.delay);
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending deadline, zero once it has passed.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once per scheduled deadline, on the first call at
    /// or after it.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}
