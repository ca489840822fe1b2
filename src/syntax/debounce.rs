//! Debounced recompute scheduling
//!
//! Edits schedule a recompute after a quiescence window. Scheduling again
//! before the window elapses replaces the pending task, so a burst of edits
//! is recomputed once against the latest snapshot.
//!
//! The scheduler does not own a timer. The host passes the current time to
//! [`RecomputeScheduler::schedule`] and polls [`RecomputeScheduler::take_due`]
//! from its event loop, the same way it would drive any other frame-based
//! debounce.

use std::time::{Duration, Instant};

/// Default quiescence window before a scheduled recompute runs.
pub const DEFAULT_RECOMPUTE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Instant,
    payload: T,
}

/// Holds at most one pending task carrying a payload snapshot.
#[derive(Debug, Clone)]
pub struct RecomputeScheduler<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Default for RecomputeScheduler<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMPUTE_DELAY)
    }
}

impl<T> RecomputeScheduler<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the window. Applies to tasks scheduled afterwards.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule `payload` to become due one window after `now`, cancelling
    /// any task not yet taken.
    pub fn schedule(&mut self, payload: T, now: Instant) {
        self.pending = Some(Pending {
            due: now + self.delay,
            payload,
        });
    }

    /// Take the pending payload if its window has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.due => self.pending.take().map(|p| p.payload),
            _ => None,
        }
    }

    /// Drop the pending task. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending task becomes due, for hosts that sleep until then.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_not_due_before_window() {
        let start = Instant::now();
        let mut scheduler = RecomputeScheduler::default();
        scheduler.schedule("a", start);

        assert!(scheduler.is_pending());
        assert_eq!(scheduler.take_due(start + ms(199)), None);
        assert_eq!(scheduler.take_due(start + ms(200)), Some("a"));
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.take_due(start + ms(500)), None);
    }

    #[test]
    fn test_reschedule_coalesces() {
        let start = Instant::now();
        let mut scheduler = RecomputeScheduler::new(ms(200));
        scheduler.schedule("first", start);
        scheduler.schedule("second", start + ms(150));

        // The first window has elapsed but it was replaced
        assert_eq!(scheduler.take_due(start + ms(250)), None);
        assert_eq!(scheduler.deadline(), Some(start + ms(350)));
        assert_eq!(scheduler.take_due(start + ms(350)), Some("second"));
        assert_eq!(scheduler.take_due(start + ms(1000)), None);
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut scheduler = RecomputeScheduler::new(ms(10));
        assert!(!scheduler.cancel());
        scheduler.schedule(1, start);
        assert!(scheduler.cancel());
        assert_eq!(scheduler.take_due(start + ms(100)), None);
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let start = Instant::now();
        let mut scheduler = RecomputeScheduler::new(Duration::ZERO);
        scheduler.schedule('x', start);
        assert_eq!(scheduler.take_due(start), Some('x'));
    }
}
