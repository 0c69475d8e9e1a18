//! Deferred panel close after the input loses focus.
//!
//! A pointer click on a panel row arrives around the same time the input
//! blurs. Closing immediately on blur would remove the row before the click
//! lands, so the close is deferred by a short delay. The timer is
//! fire-once: anything that reopens or refocuses the widget cancels the
//! armed deadline, so a stale close can never hide a panel the user has
//! gone back to.

use std::time::{Duration, Instant};

/// Default blur-to-close delay
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct CloseTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for CloseTimer {
    fn default() -> Self {
        CloseTimer::new(DEFAULT_CLOSE_DELAY)
    }
}

impl CloseTimer {
    pub fn new(delay: Duration) -> Self {
        CloseTimer {
            delay,
            deadline: None,
        }
    }

    /// Arm the timer, replacing any earlier pending close.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Invalidate any pending close.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending close fires, if one is armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true exactly once when the armed deadline has passed.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut timer = CloseTimer::new(Duration::from_millis(300));
        timer.schedule(t0);
        assert!(timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_millis(100)));
        assert!(timer.is_pending());
        assert!(timer.fire(t0 + Duration::from_millis(300)));
        assert!(!timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn cancel_prevents_fire() {
        let t0 = Instant::now();
        let mut timer = CloseTimer::default();
        timer.schedule(t0);
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.fire(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn reschedule_pushes_deadline_out() {
        let t0 = Instant::now();
        let mut timer = CloseTimer::new(Duration::from_millis(300));
        timer.schedule(t0);
        timer.schedule(t0 + Duration::from_millis(200));
        assert!(!timer.fire(t0 + Duration::from_millis(350)));
        assert!(timer.fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn remaining_counts_down_and_saturates() {
        let t0 = Instant::now();
        let mut timer = CloseTimer::new(Duration::from_millis(300));
        assert_eq!(timer.remaining(t0), None);
        timer.schedule(t0);
        assert_eq!(
            timer.remaining(t0 + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            timer.remaining(t0 + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
