use std::time::{Duration, Instant};

/// One-shot timer marking acquired tokens as possibly expired.
///
/// The timer fires when it is polled at or after its deadline. Firing only
/// sets the "regenerate on submit" flag; nothing is torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessTimer {
    interval: Duration,
    deadline: Option<Instant>,
    regenerate_on_submit: bool,
}

impl FreshnessTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            regenerate_on_submit: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restarts the timer after a successful acquisition.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
        self.regenerate_on_submit = false;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires the timer if its deadline has passed and returns the flag.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.deadline = None;
                self.regenerate_on_submit = true;
            }
        }
        self.regenerate_on_submit
    }

    pub fn regenerate_on_submit(&self) -> bool {
        self.regenerate_on_submit
    }
}
