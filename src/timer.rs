use std::time::{Duration, Instant};

/// Single-shot timer checked from the UI loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayTimer {
    deadline: Option<Instant>,
}

impl DelayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `delay` after `now`, replacing any pending deadline.
    /// A delay too large to represent leaves the timer disarmed.
    pub fn start(&mut self, delay: Duration, now: Instant) {
        self.deadline = now.checked_add(delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` once when the deadline has passed, disarming the timer.
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
