//! Auto-Repeat Timer
//!
//! A one-shot countdown armed after each completed flip. The host advances
//! it through [`FlightBoard::tick`](crate::FlightBoard::tick); it never reads
//! the wall clock.

use std::time::Duration;

/// Pending pause before the next automatic flip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepeatTimer {
    remaining: Option<Duration>,
}

impl RepeatTimer {
    /// Create an idle timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down `pause`, replacing any pending countdown
    pub fn arm(&mut self, pause: Duration) {
        self.remaining = Some(pause);
    }

    /// Drop the pending countdown
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Whether a countdown is pending
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left until the timer fires
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Advance by `delta`; returns true exactly once, when the timer fires
    pub fn advance(&mut self, delta: Duration) -> bool {
        match self.remaining {
            Some(left) if delta >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - delta);
                false
            }
            None => false,
        }
    }
}
