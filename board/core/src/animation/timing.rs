//! Transition Timing
//!
//! Easing curves and the progress clock for a single glyph transition.
//! Progress is driven by explicit time deltas from the host, so a missed
//! frame is absorbed by the next tick's progress value.

use std::f32::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Easing functions for transition progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum EasingFunction {
    /// No easing (constant speed)
    Linear,

    /// Cosine ease: slow start and end, the classic flap motion
    #[default]
    Swing,

    /// Slow start, fast end
    EaseIn,

    /// Fast start, slow end
    EaseOut,

    /// Slow start and end
    EaseInOut,

    /// Cubic ease out
    EaseOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Swing => 0.5 - (t * PI).cos() / 2.0,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Elapsed-time clock for one transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionClock {
    duration: Duration,
    elapsed: Duration,
}

impl TransitionClock {
    /// Start a clock for a transition of the given duration
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the clock, returning time left over past the end
    pub fn advance(&mut self, delta: Duration) -> Duration {
        self.elapsed += delta;
        self.elapsed.saturating_sub(self.duration)
    }

    /// Linear progress (0.0 to 1.0)
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the transition has run its full duration
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Total duration of the transition
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::Swing,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::EaseOutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_swing_is_symmetric() {
        assert!((EasingFunction::Swing.apply(0.5) - 0.5).abs() < 1e-6);
        let early = EasingFunction::Swing.apply(0.25);
        let late = EasingFunction::Swing.apply(0.75);
        assert!((early + late - 1.0).abs() < 1e-6);
        assert!(early < 0.25);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(EasingFunction::Linear.apply(-1.0), 0.0);
        assert_eq!(EasingFunction::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_clock_progress_and_overflow() {
        let mut clock = TransitionClock::new(Duration::from_millis(100));
        assert_eq!(clock.advance(Duration::from_millis(40)), Duration::ZERO);
        assert!((clock.progress() - 0.4).abs() < 1e-4);
        assert!(!clock.is_complete());

        let leftover = clock.advance(Duration::from_millis(90));
        assert_eq!(leftover, Duration::from_millis(30));
        assert_eq!(clock.progress(), 1.0);
        assert!(clock.is_complete());
    }

    #[test]
    fn test_zero_duration_clock_is_complete() {
        let clock = TransitionClock::new(Duration::ZERO);
        assert!(clock.is_complete());
        assert_eq!(clock.progress(), 1.0);
    }
}
