use std::time::Duration;

use thiserror::Error;

/// Errors raised when constructing a countdown from raw seconds.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum TimerError {
    /// The provided duration was below zero.
    #[error("timer duration must not be negative, got {0}s")]
    Negative(f32),
    /// The provided duration was NaN, infinite, or too large to represent.
    #[error("timer duration {0}s is not representable")]
    Unrepresentable(f32),
}

/// Countdown that completes once its remaining time reaches zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    remaining: Duration,
}

impl Timer {
    /// Timer that is already complete.
    #[must_use]
    pub const fn complete() -> Self {
        Self {
            remaining: Duration::ZERO,
        }
    }

    /// Timer counting down from the provided duration.
    #[must_use]
    pub const fn started(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Restarts the countdown from the provided duration.
    pub fn restart(&mut self, duration: Duration) {
        self.remaining = duration;
    }

    /// Consumes elapsed time, saturating at zero.
    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    /// Reports whether the countdown has elapsed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Time left before completion.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Converts seconds into a [`Duration`], rejecting negative and non-finite values.
pub fn secs_to_duration(seconds: f32) -> Result<Duration, TimerError> {
    if seconds < 0.0 {
        return Err(TimerError::Negative(seconds));
    }
    Duration::try_from_secs_f32(seconds).map_err(|_| TimerError::Unrepresentable(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_duration_is_rejected() {
        assert_eq!(secs_to_duration(-0.5), Err(TimerError::Negative(-0.5)));
        assert_eq!(secs_to_duration(0.25), Ok(Duration::from_millis(250)));
        assert!(matches!(
            secs_to_duration(f32::NAN),
            Err(TimerError::Unrepresentable(_))
        ));
    }

    #[test]
    fn countdown_saturates_at_zero() {
        let mut timer = Timer::started(Duration::from_millis(300));
        timer.advance(Duration::from_millis(200));
        assert!(!timer.is_complete());
        assert_eq!(timer.remaining(), Duration::from_millis(100));
        timer.advance(Duration::from_secs(1));
        assert!(timer.is_complete());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }
}
