//! Frame timing.
//!
//! Scene updates take time in normalized frames: a delta of `1.0` means
//! exactly one target frame elapsed. [`FrameClock`] turns wall-clock
//! timestamps into that unit.

use crate::{RenderError, RenderResult};

/// Converts timestamps into normalized frame deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    frame_ms: f64,
    max_delta: f64,
    last: Option<f64>,
}

impl FrameClock {
    /// Create a clock for `target_fps`, clamping deltas to `max_delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_fps` is zero or `max_delta` is not
    /// positive.
    pub fn new(target_fps: u32, max_delta: f64) -> RenderResult<Self> {
        if target_fps == 0 {
            return Err(RenderError::Config("target_fps must be positive".to_string()));
        }
        if max_delta <= 0.0 {
            return Err(RenderError::Config(format!(
                "max_delta must be positive, got {max_delta}"
            )));
        }
        Ok(Self {
            frame_ms: 1000.0 / f64::from(target_fps),
            max_delta,
            last: None,
        })
    }

    /// Duration of one target frame in milliseconds.
    #[must_use]
    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Normalize an elapsed duration in milliseconds.
    #[must_use]
    pub fn normalize(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.frame_ms).clamp(0.0, self.max_delta)
    }

    /// Record a timestamp and return the delta since the previous one. The
    /// first tick counts as exactly one frame.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last {
            Some(last) => self.normalize(now_ms - last),
            None => 1.0,
        };
        self.last = Some(now_ms);
        delta
    }

    /// Forget the previous timestamp, e.g. after the page was hidden.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_against_target() {
        let clock = FrameClock::new(50, 4.0).unwrap();
        assert!((clock.frame_ms() - 20.0).abs() < f64::EPSILON);
        assert!((clock.normalize(30.0) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_clamps_long_pauses() {
        let mut clock = FrameClock::new(60, 3.0).unwrap();
        assert!((clock.tick(1000.0) - 1.0).abs() < f64::EPSILON);
        assert!((clock.tick(5000.0) - 3.0).abs() < f64::EPSILON);
        assert_eq!(clock.tick(4000.0), 0.0);
        clock.reset();
        assert!((clock.tick(0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(FrameClock::new(0, 1.0), Err(RenderError::Config(_))));
        assert!(matches!(FrameClock::new(60, 0.0), Err(RenderError::Config(_))));
    }
}
