//! Frame-to-tick gating.
//!
//! The frame loop runs at the display rate; game logic advances in discrete
//! ticks. `FixedStep` turns a stream of frame deltas into at most one tick per
//! frame, carrying the remainder over instead of zeroing it so tick timing
//! does not drift.

use std::time::Duration;

/// How many intervals of backlog the accumulator may hold.
const MAX_BACKLOG: u32 = 4;

#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Build a step that fires `hz` times per second.
    pub fn per_second(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Add `elapsed` to the accumulator and report whether a tick is due.
    ///
    /// `speed` scales the interval: 2.0 ticks twice as often, 0.5 half as
    /// often. When a tick is due exactly one interval is subtracted, so a
    /// late frame still leaves its surplus for the next one.
    pub fn advance(&mut self, elapsed: Duration, speed: f32) -> bool {
        let step = self.scaled_interval(speed);
        if step.is_zero() {
            return true;
        }
        self.accumulator = (self.accumulator + elapsed).min(step * MAX_BACKLOG);
        if self.accumulator >= step {
            self.accumulator -= step;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    fn scaled_interval(&self, speed: f32) -> Duration {
        if speed > 0.0 && speed.is_finite() {
            self.interval.div_f32(speed)
        } else {
            self.interval
        }
    }
}

/// A transient speed multiplier that reverts to 1.0 after a number of ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifier {
    factor: f32,
    remaining: u32,
}

impl Default for SpeedModifier {
    fn default() -> Self {
        Self::none()
    }
}

impl SpeedModifier {
    pub const fn none() -> Self {
        Self {
            factor: 1.0,
            remaining: 0,
        }
    }

    pub fn new(factor: f32, ticks: u32) -> Self {
        if ticks == 0 {
            return Self::none();
        }
        Self {
            factor,
            remaining: ticks,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Count down one tick. Returns true on the tick the modifier expires.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.factor = 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_interval_is_reached() {
        let mut step = FixedStep::new(Duration::from_millis(150));
        assert!(!step.advance(Duration::from_millis(100), 1.0));
        assert!(step.advance(Duration::from_millis(60), 1.0));
        assert!(!step.advance(Duration::from_millis(10), 1.0));
    }

    #[test]
    fn remainder_carries_over() {
        let mut step = FixedStep::new(Duration::from_millis(100));
        // 130ms: one tick, 30ms left over
        assert!(step.advance(Duration::from_millis(130), 1.0));
        // 30 + 70 = 100: ticks again without a full fresh interval
        assert!(step.advance(Duration::from_millis(70), 1.0));
    }

    #[test]
    fn at_most_one_tick_per_frame() {
        let mut step = FixedStep::new(Duration::from_millis(10));
        assert!(step.advance(Duration::from_millis(25), 1.0));
        // backlog is drained one frame at a time
        assert!(step.advance(Duration::ZERO, 1.0));
        assert!(!step.advance(Duration::ZERO, 1.0));
    }

    #[test]
    fn backlog_is_capped() {
        let mut step = FixedStep::new(Duration::from_millis(10));
        assert!(step.advance(Duration::from_secs(5), 1.0));
        let mut extra = 0;
        while step.advance(Duration::ZERO, 1.0) {
            extra += 1;
        }
        assert_eq!(extra, (MAX_BACKLOG - 1) as usize);
    }

    #[test]
    fn speed_scales_interval() {
        let mut fast = FixedStep::new(Duration::from_millis(150));
        assert!(!fast.advance(Duration::from_millis(90), 1.5));
        assert!(fast.advance(Duration::from_millis(11), 1.5));

        let mut slow = FixedStep::new(Duration::from_millis(150));
        assert!(!slow.advance(Duration::from_millis(200), 0.6));
        assert!(slow.advance(Duration::from_millis(60), 0.6));
    }

    #[test]
    fn modifier_reverts_after_duration() {
        let mut m = SpeedModifier::new(0.6, 3);
        assert!(m.is_active());
        assert!(!m.tick());
        assert!(!m.tick());
        assert!(m.tick());
        assert_eq!(m.factor(), 1.0);
        assert!(!m.is_active());
        assert!(!m.tick());
    }

    #[test]
    fn zero_tick_modifier_is_neutral() {
        assert_eq!(SpeedModifier::new(2.0, 0), SpeedModifier::none());
    }
}
