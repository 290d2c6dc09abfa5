//! Look-ahead dynamics.
//!
//! While the player walks, the camera gradually shoots ahead of them in the
//! facing direction. Strength builds in two phases (a delay, then a ramp) and
//! drains symmetrically once the player stops.

use crate::config::CameraConfig;
use crate::host::Direction;
use crate::point::{LookaheadOffset, Point};

/// Frames of hysteresis before look-ahead is considered on or off.
pub const ONGOING_MAX: u8 = 5;

/// Slowest camera-follow divisor, used when look-ahead is fully idle.
pub const MAX_FOLLOW_DIVISOR: f64 = 10.0;

/// Per-frame inputs for [`Lookahead::step`].
#[derive(Debug, Clone, Copy)]
pub struct LookaheadInput {
    /// Look-ahead enabled, one active anchor, no cutscene, player moving.
    pub eligible: bool,
    pub direction: Direction,
    pub magnitude: LookaheadOffset,
    /// "Fixed camera" preference: suppresses look-ahead entirely.
    pub fixed_camera: bool,
    pub fast_modifier: bool,
}

/// Output of one look-ahead step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadStep {
    /// Smoothed bias to add to the anchor center.
    pub offset: Point,
    /// Divisor for the camera's approach toward its target (>= 1).
    pub follow_divisor: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookahead {
    pub offset: LookaheadOffset,
    ongoing: u8,
    delay: u32,
    duration: u32,
    direction: Direction,
}

impl Lookahead {
    /// Clears all look-ahead state, as on a hard camera snap.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restarts the delay/ramp counters; the smoothed offset is kept.
    pub fn reset_timers(&mut self) {
        self.delay = 0;
        self.duration = 0;
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn ongoing(&self) -> u8 {
        self.ongoing
    }

    /// Normalized look-ahead strength in `[0, 1]`.
    pub fn strength(&self, config: &CameraConfig) -> f64 {
        if config.lookahead_duration == 0 {
            return if self.ongoing > 0 { 1.0 } else { 0.0 };
        }
        (f64::from(self.duration) / f64::from(config.lookahead_duration)).min(1.0)
    }

    /// Camera follow divisor: 1 when look-ahead is fully engaged, growing to
    /// [`MAX_FOLLOW_DIVISOR`] as it drains.
    pub fn follow_divisor(&self, config: &CameraConfig) -> f64 {
        let total = f64::from(config.lookahead_delay) + f64::from(config.lookahead_duration);
        let engaged = if total > 0.0 {
            (f64::from(self.delay) + f64::from(self.duration)) / total
        } else {
            1.0
        };
        ((1.0 - engaged) * MAX_FOLLOW_DIVISOR).max(1.0)
    }

    /// Advances look-ahead by one frame.
    pub fn step(&mut self, input: &LookaheadInput, config: &CameraConfig) -> LookaheadStep {
        if input.eligible {
            if self.ongoing < ONGOING_MAX {
                self.ongoing += 1;
            }
        } else if self.ongoing > 0 {
            self.ongoing -= 1;
        }

        if self.ongoing > 0 {
            if self.delay < config.lookahead_delay {
                self.delay += 1;
            } else if self.duration < config.lookahead_duration {
                self.duration += 1;
            }
        } else {
            self.delay = self.delay.saturating_sub(1);
            self.duration = self.duration.saturating_sub(1);
        }

        if self.direction != input.direction {
            self.direction = input.direction;
            self.delay = 0;
            self.duration = config.lookahead_duration / 2;
        }

        if input.fixed_camera {
            self.offset = LookaheadOffset::ZERO;
            return LookaheadStep {
                offset: Point::ZERO,
                follow_divisor: 1.0,
            };
        }

        let strength = self.strength(config);
        let target = LookaheadOffset::new(
            input.magnitude.h * input.direction.horizontal() * strength,
            input.magnitude.v * input.direction.vertical() * strength,
        );
        let approach = if input.fast_modifier {
            config.lookahead_approach_fast
        } else {
            config.lookahead_approach
        }
        .max(1.0);

        self.offset.h += (target.h - self.offset.h) / approach;
        self.offset.v += (target.v - self.offset.v) / approach;

        LookaheadStep {
            offset: self.offset.as_point(),
            follow_divisor: self.follow_divisor(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walking(direction: Direction) -> LookaheadInput {
        LookaheadInput {
            eligible: true,
            direction,
            magnitude: LookaheadOffset::new(2.5, 2.5),
            fixed_camera: false,
            fast_modifier: false,
        }
    }

    #[test]
    fn test_ongoing_hysteresis() {
        let config = CameraConfig::default();
        let mut lookahead = Lookahead::default();
        let mut input = walking(Direction::Right);
        for _ in 0..10 {
            lookahead.step(&input, &config);
        }
        assert_eq!(lookahead.ongoing(), ONGOING_MAX);

        input.eligible = false;
        lookahead.step(&input, &config);
        assert_eq!(lookahead.ongoing(), ONGOING_MAX - 1);
    }

    #[test]
    fn test_delay_fills_before_duration() {
        let config = CameraConfig::default();
        let mut lookahead = Lookahead::default();
        let input = walking(Direction::None);
        for _ in 0..config.lookahead_delay {
            lookahead.step(&input, &config);
        }
        assert_eq!(lookahead.delay(), config.lookahead_delay);
        assert_eq!(lookahead.duration(), 0);

        for _ in 0..100 {
            lookahead.step(&input, &config);
        }
        assert_eq!(lookahead.duration(), config.lookahead_duration);
        assert!((lookahead.strength(&config) - 1.0).abs() < f64::EPSILON);
        assert!((lookahead.follow_divisor(&config) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_direction_change_kicks_half_duration() {
        let config = CameraConfig::default();
        let mut lookahead = Lookahead::default();
        lookahead.step(&walking(Direction::Left), &config);
        assert_eq!(lookahead.delay(), 0);
        assert_eq!(lookahead.duration(), config.lookahead_duration / 2);
        assert!((lookahead.strength(&config) - 0.5).abs() < f64::EPSILON);
        // First step already leans left, slowly.
        assert!(lookahead.offset.h < 0.0);
        assert!((lookahead.offset.h + 2.5 * 0.5 / 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_fast_modifier_approaches_slower() {
        let config = CameraConfig::default();
        let mut normal = Lookahead::default();
        let mut fast = Lookahead::default();
        let mut input = walking(Direction::Down);
        normal.step(&input, &config);
        input.fast_modifier = true;
        fast.step(&input, &config);
        assert!(fast.offset.v > 0.0);
        assert!(fast.offset.v < normal.offset.v);
    }

    #[test]
    fn test_approach_divisor_below_one_is_clamped() {
        let config = CameraConfig {
            lookahead_approach: 0.0,
            ..CameraConfig::default()
        };
        let mut lookahead = Lookahead::default();
        let step = lookahead.step(&walking(Direction::Right), &config);
        assert!(step.offset.x.is_finite());
        // Clamped to 1: jumps straight to half strength after the kick.
        assert!((lookahead.offset.h - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_drains_when_idle() {
        let config = CameraConfig::default();
        let mut lookahead = Lookahead::default();
        let mut input = walking(Direction::Up);
        for _ in 0..60 {
            lookahead.step(&input, &config);
        }
        input.eligible = false;
        for _ in 0..200 {
            lookahead.step(&input, &config);
        }
        assert_eq!(lookahead.delay(), 0);
        assert_eq!(lookahead.duration(), 0);
        assert!((lookahead.follow_divisor(&config) - MAX_FOLLOW_DIVISOR).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixed_camera_zeroes_offset() {
        let config = CameraConfig::default();
        let mut lookahead = Lookahead::default();
        let mut input = walking(Direction::Right);
        for _ in 0..60 {
            lookahead.step(&input, &config);
        }
        assert!(lookahead.offset.h > 0.0);

        input.fixed_camera = true;
        let step = lookahead.step(&input, &config);
        assert_eq!(step.offset, Point::ZERO);
        assert!((step.follow_divisor - 1.0).abs() < f64::EPSILON);
        assert_eq!(lookahead.offset, LookaheadOffset::ZERO);
    }
}
