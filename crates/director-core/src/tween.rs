//! Cinematic tween shots.

use crate::easing::Easing;
use crate::point::Point;

/// A timed, eased camera move between two world points.
///
/// Timing is frame-count based: the tween is sampled against the host's
/// global frame counter, so it is unaffected by how often `update` stalls.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: Point,
    pub to: Point,
    pub easing: Easing,
    pub start_frame: u64,
    pub duration: u32,
}

impl Tween {
    pub fn new(from: Point, to: Point, easing: Easing, start_frame: u64, duration: u32) -> Self {
        Self {
            from,
            to,
            easing,
            start_frame,
            duration,
        }
    }

    /// Fraction of the tween still to play at `frame`: 1 at the start,
    /// reaching 0 (or below) once the duration has elapsed.
    #[allow(clippy::cast_precision_loss)]
    pub fn remaining(&self, frame: u64) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        let end = self.start_frame as f64 + f64::from(self.duration);
        (end - frame as f64) / f64::from(self.duration)
    }

    pub fn is_finished(&self, frame: u64) -> bool {
        self.remaining(frame) <= 0.0
    }

    /// Camera position at `frame`. Holds exactly at `to` once finished.
    pub fn sample(&self, frame: u64) -> Point {
        let remaining = self.remaining(frame);
        if remaining > 0.0 {
            let t = self.easing.apply(1.0 - remaining);
            self.from.lerp(self.to, t)
        } else {
            self.to
        }
    }
}
