//! Mutable camera state and its save-file snapshot.

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::error::SnapshotError;
use crate::lookahead::Lookahead;
use crate::point::{LookaheadOffset, Point};
use crate::tween::Tween;

/// Anchor-transition countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    /// Frames left in the blend; 0 when idle.
    pub remaining: u32,
    /// Length of the blend, as of the last frame.
    pub max: u32,
}

impl Transition {
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn restart(&mut self, max: u32) {
        self.max = max;
        self.remaining = max;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}

/// Everything the camera remembers between frames.
#[derive(Debug, Clone)]
pub struct CameraState {
    /// Camera focus before transition blending, offset and quantization.
    pub current: Point,
    /// Blend origin for the anchor transition.
    pub previous: Point,
    /// Persistent center adjustment.
    pub offset: Point,
    /// Where an offset animation ends.
    pub target_offset: Point,
    pub offset_time: u32,
    /// Offset animation length; 0 when no animation is running.
    pub offset_duration: u32,
    /// Offset actually added to the display position last frame.
    pub applied_offset: Point,
    pub lookahead: Lookahead,
    pub lookahead_magnitude: LookaheadOffset,
    pub use_lookahead: bool,
    pub tween: Option<Tween>,
    pub transition: Transition,
    pub anchor_center: Point,
    pub active_count: usize,
    /// Cutscene flag as of the last frame, for edge detection.
    pub event_running: bool,
    /// Treat the camera as in a cutscene regardless of the host.
    pub force_event_mode: bool,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            current: Point::ZERO,
            previous: Point::ZERO,
            offset: config.default_offset,
            target_offset: Point::ZERO,
            offset_time: 0,
            offset_duration: 0,
            applied_offset: config.default_offset,
            lookahead: Lookahead::default(),
            lookahead_magnitude: config.lookahead_magnitude,
            use_lookahead: config.use_lookahead,
            tween: None,
            transition: Transition::default(),
            anchor_center: Point::ZERO,
            active_count: 1,
            event_running: false,
            force_event_mode: false,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.offset_duration > 0
    }

    pub fn capture_previous_position(&mut self) {
        self.previous = self.current;
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            target_offset: self.target_offset,
            offset: self.offset,
            lookahead_offset: self.lookahead.offset,
            lookahead_magnitude: self.lookahead_magnitude,
            use_lookahead: self.use_lookahead,
        }
    }

    /// Applies the persisted fields of `snapshot`. Timers are left alone.
    pub fn apply_snapshot(&mut self, snapshot: &CameraSnapshot) {
        self.target_offset = snapshot.target_offset;
        self.offset = snapshot.offset;
        self.lookahead.offset = snapshot.lookahead_offset;
        self.lookahead_magnitude = snapshot.lookahead_magnitude;
        self.use_lookahead = snapshot.use_lookahead;
    }
}

/// The part of the camera stored in save files.
///
/// Anchors are not included: they are rebuilt from map and event notes when
/// the map is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub target_offset: Point,
    pub offset: Point,
    pub lookahead_offset: LookaheadOffset,
    pub lookahead_magnitude: LookaheadOffset,
    pub use_lookahead: bool,
}

impl CameraSnapshot {
    /// Serialize the snapshot to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapshotError> {
        Ok(postcard::from_bytes(data)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
