//! Camera configuration.
//!
//! `CameraConfig` holds the designer-tuned defaults and is loaded once at
//! startup; `CameraPreferences` holds the player's option-menu choices.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::anchor::ActivationMode;
use crate::error::ConfigError;
use crate::point::{LookaheadOffset, Point};

/// Designer-facing camera parameters. All durations are in frames (60 = 1s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial camera center adjustment, in tiles.
    pub default_offset: Point,
    /// Whether look-ahead starts enabled.
    pub use_lookahead: bool,
    /// How far ahead of a moving player the camera shoots, in tiles.
    pub lookahead_magnitude: LookaheadOffset,
    /// Frames of movement before look-ahead starts building.
    pub lookahead_delay: u32,
    /// Frames for look-ahead to reach full strength.
    pub lookahead_duration: u32,
    /// Blend length when the active anchor set changes.
    pub anchor_transition_duration: u32,
    /// Anchor activation test.
    pub activation_mode: ActivationMode,
    /// Look-ahead approach divisor.
    pub lookahead_approach: f64,
    /// Look-ahead approach divisor while the fast modifier is held.
    pub lookahead_approach_fast: f64,
    /// Number of discrete host scroll speeds.
    pub scroll_speed_levels: f64,
    /// Frames per tile for the slowest scroll speed.
    pub scroll_frames_per_tile: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_offset: Point::ZERO,
            use_lookahead: true,
            lookahead_magnitude: LookaheadOffset::new(2.5, 2.5),
            lookahead_delay: 15,
            lookahead_duration: 30,
            anchor_transition_duration: 60,
            activation_mode: ActivationMode::Aabb,
            lookahead_approach: 50.0,
            lookahead_approach_fast: 80.0,
            scroll_speed_levels: 7.0,
            scroll_frames_per_tile: 40.0,
        }
    }
}

impl CameraConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead_approach < 1.0 {
            return Err(ConfigError::Invalid("lookahead_approach must be >= 1".into()));
        }
        if self.lookahead_approach_fast < 1.0 {
            return Err(ConfigError::Invalid(
                "lookahead_approach_fast must be >= 1".into(),
            ));
        }
        if self.scroll_speed_levels <= 0.0 {
            return Err(ConfigError::Invalid("scroll_speed_levels must be > 0".into()));
        }
        Ok(())
    }

    /// Frames a host scroll of `distance` tiles takes at `speed`.
    ///
    /// Rounded up to whole frames; never negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scroll_duration(&self, distance: f64, speed: f64) -> u32 {
        let frames =
            (1.0 - speed / self.scroll_speed_levels) * self.scroll_frames_per_tile * distance;
        if frames.is_finite() && frames > 0.0 {
            frames.ceil() as u32
        } else {
            0
        }
    }
}

/// Player options persisted by the host's options store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPreferences {
    /// Disables look-ahead at render time without touching magnitudes.
    pub use_fixed_camera: bool,
}
