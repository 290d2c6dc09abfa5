//! Director Camera Core Library
//!
//! Frame-synchronous camera for tile-based 2D maps. Every frame the
//! [`Director`] blends anchor tracking, look-ahead, scripted offset scrolls
//! and cinematic tweens into a single pixel-aligned display position.
//!
//! The host game plugs in through two traits:
//! - [`Stage`]: read-only world state (player, events, clock, cutscene flag)
//! - [`Viewport`]: tile/screen geometry and the display-position sink

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod anchor;
pub mod config;
pub mod director;
pub mod easing;
pub mod error;
pub mod host;
pub mod lookahead;
pub mod note;
pub mod point;
pub mod state;
pub mod tween;

#[cfg(test)]
pub(crate) mod test_utils;

pub use anchor::{ActivationMode, Anchor, AnchorCenter, AnchorId, AnchorRegistry, AnchorSource};
pub use config::{CameraConfig, CameraPreferences};
pub use director::{Director, MapId};
pub use easing::{Easing, EasingType};
pub use error::{ConfigError, DirectorError, SnapshotError};
pub use host::{ActorState, Direction, EntityState, EventId, ObjectKey, Stage, Viewport};
pub use lookahead::Lookahead;
pub use note::{AnchorDecl, NOTE_PREFIX, parse_note};
pub use point::{LookaheadOffset, Point};
pub use state::{CameraSnapshot, CameraState, Transition};
pub use tween::Tween;
