//! Collaborator boundary between the camera and the host game.
//!
//! The camera never owns entities or draws anything. Each frame it reads the
//! world through [`Stage`] and writes one display position through
//! [`Viewport`].

use serde::{Deserialize, Serialize};

use crate::config::CameraPreferences;
use crate::point::Point;

/// Identifier of a map event.
pub type EventId = u32;

/// Facing direction of an actor, using numpad-style host codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// Converts a host direction code (2/4/6/8, anything else is `None`).
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Self::Down,
            4 => Self::Left,
            6 => Self::Right,
            8 => Self::Up,
            _ => Self::None,
        }
    }

    /// -1 for left, +1 for right, 0 otherwise.
    pub fn horizontal(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            _ => 0.0,
        }
    }

    /// -1 for up, +1 for down, 0 otherwise.
    pub fn vertical(self) -> f64 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
            _ => 0.0,
        }
    }

    pub fn unit(self) -> Point {
        Point::new(self.horizontal(), self.vertical())
    }
}

/// The tracked actor (the player) as sampled this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActorState {
    pub position: Point,
    pub moving: bool,
    pub direction: Direction,
}

/// A live entity an anchor can follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    pub position: Point,
    /// `false` once the entity is deactivated (no valid page).
    pub active: bool,
}

impl EntityState {
    pub fn active(position: Point) -> Self {
        Self {
            position,
            active: true,
        }
    }
}

/// Non-owning handle to a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKey {
    Player,
    Event(EventId),
    /// Host-defined entity outside the event table.
    Entity(u64),
}

/// Read-only world inputs, sampled once per frame.
pub trait Stage {
    fn player(&self) -> ActorState;

    /// Looks up a map event; `None` if no such event exists.
    fn event(&self, id: EventId) -> Option<EntityState>;

    /// Resolves a host-defined entity. Defaults to "never exists".
    fn entity(&self, _key: u64) -> Option<EntityState> {
        None
    }

    /// Resolves an object handle; a destroyed entity resolves to `None`.
    fn object(&self, key: ObjectKey) -> Option<EntityState> {
        match key {
            ObjectKey::Player => Some(EntityState::active(self.player().position)),
            ObjectKey::Event(id) => self.event(id),
            ObjectKey::Entity(key) => self.entity(key),
        }
    }

    /// Global frame counter, monotonically increasing.
    fn frame_count(&self) -> u64;

    /// Whether a cutscene or forced event is running.
    fn is_event_running(&self) -> bool;

    /// Whether the "fast" input modifier (dash) is held.
    fn is_fast_modifier_held(&self) -> bool {
        false
    }

    fn preferences(&self) -> CameraPreferences {
        CameraPreferences::default()
    }
}

/// Screen geometry and the display-position sink.
pub trait Viewport {
    /// Tile size in screen pixels (width, height).
    fn tile_size(&self) -> (f64, f64);

    /// Screen size in pixels (width, height).
    fn screen_size(&self) -> (f64, f64);

    /// Top-left display position in tiles, as last committed.
    fn display_position(&self) -> Point;

    fn set_display_position(&mut self, position: Point);

    /// Offset from the display origin to the camera focus, in tiles.
    fn half_extent(&self) -> Point {
        let (tile_w, tile_h) = self.tile_size();
        let (screen_w, screen_h) = self.screen_size();
        Point::new(
            (screen_w / tile_w - 1.0) / 2.0,
            (screen_h / tile_h - 1.0) / 2.0,
        )
    }
}
