//! Test doubles for the host collaborator traits.
//!
//! `TestStage` is a hand-driven world: tests move the player, flip the
//! cutscene flag and advance the frame counter explicitly, which keeps every
//! camera run fully deterministic.

use std::collections::HashMap;

use crate::config::CameraPreferences;
use crate::host::{ActorState, Direction, EntityState, EventId, Stage, Viewport};
use crate::point::Point;

pub(crate) struct TestStage {
    pub player: ActorState,
    pub events: HashMap<EventId, EntityState>,
    pub entities: HashMap<u64, EntityState>,
    pub frame: u64,
    pub event_running: bool,
    pub fast_modifier: bool,
    pub preferences: CameraPreferences,
}

impl TestStage {
    /// A stage with the player standing still at `(x, y)`, facing nowhere.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            player: ActorState {
                position: Point::new(x, y),
                moving: false,
                direction: Direction::None,
            },
            events: HashMap::new(),
            entities: HashMap::new(),
            frame: 0,
            event_running: false,
            fast_modifier: false,
            preferences: CameraPreferences::default(),
        }
    }

    pub fn add_event(&mut self, id: EventId, position: Point) {
        self.events.insert(id, EntityState::active(position));
    }

    pub fn deactivate_event(&mut self, id: EventId) {
        if let Some(event) = self.events.get_mut(&id) {
            event.active = false;
        }
    }

    pub fn move_player(&mut self, x: f64, y: f64) {
        self.player.position = Point::new(x, y);
    }

    /// Starts walking in `direction`; the player keeps moving until stopped.
    pub fn walk(&mut self, direction: Direction) {
        self.player.moving = true;
        self.player.direction = direction;
    }

    pub fn stop(&mut self) {
        self.player.moving = false;
    }

    pub fn tick(&mut self) {
        self.frame += 1;
    }
}

impl Stage for TestStage {
    fn player(&self) -> ActorState {
        self.player
    }

    fn event(&self, id: EventId) -> Option<EntityState> {
        self.events.get(&id).copied()
    }

    fn entity(&self, key: u64) -> Option<EntityState> {
        self.entities.get(&key).copied()
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn is_event_running(&self) -> bool {
        self.event_running
    }

    fn is_fast_modifier_held(&self) -> bool {
        self.fast_modifier
    }

    fn preferences(&self) -> CameraPreferences {
        self.preferences
    }
}

/// 816x624 screen with 48px tiles.
pub(crate) struct TestViewport {
    pub tile: (f64, f64),
    pub screen: (f64, f64),
    pub display: Point,
}

impl TestViewport {
    pub fn new() -> Self {
        Self {
            tile: (48.0, 48.0),
            screen: (816.0, 624.0),
            display: Point::ZERO,
        }
    }

    /// The world point currently at the camera focus, ignoring offsets.
    pub fn focus(&self) -> Point {
        self.display + self.half_extent()
    }
}

impl Viewport for TestViewport {
    fn tile_size(&self) -> (f64, f64) {
        self.tile
    }

    fn screen_size(&self) -> (f64, f64) {
        self.screen
    }

    fn display_position(&self) -> Point {
        self.display
    }

    fn set_display_position(&mut self, position: Point) {
        self.display = position;
    }
}

/// Asserts two points are equal within `eps` on both axes.
pub(crate) fn assert_near(actual: Point, expected: Point, eps: f64) {
    assert!(
        (actual.x - expected.x).abs() <= eps && (actual.y - expected.y).abs() <= eps,
        "expected {expected:?}, got {actual:?} (eps {eps})"
    );
}
