//! Headless stand-ins for the game world and the screen.

use std::collections::BTreeMap;

use director_core::{
    ActorState, CameraPreferences, Direction, EntityState, EventId, Point, Stage, Viewport,
};

use crate::scene::Scene;

pub struct World {
    pub player: ActorState,
    pub events: BTreeMap<EventId, EntityState>,
    pub frame: u64,
    pub event_running: bool,
    pub dash: bool,
    pub preferences: CameraPreferences,
    walk_speed: f64,
}

impl World {
    pub fn from_scene(scene: &Scene) -> Self {
        let events = scene
            .events
            .iter()
            .map(|event| (event.id, EntityState::active(event.position)))
            .collect();

        Self {
            player: ActorState {
                position: scene.player,
                moving: false,
                direction: Direction::None,
            },
            events,
            frame: 0,
            event_running: false,
            dash: false,
            preferences: CameraPreferences::default(),
            walk_speed: scene.walk_speed,
        }
    }

    pub fn walk(&mut self, direction: Direction) {
        self.player.moving = direction != Direction::None;
        self.player.direction = direction;
    }

    pub fn stop(&mut self) {
        self.player.moving = false;
    }

    /// Advances the clock and moves the player one step.
    pub fn tick(&mut self) {
        self.frame += 1;
        if self.player.moving {
            let speed = if self.dash {
                self.walk_speed * 2.0
            } else {
                self.walk_speed
            };
            self.player.position += self.player.direction.unit() * speed;
        }
    }
}

impl Stage for World {
    fn player(&self) -> ActorState {
        self.player
    }

    fn event(&self, id: EventId) -> Option<EntityState> {
        self.events.get(&id).copied()
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn is_event_running(&self) -> bool {
        self.event_running
    }

    fn is_fast_modifier_held(&self) -> bool {
        self.dash
    }

    fn preferences(&self) -> CameraPreferences {
        self.preferences
    }
}

pub struct Screen {
    tile: (f64, f64),
    size: (f64, f64),
    display: Point,
}

impl Screen {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            tile: scene.tile,
            size: scene.screen,
            display: Point::ZERO,
        }
    }
}

impl Viewport for Screen {
    fn tile_size(&self) -> (f64, f64) {
        self.tile
    }

    fn screen_size(&self) -> (f64, f64) {
        self.size
    }

    fn display_position(&self) -> Point {
        self.display
    }

    fn set_display_position(&mut self, position: Point) {
        self.display = position;
    }
}
