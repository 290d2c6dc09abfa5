//! Drives a [`Director`] through a scene, one frame at a time.

use director_core::{CameraConfig, Director, DirectorError, Point, Viewport};
use serde::Serialize;

use crate::scene::{Action, Scene};
use crate::world::{Screen, World};

/// Camera output for one simulated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    /// Committed top-left display position, in tiles.
    pub display: Point,
    /// World point at the center of the screen.
    pub focus: Point,
    pub active_anchors: usize,
    pub tweening: bool,
    pub scrolling: bool,
}

pub struct Simulation {
    scene: Scene,
    world: World,
    screen: Screen,
    director: Director,
}

impl Simulation {
    pub fn new(scene: Scene, config: CameraConfig) -> Self {
        let world = World::from_scene(&scene);
        let screen = Screen::from_scene(&scene);

        let mut director = Director::new(config);
        director.initialize(&world);
        let mut anchors = director.on_map_setup(&world, scene.map_id, &scene.map_note);
        for event in &scene.events {
            anchors += director.on_event_created(&world, event.id, &event.note);
        }

        tracing::info!(
            "[scene] Loaded '{}': {} events, {} anchors from notes",
            scene.name,
            scene.events.len(),
            anchors
        );

        Self {
            scene,
            world,
            screen,
            director,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances one frame: clock, scripted cues, then the camera.
    pub fn step(&mut self) -> FrameRecord {
        self.world.tick();
        let frame = self.world.frame;

        let actions: Vec<Action> = self
            .scene
            .cues_at(frame)
            .map(|cue| cue.action.clone())
            .collect();
        for action in &actions {
            if let Err(e) = self.apply(action) {
                tracing::info!("[scene] frame {}: {:?} rejected: {}", frame, action, e);
            }
        }

        let display = self.director.update(&self.world, &mut self.screen);
        let state = self.director.state();

        FrameRecord {
            frame,
            display,
            focus: display + self.screen.half_extent(),
            active_anchors: state.active_count,
            tweening: state.tween.is_some(),
            scrolling: state.is_scrolling(),
        }
    }

    pub fn run(&mut self, frames: u64) -> Vec<FrameRecord> {
        (0..frames).map(|_| self.step()).collect()
    }

    fn apply(&mut self, action: &Action) -> Result<(), DirectorError> {
        tracing::debug!("[scene] frame {}: {:?}", self.world.frame, action);

        let world = &mut self.world;
        let director = &mut self.director;
        match *action {
            Action::Walk { direction } => world.walk(direction),
            Action::Stop => world.stop(),
            Action::Dash { held } => world.dash = held,
            Action::Teleport { to, seamless } => {
                world.player.position = to;
                if seamless {
                    director.recenter_seamless(&*world, &self.screen);
                } else {
                    director.set_position(to, false);
                }
            }
            Action::MoveEvent { event_id, to } => {
                let event = world
                    .events
                    .get_mut(&event_id)
                    .ok_or(DirectorError::UnknownEvent(event_id))?;
                event.position = to;
            }
            Action::DeactivateEvent { event_id } => {
                let event = world
                    .events
                    .get_mut(&event_id)
                    .ok_or(DirectorError::UnknownEvent(event_id))?;
                event.active = false;
            }
            Action::Cutscene { running } => world.event_running = running,
            Action::Tween {
                to,
                easing,
                duration,
            } => director.start_tween_from_camera(&*world, &self.screen, to, easing, duration),
            Action::TweenToEvent {
                event_id,
                easing,
                duration,
            } => director.start_tween_to_event(&*world, &self.screen, event_id, easing, duration)?,
            Action::TweenToAnchor {
                id,
                easing,
                duration,
            } => director.start_tween_to_anchor(&*world, &self.screen, id, easing, duration)?,
            Action::TweenToPlayer { easing, duration } => {
                director.start_tween_to_player(&*world, &self.screen, easing, duration);
            }
            Action::FinishTween => director.finish_tween(),
            Action::Scroll {
                direction,
                distance,
                speed,
            } => director.start_scroll(direction, distance, speed),
            Action::OffsetMove { delta, duration } => director.start_offset_move(delta, duration),
            Action::AddFixedAnchor {
                id,
                position,
                distance,
            } => director.add_fixed_anchor(id, position, distance)?,
            Action::RemoveAnchor { id } => director.remove_anchor(id)?,
            Action::ClearAnchors => director.clear_anchors(),
            Action::Lookahead { enabled } => director.set_use_lookahead(enabled),
            Action::FixedCamera { enabled } => world.preferences.use_fixed_camera = enabled,
            Action::ForceEventMode { enabled } => director.set_force_event_mode(enabled),
            Action::ResetCamera => director.reset_to_defaults(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(json: &str) -> Scene {
        Scene::from_json_str(json).unwrap()
    }

    #[test]
    fn test_demo_runs_to_completion() {
        let demo = Scene::demo().unwrap();
        let frames = demo.frames;
        let mut sim = Simulation::new(demo, CameraConfig::default());
        let records = sim.run(frames);

        assert_eq!(records.len() as u64, frames);
        assert!(records.iter().any(|r| r.tweening));
        assert!(records.iter().any(|r| r.active_anchors > 1));
        assert!(records.iter().all(|r| r.display.x.is_finite() && r.display.y.is_finite()));
    }

    #[test]
    fn test_idle_player_is_centered() {
        let mut sim = Simulation::new(
            scene(r#"{ "player": { "x": 20.0, "y": 15.0 } }"#),
            CameraConfig::default(),
        );
        let record = sim.step();
        assert_eq!(record.focus, Point::new(20.0, 15.0));
        assert_eq!(record.active_anchors, 1);
    }

    #[test]
    fn test_map_note_anchor_pulls_camera() {
        let json = r#"{
            "player": { "x": 10.0, "y": 10.0 },
            "map_note": "DV_Anchor[1,4,3]",
            "events": [ { "id": 4, "position": { "x": 12.0, "y": 10.0 } } ]
        }"#;
        let mut sim = Simulation::new(scene(json), CameraConfig::default());
        assert!(sim.director().anchors().contains(1));

        let records = sim.run(200);
        let last = records.last().unwrap();
        assert_eq!(last.active_anchors, 2);
        assert!((last.focus.x - 11.0).abs() <= 1.0 / 48.0 + 1e-9);
    }

    #[test]
    fn test_scripted_tween_reaches_event() {
        let json = r#"{
            "player": { "x": 10.0, "y": 10.0 },
            "events": [ { "id": 2, "position": { "x": 16.0, "y": 12.0 } } ],
            "script": [
                { "frame": 1, "action": "cutscene", "running": true },
                { "frame": 2, "action": "tween_to_event", "event_id": 2,
                  "easing": "EaseInOutCubic", "duration": 20 }
            ]
        }"#;
        let mut sim = Simulation::new(scene(json), CameraConfig::default());
        let records = sim.run(40);
        let last = records.last().unwrap();
        assert!(last.tweening);
        assert_eq!(last.focus, Point::new(16.0, 12.0));
    }

    #[test]
    fn test_rejected_cue_does_not_stop_the_run() {
        let json = r#"{
            "script": [
                { "frame": 1, "action": "remove_anchor", "id": 0 },
                { "frame": 1, "action": "tween_to_anchor", "id": 9, "duration": 10 },
                { "frame": 2, "action": "move_event", "event_id": 1, "to": { "x": 0.0, "y": 0.0 } }
            ]
        }"#;
        let mut sim = Simulation::new(scene(json), CameraConfig::default());
        let records = sim.run(3);
        assert!(records.iter().all(|r| !r.tweening));
        assert_eq!(sim.director().anchors().len(), 1);
    }

    #[test]
    fn test_seamless_teleport_keeps_framing() {
        let json = r#"{
            "player": { "x": 10.0, "y": 10.0 },
            "script": [
                { "frame": 3, "action": "teleport", "to": { "x": 40.0, "y": 20.0 }, "seamless": true }
            ]
        }"#;
        let mut sim = Simulation::new(scene(json), CameraConfig::default());
        let records = sim.run(3);
        assert_eq!(records[2].focus, Point::new(40.0, 20.0));
    }

    #[test]
    fn test_scroll_cue_moves_view() {
        let json = r#"{
            "player": { "x": 10.0, "y": 10.0 },
            "script": [
                { "frame": 1, "action": "scroll", "direction": "down", "distance": 3.0, "speed": 6.0 }
            ]
        }"#;
        let mut sim = Simulation::new(scene(json), CameraConfig::default());
        let records = sim.run(40);
        assert!(records[0].scrolling);
        let last = records.last().unwrap();
        assert!(!last.scrolling);
        assert_eq!(last.focus, Point::new(10.0, 13.0));
        assert_eq!(sim.world().player.position, Point::new(10.0, 10.0));
    }
}
