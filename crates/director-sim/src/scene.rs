//! Scene files: a map, its events and a frame-indexed script.

use std::path::Path;

use anyhow::{Context, Result};
use director_core::{AnchorId, Direction, EasingType, EventId, MapId, Point};
use serde::{Deserialize, Serialize};

/// Built-in demo, used when no scene file is given.
pub const DEMO_SCENE: &str = include_str!("../scenes/demo.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub name: String,
    pub map_id: MapId,
    /// Map note; may carry `DV_Anchor[...]` tags.
    pub map_note: String,
    /// Screen size in pixels.
    pub screen: (f64, f64),
    /// Tile size in pixels.
    pub tile: (f64, f64),
    pub player: Point,
    /// Tiles the player covers per frame while walking.
    pub walk_speed: f64,
    pub events: Vec<SceneEvent>,
    pub frames: u64,
    pub script: Vec<Cue>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: String::from("untitled"),
            map_id: 1,
            map_note: String::new(),
            screen: (816.0, 624.0),
            tile: (48.0, 48.0),
            player: Point::ZERO,
            walk_speed: 1.0 / 16.0,
            events: Vec::new(),
            frames: 120,
            script: Vec::new(),
        }
    }
}

impl Scene {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut scene: Self = serde_json::from_str(json).context("invalid scene JSON")?;
        scene.script.sort_by_key(|cue| cue.frame);
        Ok(scene)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in scene {}", path.display()))
    }

    pub fn demo() -> Result<Self> {
        Self::from_json_str(DEMO_SCENE)
    }

    /// Cues scheduled for `frame`, in file order.
    pub fn cues_at(&self, frame: u64) -> impl Iterator<Item = &Cue> {
        self.script.iter().filter(move |cue| cue.frame == frame)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEvent {
    pub id: EventId,
    pub position: Point,
    /// Event note; bound `DV_Anchor[...]` tags follow this event.
    #[serde(default)]
    pub note: String,
}

/// One scripted action at a given frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    pub frame: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Walk {
        direction: Direction,
    },
    Stop,
    Dash {
        held: bool,
    },
    Teleport {
        to: Point,
        #[serde(default)]
        seamless: bool,
    },
    MoveEvent {
        event_id: EventId,
        to: Point,
    },
    DeactivateEvent {
        event_id: EventId,
    },
    Cutscene {
        running: bool,
    },
    Tween {
        to: Point,
        #[serde(default)]
        easing: EasingType,
        duration: u32,
    },
    TweenToEvent {
        event_id: EventId,
        #[serde(default)]
        easing: EasingType,
        duration: u32,
    },
    TweenToAnchor {
        id: AnchorId,
        #[serde(default)]
        easing: EasingType,
        duration: u32,
    },
    TweenToPlayer {
        #[serde(default)]
        easing: EasingType,
        duration: u32,
    },
    FinishTween,
    Scroll {
        direction: Direction,
        distance: f64,
        speed: f64,
    },
    OffsetMove {
        delta: Point,
        #[serde(default)]
        duration: u32,
    },
    AddFixedAnchor {
        id: AnchorId,
        position: Point,
        #[serde(default)]
        distance: Option<f64>,
    },
    RemoveAnchor {
        id: AnchorId,
    },
    ClearAnchors,
    Lookahead {
        enabled: bool,
    },
    FixedCamera {
        enabled: bool,
    },
    ForceEventMode {
        enabled: bool,
    },
    ResetCamera,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_parses() {
        let scene = Scene::demo().unwrap();
        assert!(!scene.events.is_empty());
        assert!(scene.map_note.contains("DV_Anchor["));
        assert!(scene.script.windows(2).all(|w| w[0].frame <= w[1].frame));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let scene = Scene::from_json_str(r#"{ "player": { "x": 3.0, "y": 4.0 } }"#).unwrap();
        assert_eq!(scene.player, Point::new(3.0, 4.0));
        assert_eq!(scene.tile, (48.0, 48.0));
        assert!(scene.script.is_empty());
    }

    #[test]
    fn test_actions_are_tagged() {
        let json = r#"{
            "script": [
                { "frame": 9, "action": "stop" },
                { "frame": 2, "action": "walk", "direction": "left" },
                { "frame": 5, "action": "tween_to_event", "event_id": 3,
                  "easing": "EaseOutQuad", "duration": 30 }
            ]
        }"#;
        let scene = Scene::from_json_str(json).unwrap();
        assert_eq!(
            scene.script[0].action,
            Action::Walk {
                direction: Direction::Left
            }
        );
        assert_eq!(
            scene.cues_at(5).next().map(|cue| &cue.action),
            Some(&Action::TweenToEvent {
                event_id: 3,
                easing: EasingType::EaseOutQuad,
                duration: 30
            })
        );
        assert_eq!(scene.cues_at(9).count(), 1);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let json = r#"{ "script": [ { "frame": 1, "action": "explode" } ] }"#;
        assert!(Scene::from_json_str(json).is_err());
    }
}
