//! Anchor registry and center-of-mass computation.
//!
//! Anchors are the points of interest the camera frames. Slot 0 always holds
//! the player; other slots are filled from map/event notes or by script and
//! are addressed by arbitrary integer ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::host::{EntityState, EventId, ObjectKey, Stage};
use crate::point::Point;

/// Anchor slot id, unique within the active map.
pub type AnchorId = u32;

/// Slot reserved for the player.
pub const PLAYER_ANCHOR: AnchorId = 0;

/// Activation distance used when none (or a non-positive one) is given.
pub const DEFAULT_ACTIVE_DISTANCE: f64 = 1.0;

/// How the player is tested against an anchor's activation region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Square region: both axes within `±distance`.
    #[default]
    Aabb,
    /// Circular region: Euclidean distance `<= distance`.
    Radial,
}

/// What an anchor follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorSource {
    /// A map event looked up by id every frame.
    MapEvent { event_id: EventId },
    /// A live entity handle owned by the host.
    Object(ObjectKey),
    /// An immutable world coordinate.
    Fixed(Point),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub source: AnchorSource,
    pub active_distance: f64,
}

impl Anchor {
    /// Creates an anchor; a non-positive distance falls back to the default.
    pub fn new(source: AnchorSource, active_distance: Option<f64>) -> Self {
        let active_distance = match active_distance {
            Some(d) if d > 0.0 => d,
            _ => DEFAULT_ACTIVE_DISTANCE,
        };
        Self {
            source,
            active_distance,
        }
    }

    /// The always-present player anchor. It has no activation region.
    pub fn player() -> Self {
        Self {
            source: AnchorSource::Object(ObjectKey::Player),
            active_distance: 0.0,
        }
    }

    /// Resolves the anchor against the live world.
    ///
    /// Returns `None` when the followed entity no longer exists.
    pub fn resolve<S: Stage + ?Sized>(&self, stage: &S) -> Option<EntityState> {
        match self.source {
            AnchorSource::MapEvent { event_id } => stage.event(event_id),
            AnchorSource::Object(key) => stage.object(key),
            AnchorSource::Fixed(position) => Some(EntityState::active(position)),
        }
    }
}

/// Result of a center-of-mass pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorCenter {
    pub position: Point,
    /// Number of anchors included; always at least 1.
    pub active_count: usize,
}

/// Tests whether `reference` lies inside an anchor's activation region.
pub fn is_within_active_range(
    anchor_position: Point,
    active_distance: f64,
    reference: Point,
    mode: ActivationMode,
) -> bool {
    if active_distance.is_nan() || active_distance <= 0.0 {
        return false;
    }

    match mode {
        ActivationMode::Aabb => {
            let d = active_distance;
            (reference.x >= anchor_position.x - d && reference.x <= anchor_position.x + d)
                && (reference.y >= anchor_position.y - d && reference.y <= anchor_position.y + d)
        }
        ActivationMode::Radial => anchor_position.distance(reference) <= active_distance,
    }
}

/// Sparse id → anchor mapping, iterated in ascending slot order.
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    anchors: BTreeMap<AnchorId, Anchor>,
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorRegistry {
    /// Creates a registry holding only the player anchor.
    pub fn new() -> Self {
        let mut anchors = BTreeMap::new();
        anchors.insert(PLAYER_ANCHOR, Anchor::player());
        Self { anchors }
    }

    /// Registers `anchor` at `id`, replacing whatever was there.
    pub fn add(&mut self, id: AnchorId, anchor: Anchor) {
        if self.anchors.insert(id, anchor).is_some() {
            tracing::debug!("[anchor] Replaced anchor {}", id);
        }
    }

    /// Clears slot `id`. Returns the removed anchor, if any.
    ///
    /// Callers must never remove [`PLAYER_ANCHOR`].
    pub fn remove(&mut self, id: AnchorId) -> Option<Anchor> {
        self.anchors.remove(&id)
    }

    /// Clears every slot except the player's.
    pub fn clear_all(&mut self) {
        self.anchors.retain(|id, _| *id == PLAYER_ANCHOR);
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(&id)
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        self.anchors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors.iter().map(|(id, anchor)| (*id, anchor))
    }

    /// Computes the mean position of the active anchors.
    ///
    /// `reference` is the player's live position: it is the fallback when no
    /// anchor can be resolved and the point tested against activation
    /// regions. The first surviving anchor is always included.
    pub fn compute_center<S: Stage + ?Sized>(
        &self,
        stage: &S,
        reference: Point,
        mode: ActivationMode,
    ) -> AnchorCenter {
        let fallback = AnchorCenter {
            position: reference,
            active_count: 1,
        };

        let mut iter = self.anchors.values();
        let (Some(first), None) = (iter.next(), iter.next()) else {
            return self.compute_multi_center(stage, reference, mode).unwrap_or(fallback);
        };

        match first.resolve(stage) {
            Some(entity) => AnchorCenter {
                position: entity.position,
                active_count: 1,
            },
            None => fallback,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute_multi_center<S: Stage + ?Sized>(
        &self,
        stage: &S,
        reference: Point,
        mode: ActivationMode,
    ) -> Option<AnchorCenter> {
        let mut sum = Point::ZERO;
        let mut count = 0usize;

        for (id, anchor) in &self.anchors {
            let Some(entity) = anchor.resolve(stage) else {
                tracing::trace!("[anchor] Anchor {} target is gone", id);
                continue;
            };
            if !entity.active {
                continue;
            }
            if count != 0
                && !is_within_active_range(entity.position, anchor.active_distance, reference, mode)
            {
                continue;
            }

            sum += entity.position;
            count += 1;
        }

        (count > 0).then(|| AnchorCenter {
            position: sum * (1.0 / count as f64),
            active_count: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestStage;

    fn fixed(x: f64, y: f64, distance: f64) -> Anchor {
        Anchor::new(AnchorSource::Fixed(Point::new(x, y)), Some(distance))
    }

    #[test]
    fn test_registry_starts_with_player() {
        let registry = AnchorRegistry::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(PLAYER_ANCHOR), Some(&Anchor::player()));
    }

    #[test]
    fn test_default_active_distance() {
        let anchor = Anchor::new(AnchorSource::Fixed(Point::ZERO), None);
        assert!((anchor.active_distance - 1.0).abs() < f64::EPSILON);
        let anchor = Anchor::new(AnchorSource::Fixed(Point::ZERO), Some(-3.0));
        assert!((anchor.active_distance - 1.0).abs() < f64::EPSILON);
        let anchor = Anchor::new(AnchorSource::Fixed(Point::ZERO), Some(4.0));
        assert!((anchor.active_distance - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_anchor_is_player_position() {
        let stage = TestStage::at(3.5, 7.25);
        let registry = AnchorRegistry::new();
        let center = registry.compute_center(&stage, stage.player.position, ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(3.5, 7.25));
        assert_eq!(center.active_count, 1);
    }

    #[test]
    fn test_empty_registry_falls_back_to_reference() {
        let stage = TestStage::at(2.0, 2.0);
        let mut registry = AnchorRegistry::new();
        registry.remove(PLAYER_ANCHOR);
        let center = registry.compute_center(&stage, Point::new(9.0, 1.0), ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(9.0, 1.0));
        assert_eq!(center.active_count, 1);
    }

    #[test]
    fn test_in_range_anchor_is_averaged() {
        let stage = TestStage::at(10.0, 10.0);
        let mut registry = AnchorRegistry::new();
        registry.add(1, fixed(12.0, 10.0, 3.0));

        let center = registry.compute_center(&stage, stage.player.position, ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(11.0, 10.0));
        assert_eq!(center.active_count, 2);
    }

    #[test]
    fn test_out_of_range_anchor_retargets_to_player() {
        let stage = TestStage::at(10.0, 10.0);
        let mut registry = AnchorRegistry::new();
        registry.add(1, fixed(20.0, 10.0, 3.0));
        registry.add(2, fixed(10.0, 30.0, 3.0));

        let center = registry.compute_center(&stage, stage.player.position, ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(10.0, 10.0));
        assert_eq!(center.active_count, 1);
    }

    #[test]
    fn test_first_surviving_anchor_is_unconditional() {
        let mut stage = TestStage::at(0.0, 0.0);
        stage.add_event(5, Point::new(50.0, 50.0));
        let mut registry = AnchorRegistry::new();
        registry.remove(PLAYER_ANCHOR);
        registry.add(3, Anchor::new(AnchorSource::MapEvent { event_id: 5 }, Some(1.0)));
        registry.add(4, fixed(100.0, 100.0, 1.0));

        let center = registry.compute_center(&stage, stage.player.position, ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(50.0, 50.0));
        assert_eq!(center.active_count, 1);
    }

    #[test]
    fn test_deactivated_and_missing_events_are_skipped() {
        let mut stage = TestStage::at(10.0, 10.0);
        stage.add_event(1, Point::new(10.0, 11.0));
        stage.deactivate_event(1);
        let mut registry = AnchorRegistry::new();
        registry.add(1, Anchor::new(AnchorSource::MapEvent { event_id: 1 }, Some(5.0)));
        registry.add(2, Anchor::new(AnchorSource::MapEvent { event_id: 99 }, Some(5.0)));
        registry.add(3, Anchor::new(AnchorSource::Object(ObjectKey::Entity(7)), Some(5.0)));

        let center = registry.compute_center(&stage, stage.player.position, ActivationMode::Aabb);
        assert_eq!(center.position, Point::new(10.0, 10.0));
        assert_eq!(center.active_count, 1);
    }

    #[test]
    fn test_clear_all_keeps_player() {
        let mut registry = AnchorRegistry::new();
        registry.add(1, fixed(1.0, 1.0, 1.0));
        registry.add(9, fixed(2.0, 2.0, 1.0));
        registry.clear_all();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(PLAYER_ANCHOR));
    }

    #[test]
    fn test_add_overwrites_slot() {
        let mut registry = AnchorRegistry::new();
        registry.add(1, fixed(1.0, 1.0, 1.0));
        registry.add(1, fixed(5.0, 5.0, 2.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1), Some(&fixed(5.0, 5.0, 2.0)));
    }

    #[test]
    fn test_activation_modes() {
        let anchor = Point::new(0.0, 0.0);
        // Corner of the square but outside the circle.
        let corner = Point::new(2.0, 2.0);
        assert!(is_within_active_range(anchor, 2.0, corner, ActivationMode::Aabb));
        assert!(!is_within_active_range(anchor, 2.0, corner, ActivationMode::Radial));

        let edge = Point::new(2.0, 0.0);
        assert!(is_within_active_range(anchor, 2.0, edge, ActivationMode::Radial));
        assert!(!is_within_active_range(anchor, 0.0, anchor, ActivationMode::Aabb));
    }
}
