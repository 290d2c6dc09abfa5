//! Per-frame camera pipeline.
//!
//! Each `update` runs a fixed sequence:
//! 1. recompute the anchor center and active count
//! 2. advance the scripted offset animation
//! 3. cancel the tween when a cutscene ends
//! 4. restart the anchor transition when the active count changed
//! 5. position the camera: tween if one is active, otherwise anchors + look-ahead
//! 6. blend from the previous position while the anchor transition runs
//! 7. add the offset, center on screen, snap to the pixel grid and commit

use crate::anchor::{Anchor, AnchorId, AnchorRegistry, AnchorSource, PLAYER_ANCHOR};
use crate::config::CameraConfig;
use crate::easing::{Easing, EasingType};
use crate::error::DirectorError;
use crate::host::{Direction, EventId, ObjectKey, Stage, Viewport};
use crate::lookahead::LookaheadInput;
use crate::note::parse_note;
use crate::point::{LookaheadOffset, Point};
use crate::state::{CameraSnapshot, CameraState};
use crate::tween::Tween;

/// Map identifier, used to detect map transfers.
pub type MapId = u32;

/// The camera controller: anchor registry, state and configuration.
#[derive(Debug, Clone)]
pub struct Director {
    config: CameraConfig,
    anchors: AnchorRegistry,
    state: CameraState,
    map_id: Option<MapId>,
}

impl Default for Director {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Director {
    pub fn new(config: CameraConfig) -> Self {
        let state = CameraState::new(&config);
        Self {
            config,
            anchors: AnchorRegistry::new(),
            state,
            map_id: None,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn map_id(&self) -> Option<MapId> {
        self.map_id
    }

    /// Resets the camera for a new game and snaps it onto the player.
    pub fn initialize<S: Stage + ?Sized>(&mut self, stage: &S) {
        self.state = CameraState::new(&self.config);
        self.anchors = AnchorRegistry::new();
        self.map_id = None;
        self.snap_to_player(stage);
    }

    /// Restores a save-file snapshot. Anchors are cleared; the host re-reads
    /// them from map and event notes.
    pub fn restore<S: Stage + ?Sized>(&mut self, snapshot: &CameraSnapshot, stage: &S) {
        self.state = CameraState::new(&self.config);
        self.anchors.clear_all();
        self.map_id = None;
        self.snap_to_player(stage);

        self.state.apply_snapshot(snapshot);
        self.state.applied_offset = self.state.offset;
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        self.state.snapshot()
    }

    /// Restores offset and look-ahead settings to their configured values.
    pub fn reset_to_defaults(&mut self) {
        self.state.offset = self.config.default_offset;
        self.state.lookahead_magnitude = self.config.lookahead_magnitude;
        self.state.use_lookahead = self.config.use_lookahead;
    }

    pub fn set_use_lookahead(&mut self, enabled: bool) {
        self.state.use_lookahead = enabled;
    }

    pub fn set_lookahead_magnitude(&mut self, magnitude: LookaheadOffset) {
        self.state.lookahead_magnitude = magnitude;
    }

    /// Forces cutscene behavior regardless of the host's event flag.
    pub fn set_force_event_mode(&mut self, forced: bool) {
        self.state.force_event_mode = forced;
    }

    pub fn is_scrolling(&self) -> bool {
        self.state.is_scrolling()
    }

    // ---------------------------------------------------------------------
    // Frame pipeline
    // ---------------------------------------------------------------------

    /// Advances the camera one frame and commits the new display position.
    ///
    /// Returns the committed (top-left, pixel-aligned) display position.
    pub fn update<S, V>(&mut self, stage: &S, viewport: &mut V) -> Point
    where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let event_running = self.state.force_event_mode || stage.is_event_running();
        let player = stage.player();

        let previous_count = self.state.active_count;
        let center = self
            .anchors
            .compute_center(stage, player.position, self.config.activation_mode);
        self.state.anchor_center = center.position;
        self.state.active_count = center.active_count;
        let anchor_changed = previous_count != center.active_count;
        let transition_max = self.transition_max(center.active_count);

        let offset = self.advance_offset();

        if self.state.event_running != event_running {
            self.state.event_running = event_running;
            if !event_running && self.state.tween.take().is_some() {
                tracing::debug!("[camera] Cutscene ended, tween cancelled");
            }
        }

        if anchor_changed {
            if self.state.transition.is_active() {
                self.state.current = self.displayed_focus(viewport);
            }
            self.state.capture_previous_position();
            self.state.transition.restart(transition_max);
            self.state.lookahead.reset_timers();
            tracing::debug!(
                "[camera] Active anchors {} -> {}, transition {} frames",
                previous_count,
                center.active_count,
                transition_max
            );
        }

        if let Some(tween) = self.state.tween {
            self.advance_tween(&tween, stage.frame_count(), event_running);
        } else {
            self.follow_anchors(stage, center.position, event_running);
        }

        let focus = self.blend_transition();

        self.state.applied_offset = offset;
        let position = quantize(focus + offset - viewport.half_extent(), viewport.tile_size());
        tracing::trace!("[camera] display ({:.4}, {:.4})", position.x, position.y);
        viewport.set_display_position(position);
        position
    }

    /// Transition length for the given active count; settling onto a single
    /// anchor takes half as long.
    fn transition_max(&self, active_count: usize) -> u32 {
        let max = self.config.anchor_transition_duration;
        if active_count == 1 { max / 2 } else { max }
    }

    /// Returns the offset to display this frame.
    fn advance_offset(&mut self) -> Point {
        let state = &mut self.state;
        if state.offset_duration == 0 {
            return state.offset;
        }

        let t = f64::from(state.offset_time) / f64::from(state.offset_duration);
        let offset = state.offset.lerp(state.target_offset, t);

        state.offset_time += 1;
        if state.offset_time >= state.offset_duration {
            state.offset = state.target_offset;
            state.offset_time = 0;
            state.offset_duration = 0;
        }

        offset
    }

    fn advance_tween(&mut self, tween: &Tween, frame: u64, event_running: bool) {
        if !tween.is_finished(frame) {
            self.state.current = tween.sample(frame);
            return;
        }

        self.state.current = tween.to;
        if !event_running {
            self.state.tween = None;
            tracing::debug!("[camera] Tween finished");
        }
    }

    fn follow_anchors<S: Stage + ?Sized>(&mut self, stage: &S, center: Point, event_running: bool) {
        let player = stage.player();
        let eligible = self.state.use_lookahead
            && self.state.active_count == 1
            && !event_running
            && player.moving;

        let input = LookaheadInput {
            eligible,
            direction: player.direction,
            magnitude: self.state.lookahead_magnitude,
            fixed_camera: stage.preferences().use_fixed_camera,
            fast_modifier: stage.is_fast_modifier_held(),
        };
        let step = self.state.lookahead.step(&input, &self.config);

        let target = center + step.offset;
        self.state.current = self.state.current.approach(target, step.follow_divisor);
    }

    fn blend_transition(&mut self) -> Point {
        let transition = &mut self.state.transition;
        if !transition.is_active() {
            return self.state.current;
        }
        if transition.max == 0 {
            transition.clear();
            return self.state.current;
        }

        let remaining = f64::from(transition.remaining) / f64::from(transition.max);
        let t = 1.0 - EasingType::Linear.apply(remaining);
        transition.remaining -= 1;
        self.state.previous.lerp(self.state.current, t)
    }

    /// The world point the viewport is showing, without the offset.
    fn displayed_focus<V: Viewport + ?Sized>(&self, viewport: &V) -> Point {
        viewport.display_position() + viewport.half_extent() - self.state.applied_offset
    }

    // ---------------------------------------------------------------------
    // Positioning
    // ---------------------------------------------------------------------

    /// Hard-snaps the camera to `position` with no transition lag.
    ///
    /// Clears transitions, look-ahead and any tween. Unless `keep_offset` is
    /// set, the persistent offset and any offset animation are cleared too.
    pub fn set_position(&mut self, position: Point, keep_offset: bool) {
        let state = &mut self.state;
        state.previous = position;
        state.current = position;
        state.transition.clear();
        state.lookahead.reset();
        state.tween = None;

        if keep_offset {
            return;
        }

        state.offset = Point::ZERO;
        state.target_offset = Point::ZERO;
        state.applied_offset = Point::ZERO;
        state.offset_time = 0;
        state.offset_duration = 0;
    }

    /// Re-targets after a seamless player relocation, keeping the camera's
    /// displacement from the anchor center.
    pub fn recenter_seamless<S, V>(&mut self, stage: &S, viewport: &V)
    where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let displacement = self.displayed_focus(viewport) - self.state.anchor_center;

        let center = self.anchors.compute_center(
            stage,
            stage.player().position,
            self.config.activation_mode,
        );
        self.state.anchor_center = center.position;
        self.state.active_count = center.active_count;

        self.state.previous = center.position + displacement;
        self.state.current = center.position + displacement;
    }

    fn snap_to_player<S: Stage + ?Sized>(&mut self, stage: &S) {
        let player = stage.player();
        self.set_position(player.position, true);

        let center = self
            .anchors
            .compute_center(stage, player.position, self.config.activation_mode);
        self.state.anchor_center = center.position;
        self.state.active_count = center.active_count;
        self.state.applied_offset = self.state.offset;
    }

    // ---------------------------------------------------------------------
    // Tweens
    // ---------------------------------------------------------------------

    /// Starts a cinematic shot from `from` to `to` over `duration` frames.
    ///
    /// The tween overrides anchor tracking until it finishes (and the
    /// cutscene, if any, has ended) or [`finish_tween`](Self::finish_tween)
    /// is called.
    pub fn start_tween<S: Stage + ?Sized>(
        &mut self,
        stage: &S,
        from: Point,
        to: Point,
        easing: impl Into<Easing>,
        duration: u32,
    ) {
        self.set_position(from, true);

        let tween = Tween::new(from, to, easing.into(), stage.frame_count(), duration);
        tracing::debug!(
            "[camera] Tween ({:.2}, {:.2}) -> ({:.2}, {:.2}) over {} frames ({:?})",
            from.x,
            from.y,
            to.x,
            to.y,
            duration,
            tween.easing
        );
        self.state.tween = Some(tween);
    }

    /// Like [`start_tween`](Self::start_tween) with the curve given by name
    /// (`"EaseOutCubic"`). An unknown name starts nothing.
    pub fn start_tween_named<S: Stage + ?Sized>(
        &mut self,
        stage: &S,
        from: Point,
        to: Point,
        easing: &str,
        duration: u32,
    ) -> Result<(), DirectorError> {
        let easing = Easing::try_from(easing).inspect_err(|e| {
            tracing::warn!("[camera] {}", e);
        })?;
        self.start_tween(stage, from, to, easing, duration);
        Ok(())
    }

    /// Starts a tween from wherever the camera is currently looking.
    pub fn start_tween_from_camera<S, V>(
        &mut self,
        stage: &S,
        viewport: &V,
        to: Point,
        easing: impl Into<Easing>,
        duration: u32,
    ) where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let from = self.displayed_focus(viewport);
        self.start_tween(stage, from, to, easing, duration);
    }

    pub fn start_tween_to_anchor<S, V>(
        &mut self,
        stage: &S,
        viewport: &V,
        id: AnchorId,
        easing: impl Into<Easing>,
        duration: u32,
    ) -> Result<(), DirectorError>
    where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let Some(target) = self.anchors.get(id).and_then(|anchor| anchor.resolve(stage)) else {
            tracing::warn!("[camera] Anchor {} does not exist", id);
            return Err(DirectorError::UnknownAnchor(id));
        };

        self.start_tween_from_camera(stage, viewport, target.position, easing, duration);
        Ok(())
    }

    pub fn start_tween_to_event<S, V>(
        &mut self,
        stage: &S,
        viewport: &V,
        event_id: EventId,
        easing: impl Into<Easing>,
        duration: u32,
    ) -> Result<(), DirectorError>
    where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let Some(event) = stage.event(event_id) else {
            tracing::warn!("[camera] Event {} does not exist", event_id);
            return Err(DirectorError::UnknownEvent(event_id));
        };

        self.start_tween_from_camera(stage, viewport, event.position, easing, duration);
        Ok(())
    }

    pub fn start_tween_to_player<S, V>(
        &mut self,
        stage: &S,
        viewport: &V,
        easing: impl Into<Easing>,
        duration: u32,
    ) where
        S: Stage + ?Sized,
        V: Viewport + ?Sized,
    {
        let to = stage.player().position;
        self.start_tween_from_camera(stage, viewport, to, easing, duration);
    }

    /// Ends the current tween; anchor tracking resumes next frame.
    pub fn finish_tween(&mut self) {
        if self.state.tween.take().is_some() {
            tracing::debug!("[camera] Tween finished by request");
        }
    }

    pub fn is_tweening(&self) -> bool {
        self.state.tween.is_some()
    }

    // ---------------------------------------------------------------------
    // Offset scrolls
    // ---------------------------------------------------------------------

    /// Scrolls the persistent offset by `delta` over `duration` frames.
    ///
    /// A zero duration applies the move instantly. A scroll started while
    /// another is running first completes the running one.
    pub fn start_offset_move(&mut self, delta: Point, duration: u32) {
        let state = &mut self.state;

        if duration == 0 {
            state.offset += delta;
            state.target_offset = state.offset;
            state.offset_time = 0;
            state.offset_duration = 0;
            return;
        }

        if state.offset_duration > 0 {
            state.offset = state.target_offset;
        }

        state.target_offset = state.offset + delta;
        state.offset_time = 0;
        state.offset_duration = duration;
    }

    /// Host "scroll map" command: `distance` tiles in `direction` at one of
    /// the host's discrete speeds.
    pub fn start_scroll(&mut self, direction: Direction, distance: f64, speed: f64) {
        let delta = direction.unit() * distance;
        let duration = self.config.scroll_duration(distance, speed);
        self.start_offset_move(delta, duration);
    }

    // ---------------------------------------------------------------------
    // Anchors
    // ---------------------------------------------------------------------

    pub fn add_map_event_anchor<S: Stage + ?Sized>(
        &mut self,
        stage: &S,
        id: AnchorId,
        event_id: EventId,
        active_distance: Option<f64>,
    ) -> Result<(), DirectorError> {
        if stage.event(event_id).is_none() {
            tracing::warn!("[camera] Event {} does not exist", event_id);
            return Err(DirectorError::UnknownEvent(event_id));
        }
        self.add_anchor(
            id,
            Anchor::new(AnchorSource::MapEvent { event_id }, active_distance),
        )
    }

    pub fn add_object_anchor(
        &mut self,
        id: AnchorId,
        object: ObjectKey,
        active_distance: Option<f64>,
    ) -> Result<(), DirectorError> {
        self.add_anchor(id, Anchor::new(AnchorSource::Object(object), active_distance))
    }

    pub fn add_fixed_anchor(
        &mut self,
        id: AnchorId,
        position: Point,
        active_distance: Option<f64>,
    ) -> Result<(), DirectorError> {
        self.add_anchor(id, Anchor::new(AnchorSource::Fixed(position), active_distance))
    }

    fn add_anchor(&mut self, id: AnchorId, anchor: Anchor) -> Result<(), DirectorError> {
        if id == PLAYER_ANCHOR {
            tracing::warn!("[camera] Anchor {} is reserved for the player", id);
            return Err(DirectorError::ReservedAnchor(id));
        }
        tracing::debug!("[camera] Anchor {} = {:?}", id, anchor.source);
        self.anchors.add(id, anchor);
        Ok(())
    }

    pub fn remove_anchor(&mut self, id: AnchorId) -> Result<(), DirectorError> {
        if id == PLAYER_ANCHOR {
            tracing::warn!("[camera] Anchor {} is reserved for the player", id);
            return Err(DirectorError::ReservedAnchor(id));
        }
        if self.anchors.remove(id).is_none() {
            tracing::warn!("[camera] Anchor {} does not exist", id);
            return Err(DirectorError::UnknownAnchor(id));
        }
        Ok(())
    }

    /// Removes every anchor except the player's.
    pub fn clear_anchors(&mut self) {
        self.anchors.clear_all();
    }

    /// Registers every anchor declared in `note`. Returns how many were added.
    ///
    /// Declarations that reference missing events are skipped with a warning.
    pub fn apply_note<S: Stage + ?Sized>(
        &mut self,
        stage: &S,
        note: &str,
        bound: Option<ObjectKey>,
    ) -> usize {
        let mut added = 0;
        for decl in parse_note(note, bound) {
            let result = match decl.source {
                AnchorSource::MapEvent { event_id } => {
                    self.add_map_event_anchor(stage, decl.id, event_id, decl.active_distance)
                }
                _ => self.add_anchor(decl.id, decl.into_anchor()),
            };
            if result.is_ok() {
                added += 1;
            }
        }
        added
    }

    /// Map setup hook: clears anchors on a map transfer, then reads the map
    /// note.
    pub fn on_map_setup<S: Stage + ?Sized>(&mut self, stage: &S, map_id: MapId, note: &str) -> usize {
        if self.map_id != Some(map_id) {
            tracing::debug!("[camera] Map {:?} -> {}, clearing anchors", self.map_id, map_id);
            self.clear_anchors();
            self.map_id = Some(map_id);
        }
        self.apply_note(stage, note, None)
    }

    /// Event creation hook: reads anchors declared on the event itself.
    pub fn on_event_created<S: Stage + ?Sized>(
        &mut self,
        stage: &S,
        event_id: EventId,
        note: &str,
    ) -> usize {
        self.apply_note(stage, note, Some(ObjectKey::Event(event_id)))
    }
}

/// Rounds `position` up to the next whole screen pixel.
fn quantize(position: Point, (tile_w, tile_h): (f64, f64)) -> Point {
    Point::new(
        (position.x * tile_w).ceil() / tile_w,
        (position.y * tile_h).ceil() / tile_h,
    )
}
