//! Per-map indoor overlay controller.
//!
//! Owns the visibility mode, hover and selection slots, the floor toggle
//! control and the deferred layer promotions of one renderer. All mutation
//! happens synchronously inside the public operations; the only deferred work
//! is layer promotion, applied when the host calls [`IndoorController::advance_to`].

use std::time::Duration;

use foundation::math::{LngLat, canonical_f64};
use foundation::time::Time;
use foundation::{FeatureId, FloorId};
use layers::{
    CameraState, FloorLayerIds, FloorSet, LayerId, LayerStyleComputer, VisibilityMode,
    floor_layers, floor_of_room_layer, paint_updates,
};
use runtime::Clock;
use scene::picking::nearest_by_center_of_mass;
use scene::{Feature, FeatureFilter, FeatureRef, FeatureSlot, FeatureState, SelectionState};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IndoorConfig, SelectionPolicy};
use crate::control::{ButtonAction, ButtonControl, ControlNode, floor_buttons};
use crate::error::IndoorError;
use crate::events::{MapEvent, PointerEvent};
use crate::renderer::{
    CameraOptions, Cursor, MapEventKind, Padding, QueryOptions, RendererHandle, Subscription,
};
use crate::reorder::LayerReorderQueue;

/// Result of [`IndoorController::select`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectOutcome {
    Cleared,
    /// Floor focus moved to `floor` and the camera was sent to the feature.
    Located {
        feature: FeatureId,
        floor: FloorId,
        camera: Option<CameraOptions>,
    },
    /// Flag recorded, but the feature is not in the loaded data.
    NotLocated { feature: FeatureId },
}

/// Serializable view of the controller state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub mode: VisibilityMode,
    pub hovered: Option<FeatureId>,
    pub selected: Option<FeatureId>,
    pub floor_for_selection: Option<FloorId>,
    pub farthest_layer: Option<LayerId>,
    pub pending_promotions: usize,
    pub now_ms: u64,
    pub loaded: bool,
}

pub struct IndoorController<R: RendererHandle> {
    config: IndoorConfig,
    floors: FloorSet,
    renderer: R,
    mode: VisibilityMode,
    hover: FeatureSlot,
    selection: SelectionState,
    control: ButtonControl,
    reorder: LayerReorderQueue,
    clock: Clock,
    loaded: bool,
}

impl<R: RendererHandle> IndoorController<R> {
    /// Validates `config`, subscribes to map-wide events and attaches the
    /// floor toggle in AllFloors mode. Style layers are added on `Load`.
    pub fn new(config: IndoorConfig, mut renderer: R) -> Result<Self, IndoorError> {
        let floors = config.validate()?;

        for kind in [MapEventKind::Load, MapEventKind::Zoom, MapEventKind::Pitch] {
            renderer.subscribe(Subscription::map(kind));
        }

        let mode = VisibilityMode::AllFloors;
        let mut control = ButtonControl::new(floor_buttons(&floors, mode));
        control.attach(&mut renderer);

        let reorder = LayerReorderQueue::new(config.promotion_delay(), config.promotion_policy);
        info!(
            "indoor controller ready with {} floors ({:?} promotions)",
            floors.len(),
            config.promotion_policy
        );

        Ok(Self {
            config,
            floors,
            renderer,
            mode,
            hover: FeatureSlot::new(),
            selection: SelectionState::new(),
            control,
            reorder,
            clock: Clock::default(),
            loaded: false,
        })
    }

    pub fn config(&self) -> &IndoorConfig {
        &self.config
    }

    pub fn floors(&self) -> &FloorSet {
        &self.floors
    }

    pub fn mode(&self) -> VisibilityMode {
        self.mode
    }

    pub fn hovered(&self) -> Option<FeatureId> {
        self.hover.get()
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selection.selected()
    }

    pub fn floor_for_selection(&self) -> Option<FloorId> {
        self.selection.floor_for_selection()
    }

    pub fn farthest_layer(&self) -> Option<&LayerId> {
        self.reorder.farthest()
    }

    pub fn pending_promotions(&self) -> usize {
        self.reorder.pending()
    }

    pub fn control(&self) -> Option<&ControlNode> {
        self.control.node()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn now(&self) -> Time {
        self.clock.now()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            mode: self.mode,
            hovered: self.hovered(),
            selected: self.selected(),
            floor_for_selection: self.floor_for_selection(),
            farthest_layer: self.reorder.farthest().cloned(),
            pending_promotions: self.reorder.pending(),
            now_ms: self.clock.now().as_millis(),
            loaded: self.loaded,
        }
    }

    /// Opacity/translate calculator for the current mode and camera.
    pub fn style_computer(&self) -> LayerStyleComputer {
        LayerStyleComputer::new(
            self.mode,
            CameraState::new(self.renderer.zoom(), self.renderer.pitch()),
            self.config.style.dimmed_opacity,
        )
    }

    pub fn handle_event(&mut self, event: MapEvent) -> Result<(), IndoorError> {
        match event {
            MapEvent::Load => self.on_load(),
            MapEvent::Zoom | MapEvent::Pitch => {
                self.hover(None);
                self.refresh()
            }
            MapEvent::Click(pointer) => {
                let Some(floor) = floor_of_room_layer(&pointer.layer) else {
                    debug!("ignoring click on layer {}", pointer.layer);
                    return Ok(());
                };
                self.hover(None);
                if let Some(id) = self.pick(floor, &pointer) {
                    self.select(Some(id))?;
                }
                Ok(())
            }
            MapEvent::MouseMove(pointer) => {
                let Some(floor) = floor_of_room_layer(&pointer.layer) else {
                    return Ok(());
                };
                if !self.mode.admits(floor) {
                    if self.hover.get().is_some() {
                        self.hover(None);
                    }
                    return Ok(());
                }
                if let Some(id) = self.pick(floor, &pointer) {
                    self.hover(Some(id));
                }
                Ok(())
            }
            MapEvent::MouseLeave { layer } => {
                if floor_of_room_layer(&layer).is_some() {
                    self.hover(None);
                }
                Ok(())
            }
        }
    }

    /// Adds the indoor source and every floor's layers. Runs once.
    pub fn on_load(&mut self) -> Result<(), IndoorError> {
        if self.loaded {
            debug!("style already loaded");
            return Ok(());
        }

        self.renderer.add_source(self.config.source.descriptor())?;
        let computer = self.style_computer();
        for floor in self.floors.iter() {
            for layer in floor_layers(
                floor,
                &self.floors,
                &self.config.source,
                &self.config.style,
                computer.paint_of(floor),
            ) {
                self.renderer.add_layer(layer)?;
            }
            let room = FloorLayerIds::for_floor(floor).room;
            for kind in [
                MapEventKind::Click,
                MapEventKind::MouseMove,
                MapEventKind::MouseLeave,
            ] {
                self.renderer
                    .subscribe(Subscription::layer(kind, room.clone()));
            }
        }

        self.reorder
            .reset_anchor(FloorLayerIds::for_floor(self.floors.lowest()).floor_line);
        self.loaded = true;
        info!("indoor style loaded for {} floors", self.floors.len());
        Ok(())
    }

    /// Pushes opacity and translate of every floor to the renderer.
    pub fn refresh(&mut self) -> Result<(), IndoorError> {
        if !self.loaded {
            debug!("refresh before load skipped");
            return Ok(());
        }
        let computer = self.style_computer();
        for floor in self.floors.iter() {
            let ids = FloorLayerIds::for_floor(floor);
            for update in paint_updates(&ids, &self.config.style, computer.paint_of(floor)) {
                self.renderer
                    .set_paint_property(&update.layer, update.property, update.value)?;
            }
        }
        Ok(())
    }

    /// Flips between AllFloors and SingleFloor, rebuilding the button set.
    ///
    /// Entering SingleFloor focuses the remembered floor, or the configured
    /// default when nothing has been remembered yet.
    pub fn toggle(&mut self) -> Result<VisibilityMode, IndoorError> {
        let next = match self.mode {
            VisibilityMode::AllFloors => VisibilityMode::SingleFloor(
                self.selection
                    .floor_for_selection()
                    .unwrap_or(self.config.default_floor),
            ),
            VisibilityMode::SingleFloor(current) => {
                self.selection.remember_floor(current);
                VisibilityMode::AllFloors
            }
        };
        self.enter_mode(next)?;
        Ok(next)
    }

    /// Focuses `floor`. Returns `false` when ignored: in AllFloors mode or
    /// when `floor` is already focused.
    pub fn select_floor(&mut self, floor: FloorId) -> Result<bool, IndoorError> {
        let Some(current) = self.mode.focused() else {
            debug!("select_floor({floor}) ignored while all floors are shown");
            return Ok(false);
        };
        if current == floor {
            debug!("floor {floor} already focused");
            return Ok(false);
        }
        if !self.floors.contains(floor) {
            return Err(IndoorError::UnknownFloor(floor));
        }

        self.control.mark_active_floor(&mut self.renderer, floor)?;
        self.mode = VisibilityMode::SingleFloor(floor);
        info!("focused floor {floor} (was {current})");
        self.refresh()?;
        self.reorder.schedule(self.clock.now(), floor);
        Ok(true)
    }

    /// Moves the hover flag to `id`, or clears it.
    pub fn hover(&mut self, id: Option<FeatureId>) {
        let change = self.hover.replace(id);
        if let Some(previous) = change.cleared {
            let target = self.feature_ref(previous);
            self.renderer
                .set_feature_state(&target, FeatureState::hover(false));
        }
        match change.set {
            Some(next) => {
                let target = self.feature_ref(next);
                self.renderer
                    .set_feature_state(&target, FeatureState::hover(true));
                self.renderer.set_cursor(Cursor::Pointer);
            }
            None => self.renderer.set_cursor(Cursor::Default),
        }
    }

    /// Moves the selection flag to `id`, focusing its floor and easing the
    /// camera to it when the feature is found among the loaded features.
    pub fn select(&mut self, id: Option<FeatureId>) -> Result<SelectOutcome, IndoorError> {
        let located = match id {
            Some(id) => self.locate(id),
            None => None,
        };
        if let Some(id) = id
            && located.is_none()
            && self.config.selection_policy == SelectionPolicy::Strict
        {
            return Err(IndoorError::FeatureNotFound(id));
        }
        // Floor focus can fail; it runs before the slot or any flag changes.
        if let Some((_, floor)) = &located {
            self.focus(*floor)?;
        }

        let change = self.selection.replace(id);
        if let Some(previous) = change.cleared {
            let target = self.feature_ref(previous);
            self.renderer
                .set_feature_state(&target, FeatureState::selection(false));
        }
        let Some(id) = change.set else {
            return Ok(SelectOutcome::Cleared);
        };

        let outcome = match located {
            Some((feature, floor)) => {
                self.selection.remember_floor(floor);
                let camera = self.camera_for(&feature, floor);
                if let Some(options) = camera {
                    self.renderer.ease_to(options);
                }
                info!("selected feature {id} on floor {floor}");
                SelectOutcome::Located {
                    feature: id,
                    floor,
                    camera,
                }
            }
            None => {
                warn!("selected feature {id} is not among the loaded features");
                SelectOutcome::NotLocated { feature: id }
            }
        };

        let target = self.feature_ref(id);
        self.renderer
            .set_feature_state(&target, FeatureState::selection(true));
        Ok(outcome)
    }

    /// Runs the handler bound to `action`.
    pub fn press(&mut self, action: ButtonAction) -> Result<(), IndoorError> {
        match (action, self.mode) {
            (ButtonAction::ShowFloors, VisibilityMode::AllFloors)
            | (ButtonAction::HideFloors, VisibilityMode::SingleFloor(_)) => {
                self.toggle()?;
            }
            (ButtonAction::SelectFloor(floor), _) => {
                self.select_floor(floor)?;
            }
            (action, mode) => debug!("button {action:?} has no effect in {mode:?}"),
        }
        Ok(())
    }

    /// Clicks the `index`-th button of the attached control.
    pub fn click_button(&mut self, index: usize) -> Result<(), IndoorError> {
        let action = self
            .control
            .node()
            .and_then(|node| node.button(index))
            .map(|button| button.action)
            .ok_or_else(|| {
                IndoorError::InvariantViolation(format!("no floor control button at {index}"))
            })?;
        self.press(action)
    }

    /// Moves the controller clock and applies every promotion now due.
    /// Returns the promoted floors in application order.
    pub fn advance_to(&mut self, now: Time) -> Result<Vec<FloorId>, IndoorError> {
        let now = self.clock.advance_to(now);
        Ok(self.reorder.fire_due(now, &mut self.renderer)?)
    }

    /// Like [`Self::advance_to`], relative to the current clock.
    pub fn advance_by(&mut self, delta: Duration) -> Result<Vec<FloorId>, IndoorError> {
        let now = self.clock.advance_by(delta);
        Ok(self.reorder.fire_due(now, &mut self.renderer)?)
    }

    /// Cancels pending promotions and removes the floor control.
    pub fn teardown(&mut self) -> Result<(), IndoorError> {
        let dropped = self.reorder.cancel_all();
        if dropped > 0 {
            debug!("teardown discarded {dropped} pending promotions");
        }
        self.control.detach(&mut self.renderer)?;
        Ok(())
    }

    fn enter_mode(&mut self, mode: VisibilityMode) -> Result<(), IndoorError> {
        self.control.detach(&mut self.renderer)?;
        self.mode = mode;
        self.control = ButtonControl::new(floor_buttons(&self.floors, mode));
        self.control.attach(&mut self.renderer);
        info!("visibility mode is now {mode:?}");

        self.refresh()?;
        if let VisibilityMode::SingleFloor(floor) = mode {
            self.reorder.schedule(self.clock.now(), floor);
        }
        Ok(())
    }

    /// Brings `floor` into focus from either mode.
    fn focus(&mut self, floor: FloorId) -> Result<(), IndoorError> {
        match self.mode {
            VisibilityMode::AllFloors => self.enter_mode(VisibilityMode::SingleFloor(floor)),
            VisibilityMode::SingleFloor(_) => self.select_floor(floor).map(|_| ()),
        }
    }

    fn feature_ref(&self, id: FeatureId) -> FeatureRef {
        FeatureRef::new(
            self.config.source.id.as_str(),
            self.config.source.floorplan_layer.as_str(),
            id,
        )
    }

    /// Nearest candidate under the pointer, if the event's floor is visible.
    fn pick(&self, floor: FloorId, pointer: &PointerEvent) -> Option<FeatureId> {
        if !self.mode.admits(floor) {
            return None;
        }
        nearest_by_center_of_mass(&pointer.features, pointer.lng_lat).map(|f| f.id)
    }

    /// First loaded feature with `id` whose floor is configured.
    fn locate(&self, id: FeatureId) -> Option<(Feature, FloorId)> {
        let options = QueryOptions {
            source_layer: self.config.source.floorplan_layer.clone(),
            filter: FeatureFilter::IdEq(id),
        };
        let found = self
            .renderer
            .query_source_features(&self.config.source.id, &options);
        if found.is_empty() {
            return None;
        }
        let hit = found.into_iter().find_map(|feature| {
            let floor = feature.floor_id()?;
            self.floors.contains(floor).then_some((feature, floor))
        });
        if hit.is_none() {
            warn!("feature {id} has no configured floor");
        }
        hit
    }

    /// Camera target for a located feature: its center of mass at the
    /// selection zoom, padded to compensate the floor's translate.
    fn camera_for(&self, feature: &Feature, floor: FloorId) -> Option<CameraOptions> {
        let center: LngLat = feature.center_of_mass()?;
        let camera = CameraState::new(self.config.selection_zoom, self.renderer.pitch());
        let translate_y = canonical_f64(
            LayerStyleComputer::new(self.mode, camera, self.config.style.dimmed_opacity)
                .translate_y_of(floor),
        );
        let padding = if translate_y < 0.0 {
            Padding::top(-translate_y)
        } else {
            Padding::bottom(translate_y)
        };
        Some(CameraOptions {
            center,
            zoom: self.config.selection_zoom,
            padding,
        })
    }
}
