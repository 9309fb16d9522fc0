use std::collections::BTreeMap;

use foundation::FeatureId;
use foundation::math::LngLat;
use layers::{CameraState, LayerDescriptor, LayerId, SourceDescriptor};
use scene::{Feature, FeatureRef, FeatureState};
use serde::Serialize;
use serde_json::Value;

use crate::control::ControlNode;
use crate::renderer::{
    CameraOptions, ControlHandle, Cursor, QueryOptions, RendererError, RendererHandle,
    Subscription,
};

/// One call the controller made on the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RendererCommand {
    AddSource {
        id: String,
    },
    AddLayer {
        id: LayerId,
    },
    SetPaintProperty {
        layer: LayerId,
        property: String,
        value: Value,
    },
    MoveLayer {
        layer: LayerId,
        before: Option<LayerId>,
    },
    SetFeatureState {
        feature: FeatureRef,
        state: FeatureState,
    },
    EaseTo {
        options: CameraOptions,
    },
    Subscribe {
        subscription: Subscription,
    },
    SetCursor {
        cursor: Cursor,
    },
    AddControl {
        handle: ControlHandle,
    },
    UpdateControl {
        handle: ControlHandle,
    },
    RemoveControl {
        handle: ControlHandle,
    },
}

/// In-memory renderer that keeps the style, feature states and camera, and
/// records every call in order.
///
/// Camera transitions complete instantly.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    camera: CameraState,
    center: LngLat,
    sources: BTreeMap<String, SourceDescriptor>,
    // Bottom to top.
    layers: Vec<LayerDescriptor>,
    features: BTreeMap<(String, String), Vec<Feature>>,
    feature_states: BTreeMap<FeatureRef, FeatureState>,
    cursor: Cursor,
    controls: BTreeMap<ControlHandle, ControlNode>,
    next_control: u64,
    subscriptions: Vec<Subscription>,
    commands: Vec<RendererCommand>,
}

impl MemoryRenderer {
    pub fn new(camera: CameraState, center: LngLat) -> Self {
        Self {
            camera,
            center,
            ..Self::default()
        }
    }

    /// Host-side camera motion. Does not emit events; the host dispatches
    /// `Zoom`/`Pitch` to the controller itself.
    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    /// Makes features of one source layer available to queries.
    pub fn load_features(
        &mut self,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        features: Vec<Feature>,
    ) {
        self.features
            .entry((source.into(), source_layer.into()))
            .or_default()
            .extend(features);
    }

    pub fn source(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.get(id)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layer_order(&self) -> Vec<&LayerId> {
        self.layers.iter().map(|l| &l.id).collect()
    }

    pub fn layer_index(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    pub fn paint(&self, layer: &LayerId, property: &str) -> Option<&Value> {
        self.layer(layer)?.paint(property)
    }

    pub fn feature_state(&self, feature: &FeatureRef) -> FeatureState {
        self.feature_states.get(feature).copied().unwrap_or_default()
    }

    pub fn hovered(&self) -> Vec<FeatureId> {
        self.feature_states
            .iter()
            .filter(|(_, s)| s.is_hovered())
            .map(|(f, _)| f.id)
            .collect()
    }

    pub fn selected(&self) -> Vec<FeatureId> {
        self.feature_states
            .iter()
            .filter(|(_, s)| s.is_selected())
            .map(|(f, _)| f.id)
            .collect()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn controls(&self) -> impl Iterator<Item = &ControlNode> {
        self.controls.values()
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn commands(&self) -> &[RendererCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<RendererCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn eases(&self) -> impl Iterator<Item = &CameraOptions> {
        self.commands.iter().filter_map(|c| match c {
            RendererCommand::EaseTo { options } => Some(options),
            _ => None,
        })
    }

    fn layer_mut(&mut self, id: &LayerId) -> Result<&mut LayerDescriptor, RendererError> {
        self.layers
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| RendererError::UnknownLayer(id.clone()))
    }
}

impl RendererHandle for MemoryRenderer {
    fn add_source(&mut self, source: SourceDescriptor) -> Result<(), RendererError> {
        if self.sources.contains_key(&source.id) {
            return Err(RendererError::DuplicateSource(source.id));
        }
        self.commands.push(RendererCommand::AddSource {
            id: source.id.clone(),
        });
        self.sources.insert(source.id.clone(), source);
        Ok(())
    }

    fn add_layer(&mut self, layer: LayerDescriptor) -> Result<(), RendererError> {
        if !self.sources.contains_key(&layer.source) {
            return Err(RendererError::UnknownSource(layer.source));
        }
        if self.layer(&layer.id).is_some() {
            return Err(RendererError::DuplicateLayer(layer.id));
        }
        self.commands.push(RendererCommand::AddLayer {
            id: layer.id.clone(),
        });
        self.layers.push(layer);
        Ok(())
    }

    fn set_paint_property(
        &mut self,
        layer: &LayerId,
        property: &str,
        value: Value,
    ) -> Result<(), RendererError> {
        self.layer_mut(layer)?.set_paint(property, value.clone());
        self.commands.push(RendererCommand::SetPaintProperty {
            layer: layer.clone(),
            property: property.to_string(),
            value,
        });
        Ok(())
    }

    fn move_layer(
        &mut self,
        layer: &LayerId,
        before: Option<&LayerId>,
    ) -> Result<(), RendererError> {
        let from = self
            .layer_index(layer)
            .ok_or_else(|| RendererError::UnknownLayer(layer.clone()))?;
        if let Some(anchor) = before
            && self.layer_index(anchor).is_none()
        {
            return Err(RendererError::UnknownLayer(anchor.clone()));
        }

        self.commands.push(RendererCommand::MoveLayer {
            layer: layer.clone(),
            before: before.cloned(),
        });
        if before == Some(layer) {
            return Ok(());
        }

        let moved = self.layers.remove(from);
        let to = match before {
            Some(anchor) => self.layer_index(anchor).unwrap_or(self.layers.len()),
            None => self.layers.len(),
        };
        self.layers.insert(to, moved);
        Ok(())
    }

    fn set_feature_state(&mut self, feature: &FeatureRef, state: FeatureState) {
        let entry = self.feature_states.entry(feature.clone()).or_default();
        *entry = entry.merge(state);
        self.commands.push(RendererCommand::SetFeatureState {
            feature: feature.clone(),
            state,
        });
    }

    fn query_source_features(&self, source: &str, options: &QueryOptions) -> Vec<Feature> {
        self.features
            .get(&(source.to_string(), options.source_layer.clone()))
            .map(|features| {
                features
                    .iter()
                    .filter(|f| options.filter.matches(f))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    fn pitch(&self) -> f64 {
        self.camera.pitch
    }

    fn ease_to(&mut self, options: CameraOptions) {
        self.center = options.center;
        self.camera.zoom = options.zoom;
        self.commands.push(RendererCommand::EaseTo { options });
    }

    fn subscribe(&mut self, subscription: Subscription) {
        self.commands.push(RendererCommand::Subscribe {
            subscription: subscription.clone(),
        });
        self.subscriptions.push(subscription);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.commands.push(RendererCommand::SetCursor { cursor });
    }

    fn add_control(&mut self, node: &ControlNode) -> ControlHandle {
        let handle = ControlHandle(self.next_control);
        self.next_control += 1;
        self.controls.insert(handle, node.clone());
        self.commands.push(RendererCommand::AddControl { handle });
        handle
    }

    fn update_control(
        &mut self,
        handle: ControlHandle,
        node: &ControlNode,
    ) -> Result<(), RendererError> {
        let slot = self
            .controls
            .get_mut(&handle)
            .ok_or(RendererError::UnknownControl(handle))?;
        *slot = node.clone();
        self.commands.push(RendererCommand::UpdateControl { handle });
        Ok(())
    }

    fn remove_control(&mut self, handle: ControlHandle) -> Result<(), RendererError> {
        self.controls
            .remove(&handle)
            .ok_or(RendererError::UnknownControl(handle))?;
        self.commands.push(RendererCommand::RemoveControl { handle });
        Ok(())
    }
}
