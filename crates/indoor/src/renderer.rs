//! Capability interface of the external map renderer.
//!
//! The controller owns no drawing, tile or animation logic; it talks to the
//! renderer exclusively through [`RendererHandle`]. Hosts implement it over a
//! real map; tests and the CLI use [`crate::memory::MemoryRenderer`].

use foundation::math::LngLat;
use layers::{LayerDescriptor, LayerId, SourceDescriptor};
use scene::{Feature, FeatureFilter, FeatureRef, FeatureState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::control::ControlNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    UnknownLayer(LayerId),
    UnknownSource(String),
    DuplicateLayer(LayerId),
    DuplicateSource(String),
    UnknownControl(ControlHandle),
}

impl std::fmt::Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::UnknownLayer(id) => write!(f, "layer {id} does not exist"),
            RendererError::UnknownSource(id) => write!(f, "source {id} does not exist"),
            RendererError::DuplicateLayer(id) => write!(f, "layer {id} already exists"),
            RendererError::DuplicateSource(id) => write!(f, "source {id} already exists"),
            RendererError::UnknownControl(h) => write!(f, "control {} is not attached", h.0),
        }
    }
}

impl std::error::Error for RendererError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    /// CSS `cursor` value for the rendering surface.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Viewport padding in pixels applied to a camera transition.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Padding {
    pub fn top(px: f64) -> Self {
        Self {
            top: px,
            ..Self::default()
        }
    }

    pub fn bottom(px: f64) -> Self {
        Self {
            bottom: px,
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    pub center: LngLat,
    pub zoom: f64,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub source_layer: String,
    pub filter: FeatureFilter,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEventKind {
    Load,
    Zoom,
    Pitch,
    Click,
    MouseMove,
    MouseLeave,
}

/// Event interest. Map-scoped when `layer` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub kind: MapEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
}

impl Subscription {
    pub fn map(kind: MapEventKind) -> Self {
        Self { kind, layer: None }
    }

    pub fn layer(kind: MapEventKind, layer: LayerId) -> Self {
        Self {
            kind,
            layer: Some(layer),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlHandle(pub u64);

pub trait RendererHandle {
    fn add_source(&mut self, source: SourceDescriptor) -> Result<(), RendererError>;

    fn add_layer(&mut self, layer: LayerDescriptor) -> Result<(), RendererError>;

    fn set_paint_property(
        &mut self,
        layer: &LayerId,
        property: &str,
        value: Value,
    ) -> Result<(), RendererError>;

    /// Moves `layer` directly below `before`, or to the top when `None`.
    fn move_layer(&mut self, layer: &LayerId, before: Option<&LayerId>)
    -> Result<(), RendererError>;

    fn set_feature_state(&mut self, feature: &FeatureRef, state: FeatureState);

    /// Features of `source` currently loaded by the renderer that match `options`.
    fn query_source_features(&self, source: &str, options: &QueryOptions) -> Vec<Feature>;

    fn zoom(&self) -> f64;

    /// Degrees.
    fn pitch(&self) -> f64;

    /// Starts an animated transition. A new call supersedes any in-flight one.
    fn ease_to(&mut self, options: CameraOptions);

    fn subscribe(&mut self, subscription: Subscription);

    fn set_cursor(&mut self, cursor: Cursor);

    fn add_control(&mut self, node: &ControlNode) -> ControlHandle;

    fn update_control(
        &mut self,
        handle: ControlHandle,
        node: &ControlNode,
    ) -> Result<(), RendererError>;

    fn remove_control(&mut self, handle: ControlHandle) -> Result<(), RendererError>;
}

#[cfg(test)]
mod tests {
    use super::{ControlHandle, Cursor, Padding, RendererError, Subscription, MapEventKind};
    use layers::LayerId;
    use serde_json::json;

    #[test]
    fn padding_helpers_set_one_side() {
        assert_eq!(Padding::top(12.0).top, 12.0);
        assert_eq!(Padding::top(12.0).bottom, 0.0);
        assert_eq!(Padding::bottom(3.0).bottom, 3.0);
    }

    #[test]
    fn cursor_css_values() {
        assert_eq!(Cursor::Pointer.css(), "pointer");
        assert_eq!(Cursor::Default.css(), "");
    }

    #[test]
    fn subscriptions_serialize_compactly() {
        assert_eq!(
            serde_json::to_value(Subscription::map(MapEventKind::Zoom)).unwrap(),
            json!({"kind": "zoom"})
        );
        assert_eq!(
            serde_json::to_value(Subscription::layer(
                MapEventKind::MouseMove,
                LayerId::from("room-0")
            ))
            .unwrap(),
            json!({"kind": "mouse_move", "layer": "room-0"})
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            RendererError::UnknownControl(ControlHandle(3)).to_string(),
            "control 3 is not attached"
        );
    }
}
