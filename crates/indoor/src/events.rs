//! Renderer events as delivered to the controller.

use foundation::math::LngLat;
use layers::LayerId;
use scene::Feature;
use serde::{Deserialize, Serialize};

use crate::renderer::MapEventKind;

/// Pointer interaction on one style layer.
///
/// `features` are the rendered features under the pointer, in renderer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub layer: LayerId,
    pub lng_lat: LngLat,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    Load,
    Zoom,
    Pitch,
    Click(PointerEvent),
    MouseMove(PointerEvent),
    MouseLeave { layer: LayerId },
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Load => MapEventKind::Load,
            MapEvent::Zoom => MapEventKind::Zoom,
            MapEvent::Pitch => MapEventKind::Pitch,
            MapEvent::Click(_) => MapEventKind::Click,
            MapEvent::MouseMove(_) => MapEventKind::MouseMove,
            MapEvent::MouseLeave { .. } => MapEventKind::MouseLeave,
        }
    }

    /// Layer the event is scoped to; `None` for map-wide events.
    pub fn layer(&self) -> Option<&LayerId> {
        match self {
            MapEvent::Click(p) | MapEvent::MouseMove(p) => Some(&p.layer),
            MapEvent::MouseLeave { layer } => Some(layer),
            MapEvent::Load | MapEvent::Zoom | MapEvent::Pitch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapEvent;
    use crate::renderer::MapEventKind;
    use foundation::FeatureId;
    use layers::LayerId;
    use serde_json::json;

    #[test]
    fn parses_tagged_events() {
        let ev: MapEvent = serde_json::from_value(json!({
            "type": "mouse_move",
            "layer": "room-1",
            "lng_lat": [139.767, 35.681],
            "features": [{"id": 7, "properties": {"floor_id": 1}}]
        }))
        .unwrap();
        assert_eq!(ev.kind(), MapEventKind::MouseMove);
        assert_eq!(ev.layer(), Some(&LayerId::from("room-1")));
        match ev {
            MapEvent::MouseMove(p) => assert_eq!(p.features[0].id, FeatureId(7)),
            other => panic!("unexpected {other:?}"),
        }

        let ev: MapEvent = serde_json::from_value(json!({"type": "zoom"})).unwrap();
        assert_eq!(ev, MapEvent::Zoom);
        assert_eq!(ev.layer(), None);

        let ev: MapEvent =
            serde_json::from_value(json!({"type": "mouse_leave", "layer": "room-0"})).unwrap();
        assert_eq!(ev.kind(), MapEventKind::MouseLeave);
    }
}
