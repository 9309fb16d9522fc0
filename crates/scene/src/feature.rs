use std::collections::BTreeMap;

use foundation::math::{LngLat, center_of_mass};
use foundation::{FeatureId, FloorId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FLOOR_ID_KEY: &str = "floor_id";
pub const CLASS_KEY: &str = "class";
pub const TYPE_KEY: &str = "type";

/// A loaded vector feature as reported by the renderer.
///
/// Geometry is a polygon given as rings (outer ring first) in `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub rings: Vec<Vec<LngLat>>,
}

impl Feature {
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            properties: BTreeMap::new(),
            rings: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_floor(self, floor: FloorId) -> Self {
        self.with_property(FLOOR_ID_KEY, floor.get())
    }

    pub fn with_ring(mut self, ring: Vec<LngLat>) -> Self {
        self.rings.push(ring);
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Floor attribute. Accepts integral numbers and numeric strings.
    pub fn floor_id(&self) -> Option<FloorId> {
        match self.property(FLOOR_ID_KEY)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .and_then(|v| i32::try_from(v).ok())
                .map(FloorId),
            Value::String(s) => s.trim().parse().ok().map(FloorId),
            _ => None,
        }
    }

    pub fn center_of_mass(&self) -> Option<LngLat> {
        center_of_mass(&self.rings)
    }
}

/// Addresses one feature for renderer-side feature state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureRef {
    pub source: String,
    pub source_layer: String,
    pub id: FeatureId,
}

impl FeatureRef {
    pub fn new(source: impl Into<String>, source_layer: impl Into<String>, id: FeatureId) -> Self {
        Self {
            source: source.into(),
            source_layer: source_layer.into(),
            id,
        }
    }
}

/// Partial feature-state update. `None` fields are left untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<bool>,
}

impl FeatureState {
    pub fn hover(on: bool) -> Self {
        Self {
            hover: Some(on),
            selection: None,
        }
    }

    pub fn selection(on: bool) -> Self {
        Self {
            hover: None,
            selection: Some(on),
        }
    }

    /// Applies `update` on top of `self`.
    pub fn merge(self, update: FeatureState) -> Self {
        Self {
            hover: update.hover.or(self.hover),
            selection: update.selection.or(self.selection),
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hover.unwrap_or(false)
    }

    pub fn is_selected(&self) -> bool {
        self.selection.unwrap_or(false)
    }
}
