use scene::FeatureFilter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        LayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        LayerId(id.to_string())
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Line,
    FillExtrusion,
    Symbol,
}

/// Renderer style layer: filter, layout and paint as renderer expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub id: LayerId,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    pub filter: Value,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    #[serde(default)]
    pub paint: Map<String, Value>,
}

impl LayerDescriptor {
    pub fn new(
        id: LayerId,
        kind: LayerKind,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        filter: &FeatureFilter,
    ) -> Self {
        Self {
            id,
            kind,
            source: source.into(),
            source_layer: source_layer.into(),
            filter: filter.to_expression(),
            layout: Map::new(),
            paint: Map::new(),
        }
    }

    pub fn with_paint(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.paint.insert(property.to_string(), value.into());
        self
    }

    pub fn with_layout(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.layout.insert(property.to_string(), value.into());
        self
    }

    pub fn paint(&self, property: &str) -> Option<&Value> {
        self.paint.get(property)
    }

    pub fn set_paint(&mut self, property: &str, value: Value) {
        self.paint.insert(property.to_string(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Where the indoor data lives: one vector source with a floorplan and a
/// structure source layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndoorSource {
    pub id: String,
    pub url: String,
    pub floorplan_layer: String,
    pub structure_layer: String,
}

impl Default for IndoorSource {
    fn default() -> Self {
        Self {
            id: "indoor".to_string(),
            url: "mapbox://mapbox.indoor-v1".to_string(),
            floorplan_layer: "indoor_floorplan".to_string(),
            structure_layer: "indoor_structure".to_string(),
        }
    }
}

impl IndoorSource {
    pub fn descriptor(&self) -> SourceDescriptor {
        SourceDescriptor {
            id: self.id.clone(),
            kind: "vector".to_string(),
            url: self.url.clone(),
        }
    }
}
