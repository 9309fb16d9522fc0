use foundation::FloorId;
use scene::FeatureFilter;
use serde_json::json;

use crate::labels::room_label_layer;
use crate::layer::{IndoorSource, LayerDescriptor, LayerId, LayerKind};
use crate::style::FloorPaint;
use crate::symbology::StyleConfig;

const ROOM_PREFIX: &str = "room-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorSetError {
    Empty,
    Duplicate(FloorId),
}

impl std::fmt::Display for FloorSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloorSetError::Empty => write!(f, "floor list is empty"),
            FloorSetError::Duplicate(id) => write!(f, "floor {id} is listed more than once"),
        }
    }
}

impl std::error::Error for FloorSetError {}

/// The fixed, ordered set of floors of one building.
///
/// Ordering contract:
/// - `iter` yields floors bottom to top (ascending).
/// - `descending` yields floors top to bottom, the button layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorSet {
    floors: Vec<FloorId>,
}

impl FloorSet {
    /// Input order is ignored: floors are sorted ascending, so the lowest
    /// floor is the height base and the first reorder anchor.
    pub fn new(mut floors: Vec<FloorId>) -> Result<Self, FloorSetError> {
        if floors.is_empty() {
            return Err(FloorSetError::Empty);
        }
        floors.sort();
        for pair in floors.windows(2) {
            if pair[0] == pair[1] {
                return Err(FloorSetError::Duplicate(pair[0]));
            }
        }
        Ok(Self { floors })
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn contains(&self, floor: FloorId) -> bool {
        self.floors.binary_search(&floor).is_ok()
    }

    pub fn lowest(&self) -> FloorId {
        self.floors[0]
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = FloorId> + '_ {
        self.floors.iter().copied()
    }

    pub fn descending(&self) -> impl Iterator<Item = FloorId> + '_ {
        self.iter().rev()
    }
}

/// Stable style-layer ids for one floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorLayerIds {
    pub floor: FloorId,
    pub floor_line: LayerId,
    pub structure_line: LayerId,
    pub floor_fill: LayerId,
    pub room: LayerId,
    pub room_label: LayerId,
}

impl FloorLayerIds {
    pub fn for_floor(floor: FloorId) -> Self {
        Self {
            floor,
            floor_line: LayerId(format!("floor-line-{floor}")),
            structure_line: LayerId(format!("structure-line-{floor}")),
            floor_fill: LayerId(format!("floor-fill-{floor}")),
            room: LayerId(format!("{ROOM_PREFIX}{floor}")),
            room_label: LayerId(format!("room-label-{floor}")),
        }
    }
}

/// Floor owning a `room-{f}` layer. Other layer ids yield `None`.
pub fn floor_of_room_layer(layer: &LayerId) -> Option<FloorId> {
    let rest = layer.as_str().strip_prefix(ROOM_PREFIX)?;
    rest.parse().ok().map(FloorId)
}

/// Style layers for one floor, in insertion order.
pub fn floor_layers(
    floor: FloorId,
    floors: &FloorSet,
    source: &IndoorSource,
    style: &StyleConfig,
    paint: FloorPaint,
) -> Vec<LayerDescriptor> {
    let ids = FloorLayerIds::for_floor(floor);
    let translate = json!(paint.translate());
    let level = f64::from(floor.get());
    let above_lowest = f64::from(floor.get()) - f64::from(floors.lowest().get());

    let mut out = vec![
        LayerDescriptor::new(
            ids.floor_line.clone(),
            LayerKind::Line,
            &source.id,
            &source.floorplan_layer,
            &FeatureFilter::on_floor(floor),
        )
        .with_paint("line-color", style.main_color.as_str())
        .with_paint("line-opacity", paint.opacity)
        .with_paint("line-translate", translate.clone())
        .with_paint("line-translate-anchor", "viewport"),
        LayerDescriptor::new(
            ids.structure_line.clone(),
            LayerKind::Line,
            &source.id,
            &source.structure_layer,
            &FeatureFilter::on_floor(floor),
        )
        .with_paint("line-color", style.main_color.as_str())
        .with_paint("line-opacity", paint.opacity)
        .with_paint("line-translate", translate.clone())
        .with_paint("line-translate-anchor", "viewport"),
        LayerDescriptor::new(
            ids.floor_fill.clone(),
            LayerKind::FillExtrusion,
            &source.id,
            &source.floorplan_layer,
            &FeatureFilter::floor_area(floor),
        )
        .with_paint("fill-extrusion-color", style.main_color.as_str())
        .with_paint(
            "fill-extrusion-opacity",
            style.floor_base_opacity * paint.opacity,
        )
        .with_paint("fill-extrusion-height", above_lowest * style.height_delta)
        .with_paint("fill-extrusion-translate", translate.clone())
        .with_paint("fill-extrusion-translate-anchor", "viewport"),
        LayerDescriptor::new(
            ids.room.clone(),
            LayerKind::FillExtrusion,
            &source.id,
            &source.floorplan_layer,
            &FeatureFilter::rooms(floor),
        )
        .with_paint("fill-extrusion-color", room_color_expression(style))
        .with_paint(
            "fill-extrusion-opacity",
            style.room_base_opacity * paint.opacity,
        )
        .with_paint(
            "fill-extrusion-height",
            style.room_height + level * style.height_delta,
        )
        .with_paint("fill-extrusion-translate", translate)
        .with_paint("fill-extrusion-translate-anchor", "viewport"),
    ];

    if style.labels {
        out.push(room_label_layer(&ids, source, style, paint));
    }

    out
}

// Hover wins over selection; both fall back to the main color.
fn room_color_expression(style: &StyleConfig) -> serde_json::Value {
    json!([
        "case",
        ["boolean", ["feature-state", "hover"], false],
        style.hover_color,
        ["boolean", ["feature-state", "selection"], false],
        style.selection_color,
        style.main_color
    ])
}
