//! Per-floor opacity and vertical offset.
//!
//! Everything here is a pure function of `(VisibilityMode, CameraState, floor)`;
//! recomputing is idempotent. Pushing the results to a renderer is the
//! caller's job (see [`paint_updates`]).

use foundation::FloorId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::floors::FloorLayerIds;
use crate::symbology::StyleConfig;

/// Zoom level at which one floor step is one pixel of offset (at 90° pitch).
pub const REFERENCE_ZOOM: f64 = 12.0;
/// How much farther unfocused floors are pushed in single-floor mode.
pub const SINGLE_FLOOR_SPREAD: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "floor", rename_all = "snake_case")]
pub enum VisibilityMode {
    /// Exploded stack of every floor.
    #[default]
    AllFloors,
    /// One focused floor; the rest are dimmed and pushed away.
    SingleFloor(FloorId),
}

impl VisibilityMode {
    pub fn focused(self) -> Option<FloorId> {
        match self {
            VisibilityMode::AllFloors => None,
            VisibilityMode::SingleFloor(f) => Some(f),
        }
    }

    pub fn is_all_floors(self) -> bool {
        matches!(self, VisibilityMode::AllFloors)
    }

    /// Whether pointer interaction on `floor` is accepted in this mode.
    pub fn admits(self, floor: FloorId) -> bool {
        match self {
            VisibilityMode::AllFloors => true,
            VisibilityMode::SingleFloor(f) => f == floor,
        }
    }
}

/// Renderer camera snapshot. Pitch is in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraState {
    pub zoom: f64,
    pub pitch: f64,
}

impl CameraState {
    pub fn new(zoom: f64, pitch: f64) -> Self {
        Self { zoom, pitch }
    }

    pub fn zoom_factor(&self) -> f64 {
        (self.zoom - REFERENCE_ZOOM).exp2()
    }

    pub fn pitch_factor(&self) -> f64 {
        self.pitch.to_radians().sin()
    }
}

/// Computed visual state of one floor.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FloorPaint {
    pub opacity: f64,
    pub translate_y: f64,
    pub label_opacity: f64,
}

impl FloorPaint {
    pub fn translate(&self) -> [f64; 2] {
        [0.0, self.translate_y]
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyleComputer {
    pub mode: VisibilityMode,
    pub camera: CameraState,
    pub dimmed_opacity: f64,
}

impl LayerStyleComputer {
    pub fn new(mode: VisibilityMode, camera: CameraState, dimmed_opacity: f64) -> Self {
        Self {
            mode,
            camera,
            dimmed_opacity,
        }
    }

    pub fn opacity_of(&self, floor: FloorId) -> f64 {
        if self.mode.admits(floor) {
            1.0
        } else {
            self.dimmed_opacity
        }
    }

    pub fn translate_y_of(&self, floor: FloorId) -> f64 {
        let scale = self.camera.zoom_factor() * self.camera.pitch_factor();
        match self.mode {
            VisibilityMode::AllFloors => -f64::from(floor.get()) * scale,
            VisibilityMode::SingleFloor(v) => {
                -(f64::from(floor.get()) - f64::from(v.get())) * scale * SINGLE_FLOOR_SPREAD
            }
        }
    }

    /// Labels are all-or-nothing and only for the exactly focused floor.
    pub fn label_opacity_of(&self, floor: FloorId) -> f64 {
        if self.mode.focused() == Some(floor) {
            1.0
        } else {
            0.0
        }
    }

    pub fn paint_of(&self, floor: FloorId) -> FloorPaint {
        FloorPaint {
            opacity: self.opacity_of(floor),
            translate_y: self.translate_y_of(floor),
            label_opacity: self.label_opacity_of(floor),
        }
    }
}

/// One `setPaintProperty` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintUpdate {
    pub layer: crate::layer::LayerId,
    pub property: &'static str,
    pub value: Value,
}

/// Paint channels for one floor: opacities first, then translates.
pub fn paint_updates(
    ids: &FloorLayerIds,
    style: &StyleConfig,
    paint: FloorPaint,
) -> Vec<PaintUpdate> {
    let translate = json!(paint.translate());
    let mut out = vec![
        PaintUpdate {
            layer: ids.floor_line.clone(),
            property: "line-opacity",
            value: json!(paint.opacity),
        },
        PaintUpdate {
            layer: ids.structure_line.clone(),
            property: "line-opacity",
            value: json!(paint.opacity),
        },
        PaintUpdate {
            layer: ids.floor_fill.clone(),
            property: "fill-extrusion-opacity",
            value: json!(style.floor_base_opacity * paint.opacity),
        },
        PaintUpdate {
            layer: ids.room.clone(),
            property: "fill-extrusion-opacity",
            value: json!(style.room_base_opacity * paint.opacity),
        },
        PaintUpdate {
            layer: ids.floor_line.clone(),
            property: "line-translate",
            value: translate.clone(),
        },
        PaintUpdate {
            layer: ids.structure_line.clone(),
            property: "line-translate",
            value: translate.clone(),
        },
        PaintUpdate {
            layer: ids.floor_fill.clone(),
            property: "fill-extrusion-translate",
            value: translate.clone(),
        },
        PaintUpdate {
            layer: ids.room.clone(),
            property: "fill-extrusion-translate",
            value: translate.clone(),
        },
    ];

    if style.labels {
        out.push(PaintUpdate {
            layer: ids.room_label.clone(),
            property: "text-opacity",
            value: json!(paint.label_opacity),
        });
        out.push(PaintUpdate {
            layer: ids.room_label.clone(),
            property: "text-translate",
            value: translate,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{CameraState, LayerStyleComputer, VisibilityMode, paint_updates};
    use crate::floors::FloorLayerIds;
    use crate::symbology::StyleConfig;
    use foundation::FloorId;
    use serde_json::json;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    fn computer(mode: VisibilityMode) -> LayerStyleComputer {
        LayerStyleComputer::new(mode, CameraState::new(16.0, 60.0), 0.1)
    }

    #[test]
    fn all_floors_are_opaque_in_all_floors_mode() {
        let c = computer(VisibilityMode::AllFloors);
        for f in -7..=4 {
            assert_eq!(c.opacity_of(FloorId(f)), 1.0);
        }
    }

    #[test]
    fn single_floor_dims_the_rest() {
        let c = computer(VisibilityMode::SingleFloor(FloorId(0)));
        assert_eq!(c.opacity_of(FloorId(0)), 1.0);
        assert_eq!(c.opacity_of(FloorId(-1)), 0.1);
        assert_eq!(c.opacity_of(FloorId(1)), 0.1);
    }

    #[test]
    fn all_floors_translate_is_proportional_to_index() {
        let c = computer(VisibilityMode::AllFloors);
        let scale = 16.0 * 60f64.to_radians().sin();
        assert_close(c.translate_y_of(FloorId(0)), 0.0);
        assert_close(c.translate_y_of(FloorId(2)), -2.0 * scale);
        assert_close(c.translate_y_of(FloorId(-3)), 3.0 * scale);
    }

    #[test]
    fn single_floor_translate_centers_focus_and_spreads_others() {
        let c = computer(VisibilityMode::SingleFloor(FloorId(-1)));
        let scale = 16.0 * 60f64.to_radians().sin();
        assert_close(c.translate_y_of(FloorId(-1)), 0.0);
        assert_close(c.translate_y_of(FloorId(0)), -10.0 * scale);
        assert_close(c.translate_y_of(FloorId(-3)), 20.0 * scale);
    }

    #[test]
    fn translate_grows_with_distance_from_focus() {
        let c = computer(VisibilityMode::SingleFloor(FloorId(0)));
        let mut last = 0.0;
        for f in 1..=4 {
            let up = c.translate_y_of(FloorId(f));
            let down = c.translate_y_of(FloorId(-f));
            assert!(up < 0.0 && down > 0.0);
            assert!(up.abs() > last && down.abs() > last);
            assert_close(up.abs(), down.abs());
            last = up.abs();
        }
    }

    #[test]
    fn flat_camera_collapses_the_stack() {
        let c =
            LayerStyleComputer::new(VisibilityMode::AllFloors, CameraState::new(18.0, 0.0), 0.1);
        assert_close(c.translate_y_of(FloorId(3)), 0.0);
    }

    #[test]
    fn extreme_floor_ids_stay_finite() {
        let camera = CameraState::new(18.0, 60.0);
        let mode = VisibilityMode::SingleFloor(FloorId(i32::MAX));
        let c = LayerStyleComputer::new(mode, camera, 0.1);
        let down = c.translate_y_of(FloorId(i32::MIN));
        assert!(down.is_finite() && down > 0.0);

        let mode = VisibilityMode::SingleFloor(FloorId(i32::MIN));
        let c = LayerStyleComputer::new(mode, camera, 0.1);
        let up = c.translate_y_of(FloorId(i32::MAX));
        assert!(up.is_finite() && up < 0.0);
        assert_close(up.abs(), down);
    }

    #[test]
    fn labels_only_show_on_the_focused_floor() {
        let all = computer(VisibilityMode::AllFloors);
        assert_eq!(all.label_opacity_of(FloorId(0)), 0.0);

        let single = computer(VisibilityMode::SingleFloor(FloorId(1)));
        assert_eq!(single.label_opacity_of(FloorId(1)), 1.0);
        assert_eq!(single.label_opacity_of(FloorId(0)), 0.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let c = computer(VisibilityMode::SingleFloor(FloorId(2)));
        assert_eq!(c.paint_of(FloorId(-1)), c.paint_of(FloorId(-1)));
    }

    #[test]
    fn paint_updates_cover_every_channel() {
        let ids = FloorLayerIds::for_floor(FloorId(1));
        let c = computer(VisibilityMode::SingleFloor(FloorId(0)));
        let updates = paint_updates(&ids, &StyleConfig::default(), c.paint_of(FloorId(1)));
        assert_eq!(updates.len(), 10);

        let room_opacity = updates
            .iter()
            .find(|u| u.layer == ids.room && u.property == "fill-extrusion-opacity")
            .unwrap();
        assert_close(room_opacity.value.as_f64().unwrap(), 0.05);

        let label = updates
            .iter()
            .find(|u| u.layer == ids.room_label && u.property == "text-opacity")
            .unwrap();
        assert_eq!(label.value, json!(0.0));

        let no_labels = StyleConfig {
            labels: false,
            ..StyleConfig::default()
        };
        assert_eq!(paint_updates(&ids, &no_labels, c.paint_of(FloorId(1))).len(), 8);
    }
}
