use scene::FeatureFilter;
use serde_json::json;

use crate::floors::FloorLayerIds;
use crate::layer::{IndoorSource, LayerDescriptor, LayerKind};
use crate::style::FloorPaint;
use crate::symbology::StyleConfig;

/// Text halo width in pixels.
pub const LABEL_HALO_WIDTH_PX: f64 = 1.0;

/// Room name labels for one floor.
///
/// Shares the room filter so a label exists exactly where a room is drawn.
pub fn room_label_layer(
    ids: &FloorLayerIds,
    source: &IndoorSource,
    style: &StyleConfig,
    paint: FloorPaint,
) -> LayerDescriptor {
    LayerDescriptor::new(
        ids.room_label.clone(),
        LayerKind::Symbol,
        &source.id,
        &source.floorplan_layer,
        &FeatureFilter::rooms(ids.floor),
    )
    .with_layout("text-field", json!(["get", style.label_field]))
    .with_layout("text-size", style.label_size)
    .with_layout("text-allow-overlap", false)
    .with_paint("text-color", style.text_color.as_str())
    .with_paint("text-halo-color", style.halo_color.as_str())
    .with_paint("text-halo-width", LABEL_HALO_WIDTH_PX)
    .with_paint("text-opacity", paint.label_opacity)
    .with_paint("text-translate", json!(paint.translate()))
    .with_paint("text-translate-anchor", "viewport")
}

#[cfg(test)]
mod tests {
    use super::room_label_layer;
    use crate::floors::FloorLayerIds;
    use crate::layer::{IndoorSource, LayerKind};
    use crate::style::FloorPaint;
    use crate::symbology::StyleConfig;
    use foundation::FloorId;
    use serde_json::json;

    #[test]
    fn label_layer_uses_configured_field_and_colors() {
        let style = StyleConfig {
            label_field: "ref".to_string(),
            text_color: "#eee".to_string(),
            ..StyleConfig::default()
        };
        let paint = FloorPaint {
            opacity: 1.0,
            translate_y: 0.0,
            label_opacity: 1.0,
        };
        let layer = room_label_layer(
            &FloorLayerIds::for_floor(FloorId(0)),
            &IndoorSource::default(),
            &style,
            paint,
        );
        assert_eq!(layer.kind, LayerKind::Symbol);
        assert_eq!(layer.id.as_str(), "room-label-0");
        assert_eq!(layer.layout.get("text-field"), Some(&json!(["get", "ref"])));
        assert_eq!(layer.paint("text-color"), Some(&json!("#eee")));
        assert_eq!(layer.paint("text-opacity"), Some(&json!(1.0)));
    }
}
