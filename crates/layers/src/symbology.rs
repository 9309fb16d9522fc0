use serde::{Deserialize, Serialize};

/// Colors, base opacities and extrusion heights for the indoor layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub main_color: String,
    pub hover_color: String,
    pub selection_color: String,
    pub text_color: String,
    pub halo_color: String,
    /// Opacity of floor slabs at full visibility.
    pub floor_base_opacity: f64,
    /// Opacity of rooms at full visibility.
    pub room_base_opacity: f64,
    /// Extrusion height step between consecutive floors.
    pub height_delta: f64,
    pub room_height: f64,
    /// Visibility factor for floors other than the focused one.
    pub dimmed_opacity: f64,
    pub labels: bool,
    pub label_field: String,
    pub label_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            main_color: "#0f0".to_string(),
            hover_color: "#0ff".to_string(),
            selection_color: "#ff0".to_string(),
            text_color: "#fff".to_string(),
            halo_color: "#000".to_string(),
            floor_base_opacity: 0.2,
            room_base_opacity: 0.5,
            height_delta: 0.01,
            room_height: 3.0,
            dimmed_opacity: 0.1,
            labels: true,
            label_field: "name".to_string(),
            label_size: 12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StyleConfig;

    #[test]
    fn partial_json_keeps_defaults() {
        let s: StyleConfig = serde_json::from_str(r##"{"hover_color": "#f0f"}"##).unwrap();
        assert_eq!(s.hover_color, "#f0f");
        assert_eq!(s.main_color, "#0f0");
        assert_eq!(s.dimmed_opacity, 0.1);
    }
}
