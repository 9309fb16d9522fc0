use std::path::Path;
use std::time::Duration;

use foundation::FloorId;
use foundation::math::LngLat;
use layers::{FloorSet, IndoorSource, StyleConfig};
use serde::{Deserialize, Serialize};

use crate::error::IndoorError;
use crate::reorder::PromotionPolicy;

/// What `select` does when the feature is not among the loaded features.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Record the selection and its flag anyway; skip floor switch and camera.
    #[default]
    Permissive,
    /// Fail with `FeatureNotFound` and leave the current selection alone.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialCamera {
    pub center: LngLat,
    pub zoom: f64,
    /// Degrees.
    pub pitch: f64,
}

impl Default for InitialCamera {
    fn default() -> Self {
        Self {
            center: LngLat::new(139.7670, 35.6814),
            zoom: 15.95,
            pitch: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndoorConfig {
    /// Any order; validation sorts ascending and rejects duplicates.
    pub floor_ids: Vec<FloorId>,
    /// Floor entered by the first toggle when no floor has been remembered.
    pub default_floor: FloorId,
    pub style_url: String,
    pub source: IndoorSource,
    pub initial_camera: InitialCamera,
    pub selection_zoom: f64,
    pub style: StyleConfig,
    pub promotion_delay_ms: u64,
    pub promotion_policy: PromotionPolicy,
    pub selection_policy: SelectionPolicy,
}

impl Default for IndoorConfig {
    fn default() -> Self {
        Self {
            floor_ids: (-4..=3).map(FloorId).collect(),
            default_floor: FloorId(0),
            style_url: "mapbox://styles/mapbox/dark-v10".to_string(),
            source: IndoorSource::default(),
            initial_camera: InitialCamera::default(),
            selection_zoom: 18.95,
            style: StyleConfig::default(),
            promotion_delay_ms: 150,
            promotion_policy: PromotionPolicy::default(),
            selection_policy: SelectionPolicy::default(),
        }
    }
}

impl IndoorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, IndoorError> {
        serde_json::from_str(raw).map_err(|e| IndoorError::Parse(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IndoorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IndoorError::Io(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn promotion_delay(&self) -> Duration {
        Duration::from_millis(self.promotion_delay_ms)
    }

    /// Checks cross-field constraints and returns the validated floor set.
    pub fn validate(&self) -> Result<FloorSet, IndoorError> {
        let floors = FloorSet::new(self.floor_ids.clone())?;
        if !floors.contains(self.default_floor) {
            return Err(IndoorError::InvalidConfig(format!(
                "default floor {} is not in floor_ids",
                self.default_floor
            )));
        }
        if !self.selection_zoom.is_finite() {
            return Err(IndoorError::InvalidConfig(
                "selection_zoom must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.style.dimmed_opacity) {
            return Err(IndoorError::InvalidConfig(format!(
                "dimmed_opacity {} is outside 0..=1",
                self.style.dimmed_opacity
            )));
        }
        if self.source.id.is_empty() || self.source.floorplan_layer.is_empty() {
            return Err(IndoorError::InvalidConfig(
                "source id and floorplan layer must be set".to_string(),
            ));
        }
        Ok(floors)
    }
}
