//! Offline helpers behind the `indoor` binary: style export, button layout
//! and scripted replays against the recording renderer.

use std::path::Path;
use std::time::Duration;

use foundation::FloorId;
use foundation::time::Time;
use indoor::control::{ButtonAction, ButtonSpec, floor_buttons};
use indoor::memory::{MemoryRenderer, RendererCommand};
use indoor::{ControllerSnapshot, IndoorConfig, IndoorController, IndoorError, MapEvent};
use layers::{
    CameraState, LayerDescriptor, LayerStyleComputer, SourceDescriptor, VisibilityMode,
    floor_layers,
};
use scene::Feature;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IndoorError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| IndoorError::Io(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| IndoorError::Parse(format!("{}: {e}", path.display())))
}

pub fn load_config(path: Option<&Path>) -> Result<IndoorConfig, IndoorError> {
    match path {
        Some(path) => IndoorConfig::from_path(path),
        None => Ok(IndoorConfig::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDocument {
    pub style_url: String,
    pub source: SourceDescriptor,
    pub layers: Vec<LayerDescriptor>,
}

/// Layers as added on load, painted for AllFloors at the initial camera.
pub fn style_document(config: &IndoorConfig) -> Result<StyleDocument, IndoorError> {
    let floors = config.validate()?;
    let computer = LayerStyleComputer::new(
        VisibilityMode::AllFloors,
        CameraState::new(config.initial_camera.zoom, config.initial_camera.pitch),
        config.style.dimmed_opacity,
    );
    let layers = floors
        .iter()
        .flat_map(|floor| {
            floor_layers(
                floor,
                &floors,
                &config.source,
                &config.style,
                computer.paint_of(floor),
            )
        })
        .collect();
    Ok(StyleDocument {
        style_url: config.style_url.clone(),
        source: config.source.descriptor(),
        layers,
    })
}

/// Button set for AllFloors, or SingleFloor(`floor`) when given.
pub fn button_layout(
    config: &IndoorConfig,
    floor: Option<FloorId>,
) -> Result<Vec<ButtonSpec>, IndoorError> {
    let floors = config.validate()?;
    let mode = match floor {
        Some(floor) if !floors.contains(floor) => return Err(IndoorError::UnknownFloor(floor)),
        Some(floor) => VisibilityMode::SingleFloor(floor),
        None => VisibilityMode::AllFloors,
    };
    Ok(floor_buttons(&floors, mode))
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Event { event: MapEvent },
    Toggle,
    Press { action: ButtonAction },
    Click { index: usize },
    Advance { now_ms: u64 },
    Wait { ms: u64 },
    /// Moves the camera, then delivers `zoom` and `pitch` events.
    Camera { zoom: f64, pitch: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub commands: Vec<RendererCommand>,
    pub promoted: Vec<FloorId>,
    pub state: ControllerSnapshot,
}

/// Runs `steps` against a fresh controller over a recording renderer loaded
/// with `features`. The `load` event is delivered first.
pub fn replay(
    config: IndoorConfig,
    features: Vec<Feature>,
    steps: &[ScriptStep],
) -> Result<ReplayReport, IndoorError> {
    let camera = &config.initial_camera;
    let mut renderer =
        MemoryRenderer::new(CameraState::new(camera.zoom, camera.pitch), camera.center);
    renderer.load_features(
        config.source.id.clone(),
        config.source.floorplan_layer.clone(),
        features,
    );

    let mut controller = IndoorController::new(config, renderer)?;
    controller.handle_event(MapEvent::Load)?;

    let mut promoted = Vec::new();
    for (n, step) in steps.iter().enumerate() {
        info!("step {n}: {step:?}");
        match step {
            ScriptStep::Event { event } => controller.handle_event(event.clone())?,
            ScriptStep::Toggle => {
                controller.toggle()?;
            }
            ScriptStep::Press { action } => controller.press(*action)?,
            ScriptStep::Click { index } => controller.click_button(*index)?,
            ScriptStep::Advance { now_ms } => {
                promoted.extend(controller.advance_to(Time::from_millis(*now_ms))?);
            }
            ScriptStep::Wait { ms } => {
                promoted.extend(controller.advance_by(Duration::from_millis(*ms))?);
            }
            ScriptStep::Camera { zoom, pitch } => {
                controller
                    .renderer_mut()
                    .set_camera(CameraState::new(*zoom, *pitch));
                controller.handle_event(MapEvent::Zoom)?;
                controller.handle_event(MapEvent::Pitch)?;
            }
        }
    }

    Ok(ReplayReport {
        commands: controller.renderer().commands().to_vec(),
        promoted,
        state: controller.snapshot(),
    })
}
