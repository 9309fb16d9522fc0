//! Floor focus toggle control.
//!
//! The button set is a pure function of `(FloorSet, VisibilityMode)` and is
//! regenerated wholesale on every toggle. The only in-place edit is moving
//! the active marker between floor buttons.

use foundation::FloorId;
use layers::{FloorSet, VisibilityMode};
use serde::{Deserialize, Serialize};

use crate::error::IndoorError;
use crate::renderer::{ControlHandle, RendererError, RendererHandle};

pub const GROUP_CLASSES: [&str; 2] = ["mapboxgl-ctrl", "mapboxgl-ctrl-group"];
pub const ICON_CLASS: &str = "mapboxgl-ctrl-icon";
pub const LAYER_CLASS: &str = "mapboxgl-ctrl-layer";
pub const LAYER_ACTIVE_CLASS: &str = "mapboxgl-ctrl-layer-active";
pub const FLOOR_CLASS: &str = "mapboxgl-ctrl-floor";
pub const FLOOR_ACTIVE_CLASS: &str = "mapboxgl-ctrl-floor-active";

pub fn floor_class(floor: FloorId) -> String {
    format!("{FLOOR_CLASS}-{floor}")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "floor", rename_all = "snake_case")]
pub enum ButtonAction {
    ShowFloors,
    HideFloors,
    SelectFloor(FloorId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonSpec {
    pub class_name: String,
    pub title: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonNode {
    pub classes: Vec<String>,
    pub title: String,
    pub aria_label: String,
    pub icon_class: &'static str,
    pub action: ButtonAction,
}

impl ButtonNode {
    fn from_spec(spec: &ButtonSpec) -> Self {
        Self {
            classes: spec.class_name.split_whitespace().map(str::to_string).collect(),
            title: spec.title.clone(),
            aria_label: spec.title.clone(),
            icon_class: ICON_CLASS,
            action: spec.action,
        }
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.classes.iter().any(|c| c == token)
    }

    pub fn add_class(&mut self, token: &str) {
        if !self.has_class(token) {
            self.classes.push(token.to_string());
        }
    }

    pub fn remove_class(&mut self, token: &str) {
        self.classes.retain(|c| c != token);
    }
}

/// Displayed control: a button group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlNode {
    pub classes: Vec<String>,
    pub buttons: Vec<ButtonNode>,
}

impl ControlNode {
    pub fn button(&self, index: usize) -> Option<&ButtonNode> {
        self.buttons.get(index)
    }

    pub fn indices_with_class<'a>(&'a self, token: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.buttons
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.has_class(token))
            .map(|(i, _)| i)
    }

    /// Index of the one button carrying `token`.
    ///
    /// Zero or several matches are an invariant violation.
    pub fn single_with_class(&self, token: &str) -> Result<usize, IndoorError> {
        let mut hits = self.indices_with_class(token);
        match (hits.next(), hits.next()) {
            (Some(idx), None) => Ok(idx),
            (None, _) => Err(IndoorError::InvariantViolation(format!(
                "no button carries class {token}"
            ))),
            (Some(_), Some(_)) => Err(IndoorError::InvariantViolation(format!(
                "several buttons carry class {token}"
            ))),
        }
    }
}

/// Button set for the given mode.
///
/// AllFloors: a single "Show floors" button. SingleFloor: "Hide floors" plus
/// one button per floor, top floor first, with the focused one marked active.
pub fn floor_buttons(floors: &FloorSet, mode: VisibilityMode) -> Vec<ButtonSpec> {
    let VisibilityMode::SingleFloor(focused) = mode else {
        return vec![ButtonSpec {
            class_name: LAYER_CLASS.to_string(),
            title: "Show floors".to_string(),
            action: ButtonAction::ShowFloors,
        }];
    };

    let mut out = Vec::with_capacity(floors.len() + 1);
    out.push(ButtonSpec {
        class_name: format!("{LAYER_CLASS} {LAYER_ACTIVE_CLASS}"),
        title: "Hide floors".to_string(),
        action: ButtonAction::HideFloors,
    });
    for floor in floors.descending() {
        let mut class_name = format!("{FLOOR_CLASS} {}", floor_class(floor));
        if floor == focused {
            class_name.push(' ');
            class_name.push_str(FLOOR_ACTIVE_CLASS);
        }
        out.push(ButtonSpec {
            class_name,
            title: floor.label(),
            action: ButtonAction::SelectFloor(floor),
        });
    }
    out
}

/// A button group that can be attached to and detached from a renderer.
#[derive(Debug, Default)]
pub struct ButtonControl {
    options: Vec<ButtonSpec>,
    attached: Option<(ControlHandle, ControlNode)>,
}

impl ButtonControl {
    pub fn new(options: Vec<ButtonSpec>) -> Self {
        Self {
            options,
            attached: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn node(&self) -> Option<&ControlNode> {
        self.attached.as_ref().map(|(_, node)| node)
    }

    /// Builds the display node and hands it to `host`. Attaching twice returns
    /// the existing node.
    pub fn attach<R: RendererHandle + ?Sized>(&mut self, host: &mut R) -> &ControlNode {
        let (_, node) = self.attached.get_or_insert_with(|| {
            let node = ControlNode {
                classes: GROUP_CLASSES.iter().map(|c| c.to_string()).collect(),
                buttons: self.options.iter().map(ButtonNode::from_spec).collect(),
            };
            let handle = host.add_control(&node);
            (handle, node)
        });
        node
    }

    pub fn detach<R: RendererHandle + ?Sized>(
        &mut self,
        host: &mut R,
    ) -> Result<(), RendererError> {
        if let Some((handle, _)) = self.attached.take() {
            host.remove_control(handle)?;
        }
        Ok(())
    }

    /// Moves the floor active marker onto `floor`'s button.
    pub fn mark_active_floor<R: RendererHandle + ?Sized>(
        &mut self,
        host: &mut R,
        floor: FloorId,
    ) -> Result<(), IndoorError> {
        let Some((handle, node)) = self.attached.as_mut() else {
            return Err(IndoorError::InvariantViolation(
                "floor control is not attached".to_string(),
            ));
        };

        let previous = node.single_with_class(FLOOR_ACTIVE_CLASS)?;
        let next = node.single_with_class(&floor_class(floor))?;
        node.buttons[previous].remove_class(FLOOR_ACTIVE_CLASS);
        node.buttons[next].add_class(FLOOR_ACTIVE_CLASS);
        host.update_control(*handle, node)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ButtonAction, ButtonControl, FLOOR_ACTIVE_CLASS, LAYER_ACTIVE_CLASS, floor_buttons,
    };
    use crate::error::IndoorError;
    use crate::memory::MemoryRenderer;
    use foundation::FloorId;
    use layers::{FloorSet, VisibilityMode};
    use pretty_assertions::assert_eq;

    fn floors() -> FloorSet {
        FloorSet::new(vec![FloorId(-1), FloorId(0), FloorId(1)]).unwrap()
    }

    #[test]
    fn all_floors_mode_has_one_show_button() {
        let buttons = floor_buttons(&floors(), VisibilityMode::AllFloors);
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].title, "Show floors");
        assert_eq!(buttons[0].action, ButtonAction::ShowFloors);
    }

    #[test]
    fn single_floor_mode_lists_floors_top_down() {
        let buttons = floor_buttons(&floors(), VisibilityMode::SingleFloor(FloorId(0)));
        let titles: Vec<_> = buttons.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Hide floors", "2F", "1F", "B1F"]);
        assert!(buttons[0].class_name.contains(LAYER_ACTIVE_CLASS));

        let active: Vec<_> = buttons
            .iter()
            .filter(|b| b.class_name.contains(FLOOR_ACTIVE_CLASS))
            .map(|b| b.action)
            .collect();
        assert_eq!(active, vec![ButtonAction::SelectFloor(FloorId(0))]);
    }

    #[test]
    fn attach_and_detach_round_trip_through_host() {
        let mut host = MemoryRenderer::default();
        let mut control = ButtonControl::new(floor_buttons(&floors(), VisibilityMode::AllFloors));

        let node = control.attach(&mut host).clone();
        assert_eq!(node.buttons[0].aria_label, "Show floors");
        assert_eq!(host.controls().count(), 1);

        control.attach(&mut host);
        assert_eq!(host.controls().count(), 1);

        control.detach(&mut host).unwrap();
        assert!(!control.is_attached());
        assert_eq!(host.controls().count(), 0);
    }

    #[test]
    fn marking_moves_the_single_active_marker() {
        let mut host = MemoryRenderer::default();
        let mut control = ButtonControl::new(floor_buttons(
            &floors(),
            VisibilityMode::SingleFloor(FloorId(0)),
        ));
        control.attach(&mut host);
        control.mark_active_floor(&mut host, FloorId(-1)).unwrap();

        let node = control.node().unwrap();
        let active: Vec<_> = node
            .indices_with_class(FLOOR_ACTIVE_CLASS)
            .map(|i| node.buttons[i].title.clone())
            .collect();
        assert_eq!(active, vec!["B1F".to_string()]);
        assert_eq!(host.controls().next(), Some(node));
    }

    #[test]
    fn marking_without_active_button_is_an_invariant_violation() {
        let mut host = MemoryRenderer::default();
        let mut control = ButtonControl::new(floor_buttons(&floors(), VisibilityMode::AllFloors));
        control.attach(&mut host);
        assert!(matches!(
            control.mark_active_floor(&mut host, FloorId(0)),
            Err(IndoorError::InvariantViolation(_))
        ));
    }
}
