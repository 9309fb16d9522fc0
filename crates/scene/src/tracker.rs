use foundation::{FeatureId, FloorId};

/// Outcome of replacing the content of a [`FeatureSlot`].
///
/// `cleared` is the previous occupant (if any), `set` the new one. Callers
/// must apply the clear before the set so two features are never flagged at
/// once.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SlotChange {
    pub cleared: Option<FeatureId>,
    pub set: Option<FeatureId>,
}

/// Single-slot feature tracker: holds 0 or 1 features, never more.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct FeatureSlot {
    current: Option<FeatureId>,
}

impl FeatureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<FeatureId> {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.current == Some(id)
    }

    pub fn replace(&mut self, next: Option<FeatureId>) -> SlotChange {
        let cleared = std::mem::replace(&mut self.current, next);
        SlotChange { cleared, set: next }
    }

    pub fn take(&mut self) -> Option<FeatureId> {
        self.current.take()
    }
}

/// Selection slot plus the floor of the last successful selection.
///
/// The remembered floor outlives the selection itself and survives
/// visibility-mode changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    slot: FeatureSlot,
    floor_for_selection: Option<FloorId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.slot.get()
    }

    pub fn floor_for_selection(&self) -> Option<FloorId> {
        self.floor_for_selection
    }

    pub fn replace(&mut self, next: Option<FeatureId>) -> SlotChange {
        self.slot.replace(next)
    }

    pub fn take(&mut self) -> Option<FeatureId> {
        self.slot.take()
    }

    pub fn remember_floor(&mut self, floor: FloorId) {
        self.floor_for_selection = Some(floor);
    }
}
