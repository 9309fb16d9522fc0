use serde::{Deserialize, Serialize};

/// Building level index. Negative values are below ground.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FloorId(pub i32);

impl FloorId {
    pub const fn new(n: i32) -> Self {
        FloorId(n)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn is_underground(self) -> bool {
        self.0 < 0
    }

    /// Human-facing level name: `0 -> "1F"`, `2 -> "3F"`, `-1 -> "B1F"`.
    pub fn label(self) -> String {
        if self.is_underground() {
            format!("B{}F", self.0.unsigned_abs())
        } else {
            format!("{}F", i64::from(self.0) + 1)
        }
    }
}

impl std::fmt::Display for FloorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feature identifier scoped to one vector source layer.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl FeatureId {
    pub const fn new(n: u64) -> Self {
        FeatureId(n)
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureId, FloorId};

    #[test]
    fn floor_labels_follow_building_convention() {
        assert_eq!(FloorId(0).label(), "1F");
        assert_eq!(FloorId(3).label(), "4F");
        assert_eq!(FloorId(-1).label(), "B1F");
        assert_eq!(FloorId(-7).label(), "B7F");
    }

    #[test]
    fn extreme_floor_labels_do_not_overflow() {
        assert_eq!(FloorId(i32::MIN).label(), "B2147483648F");
        assert_eq!(FloorId(i32::MAX).label(), "2147483648F");
    }

    #[test]
    fn display_is_raw_index() {
        assert_eq!(FloorId(-2).to_string(), "-2");
        assert_eq!(FeatureId(42).to_string(), "42");
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&FloorId(-3)).unwrap(), "-3");
        let id: FeatureId = serde_json::from_str("42").unwrap();
        assert_eq!(id, FeatureId(42));
    }
}
