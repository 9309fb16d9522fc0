use foundation::{FeatureId, FloorId};
use serde_json::{Value, json};

use crate::feature::{CLASS_KEY, FLOOR_ID_KEY, Feature, TYPE_KEY};

/// Feature predicate shared by layer filters and feature queries.
///
/// `matches` evaluates against loaded features; `to_expression` exports the
/// same predicate in the renderer's JSON expression syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureFilter {
    All(Vec<FeatureFilter>),
    Any(Vec<FeatureFilter>),
    IdEq(FeatureId),
    PropertyEq { key: String, value: Value },
    PropertyNe { key: String, value: Value },
}

impl FeatureFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        FeatureFilter::PropertyEq {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn ne(key: impl Into<String>, value: impl Into<Value>) -> Self {
        FeatureFilter::PropertyNe {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn on_floor(floor: FloorId) -> Self {
        Self::eq(FLOOR_ID_KEY, floor.get())
    }

    /// Floor slab and non-room areas of one floor.
    pub fn floor_area(floor: FloorId) -> Self {
        FeatureFilter::All(vec![
            Self::on_floor(floor),
            FeatureFilter::Any(vec![
                FeatureFilter::All(vec![Self::eq(CLASS_KEY, "area"), Self::ne(TYPE_KEY, "Room")]),
                Self::eq(CLASS_KEY, "floor"),
            ]),
        ])
    }

    /// Everything on one floor that is neither slab nor a non-room area.
    pub fn rooms(floor: FloorId) -> Self {
        FeatureFilter::All(vec![
            Self::on_floor(floor),
            FeatureFilter::All(vec![
                FeatureFilter::Any(vec![Self::ne(CLASS_KEY, "area"), Self::eq(TYPE_KEY, "Room")]),
                Self::ne(CLASS_KEY, "floor"),
            ]),
        ])
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            FeatureFilter::All(filters) => filters.iter().all(|f| f.matches(feature)),
            FeatureFilter::Any(filters) => filters.iter().any(|f| f.matches(feature)),
            FeatureFilter::IdEq(id) => feature.id == *id,
            FeatureFilter::PropertyEq { key, value } => {
                feature.property(key).is_some_and(|v| values_equal(v, value))
            }
            FeatureFilter::PropertyNe { key, value } => {
                !feature.property(key).is_some_and(|v| values_equal(v, value))
            }
        }
    }

    pub fn to_expression(&self) -> Value {
        match self {
            FeatureFilter::All(filters) => {
                let mut out = vec![json!("all")];
                out.extend(filters.iter().map(|f| f.to_expression()));
                Value::Array(out)
            }
            FeatureFilter::Any(filters) => {
                let mut out = vec![json!("any")];
                out.extend(filters.iter().map(|f| f.to_expression()));
                Value::Array(out)
            }
            FeatureFilter::IdEq(id) => json!(["==", ["id"], id.0]),
            FeatureFilter::PropertyEq { key, value } => json!(["==", ["get", key], value]),
            FeatureFilter::PropertyNe { key, value } => json!(["!=", ["get", key], value]),
        }
    }
}

// Numbers compare by value so `1` and `1.0` are the same floor.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureFilter;
    use crate::feature::Feature;
    use foundation::{FeatureId, FloorId};
    use serde_json::json;

    fn feature(floor: i32, class: &str, kind: &str) -> Feature {
        Feature::new(FeatureId(1))
            .with_floor(FloorId(floor))
            .with_property("class", class)
            .with_property("type", kind)
    }

    #[test]
    fn floor_area_and_rooms_partition_a_floor() {
        let cases = [
            (feature(0, "floor", "Floor"), true),
            (feature(0, "area", "Corridor"), true),
            (feature(0, "area", "Room"), false),
            (feature(0, "wall", "Wall"), false),
        ];
        for (f, is_area) in cases {
            assert_eq!(FeatureFilter::floor_area(FloorId(0)).matches(&f), is_area, "{f:?}");
            assert_eq!(FeatureFilter::rooms(FloorId(0)).matches(&f), !is_area, "{f:?}");
        }
    }

    #[test]
    fn floor_gate_rejects_other_floors() {
        let f = feature(1, "area", "Room");
        assert!(!FeatureFilter::rooms(FloorId(0)).matches(&f));
        assert!(FeatureFilter::rooms(FloorId(1)).matches(&f));
    }

    #[test]
    fn numeric_properties_compare_by_value() {
        let f = Feature::new(FeatureId(1)).with_property("floor_id", 2.0);
        assert!(FeatureFilter::on_floor(FloorId(2)).matches(&f));
    }

    #[test]
    fn missing_property_is_not_equal() {
        let f = Feature::new(FeatureId(1));
        assert!(!FeatureFilter::eq("class", "area").matches(&f));
        assert!(FeatureFilter::ne("class", "area").matches(&f));
    }

    #[test]
    fn id_filter() {
        let f = Feature::new(FeatureId(42));
        assert!(FeatureFilter::IdEq(FeatureId(42)).matches(&f));
        assert!(!FeatureFilter::IdEq(FeatureId(7)).matches(&f));
        assert_eq!(
            FeatureFilter::IdEq(FeatureId(42)).to_expression(),
            json!(["==", ["id"], 42])
        );
    }

    #[test]
    fn exports_expression_syntax() {
        assert_eq!(
            FeatureFilter::floor_area(FloorId(-1)).to_expression(),
            json!([
                "all",
                ["==", ["get", "floor_id"], -1],
                [
                    "any",
                    ["all", ["==", ["get", "class"], "area"], ["!=", ["get", "type"], "Room"]],
                    ["==", ["get", "class"], "floor"]
                ]
            ])
        );
    }
}
