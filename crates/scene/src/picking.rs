use foundation::math::{LngLat, distance, stable_total_cmp_f64};

use crate::feature::Feature;

/// Resolves overlapping pointer candidates to a single feature.
///
/// Ordering contract:
/// - The candidate whose center of mass is closest to `pointer` wins.
/// - Ties resolve to the earliest candidate in input order.
/// - Candidates without geometry rank behind every candidate with geometry.
///
/// Distance is great-circle meters, not planar degrees, so a degree of
/// longitude counts for less away from the equator.
pub fn nearest_by_center_of_mass(candidates: &[Feature], pointer: LngLat) -> Option<&Feature> {
    let mut best: Option<(f64, &Feature)> = None;

    for feature in candidates {
        let d = feature
            .center_of_mass()
            .map(|c| distance(c, pointer))
            .unwrap_or(f64::INFINITY);

        best = match best {
            None => Some((d, feature)),
            Some((bd, bf)) => {
                if stable_total_cmp_f64(d, bd).is_lt() {
                    Some((d, feature))
                } else {
                    Some((bd, bf))
                }
            }
        };
    }

    best.map(|(_, f)| f)
}
