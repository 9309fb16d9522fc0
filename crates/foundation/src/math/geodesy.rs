use serde::{Deserialize, Serialize};

use super::Vec2;

/// Mean Earth radius (meters), matching the usual GeoJSON tooling convention.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic position in degrees. Serializes as `[lng, lat]`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.lng, self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        coordinate_of(p)
    }
}

impl From<Vec2> for LngLat {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// `[lng, lat]` pair for a point.
pub fn coordinate_of(p: LngLat) -> [f64; 2] {
    [p.lng, p.lat]
}

/// Great-circle (haversine) distance in meters.
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{EARTH_RADIUS_M, LngLat, coordinate_of, distance};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn distance_is_zero_for_same_point() {
        let p = LngLat::new(139.767, 35.6814);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = LngLat::new(0.0, 0.0);
        let b = LngLat::new(0.0, 1.0);
        assert_close(distance(a, b), EARTH_RADIUS_M.to_radians(), 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LngLat::new(139.7670, 35.6814);
        let b = LngLat::new(139.7700, 35.6800);
        assert_close(distance(a, b), distance(b, a), 1e-9);
    }

    #[test]
    fn serializes_as_pair() {
        let p = LngLat::new(139.767, 35.6814);
        assert_eq!(coordinate_of(p), [139.767, 35.6814]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[139.767,35.6814]");
        let back: LngLat = serde_json::from_str("[1.5,-2.0]").unwrap();
        assert_eq!(back, LngLat::new(1.5, -2.0));
    }
}
