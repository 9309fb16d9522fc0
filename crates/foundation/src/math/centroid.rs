use super::{LngLat, Vec2};

/// Area-weighted centroid of a polygon given as rings (outer ring first).
///
/// Holes are ignored. A closing duplicate vertex is tolerated. Degenerate
/// rings with zero area fall back to the vertex mean; an empty ring yields
/// `None`.
pub fn center_of_mass(rings: &[Vec<LngLat>]) -> Option<LngLat> {
    let outer = rings.first()?;
    let mut pts: Vec<Vec2> = outer.iter().map(|p| p.as_vec2()).collect();
    drop_closing_duplicate(&mut pts);
    if pts.is_empty() {
        return None;
    }

    let mean = vertex_mean(&pts);
    if pts.len() < 3 {
        return Some(mean.into());
    }

    // Work relative to the vertex mean to keep the products small.
    let mut twice_area = 0.0;
    let mut acc = Vec2::new(0.0, 0.0);
    for i in 0..pts.len() {
        let a = pts[i] - mean;
        let b = pts[(i + 1) % pts.len()] - mean;
        let cross = a.perp_dot(b);
        twice_area += cross;
        acc = acc + (a + b).scale(cross);
    }

    if twice_area.abs() < 1e-18 {
        return Some(mean.into());
    }

    let c = acc.scale(1.0 / (3.0 * twice_area));
    Some((mean + c).into())
}

fn vertex_mean(pts: &[Vec2]) -> Vec2 {
    let mut sum = Vec2::new(0.0, 0.0);
    for p in pts {
        sum = sum + *p;
    }
    sum.scale(1.0 / pts.len() as f64)
}

fn drop_closing_duplicate(points: &mut Vec<Vec2>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.x - last.x).abs() < 1e-12 && (first.y - last.y).abs() < 1e-12 {
            points.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::center_of_mass;
    use crate::math::LngLat;

    fn ring(coords: &[[f64; 2]]) -> Vec<LngLat> {
        coords.iter().map(|c| LngLat::from(*c)).collect()
    }

    fn assert_close(a: LngLat, b: LngLat) {
        assert!(
            (a.lng - b.lng).abs() < 1e-9 && (a.lat - b.lat).abs() < 1e-9,
            "expected {a:?} ~= {b:?}"
        );
    }

    #[test]
    fn square_centroid() {
        let sq = ring(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]);
        assert_close(center_of_mass(&[sq]).unwrap(), LngLat::new(1.0, 1.0));
    }

    #[test]
    fn weights_by_area_not_vertices() {
        // L-shape: vertex mean differs from the area centroid.
        let l = ring(&[
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 1.0],
            [1.0, 1.0],
            [1.0, 4.0],
            [0.0, 4.0],
        ]);
        // Two rectangles: 4x1 at (2, 0.5) and 1x3 at (0.5, 2.5); total area 7.
        let expected = LngLat::new((4.0 * 2.0 + 3.0 * 0.5) / 7.0, (4.0 * 0.5 + 3.0 * 2.5) / 7.0);
        assert_close(center_of_mass(&[l]).unwrap(), expected);
    }

    #[test]
    fn winding_does_not_matter() {
        let cw = ring(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]]);
        assert_close(center_of_mass(&[cw]).unwrap(), LngLat::new(1.0, 1.0));
    }

    #[test]
    fn degenerate_rings_fall_back_to_mean() {
        let line = ring(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_close(center_of_mass(&[line]).unwrap(), LngLat::new(1.0, 1.0));
        assert!(center_of_mass(&[]).is_none());
        assert!(center_of_mass(&[Vec::new()]).is_none());
    }
}
