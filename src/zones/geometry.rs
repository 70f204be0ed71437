//! Ring geometry for delivery-zone boundaries.
//!
//! Coordinates follow the GeoJSON convention everywhere: `x` is longitude,
//! `y` is latitude. Rings are stored in traversal order; a closed ring
//! repeats its first point as its last.
//!
//! All functions here are total: invalid input degrades to a defined safe
//! value (`false`, `0.0`, or an unchanged ring) rather than an error.
//! Callers that need to distinguish "degenerate" from "zero-area" must
//! check [`is_valid_ring`] first.

use geo::Coord;

/// Mean Earth radius in kilometers, as used by the area approximation.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A zone boundary ring: ordered `(lng, lat)` coordinates.
pub type Ring = Vec<Coord<f64>>;

/// Check that a ring is well-formed: at least 4 points (3 distinct
/// vertices plus the closing duplicate) with first == last.
///
/// Closure is tested with exact equality on both components. Winding
/// direction does not matter.
pub fn is_valid_ring(ring: &[Coord<f64>]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}

/// Close a ring by appending a copy of its first point when first != last.
/// Already-closed (and empty) rings pass through unchanged, so the
/// operation is idempotent.
pub fn close_ring(mut ring: Ring) -> Ring {
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    ring
}

/// Approximate the area enclosed by a closed ring, in square kilometers.
///
/// Returns `0.0` for any ring failing [`is_valid_ring`]. Uses the
/// spherical Shoelace formula over consecutive vertex pairs, which is
/// adequate for city-sized zones; there is no ellipsoid correction. The
/// magnitude is independent of winding direction.
pub fn area_sq_km(ring: &[Coord<f64>]) -> f64 {
    if !is_valid_ring(ring) {
        return 0.0;
    }

    let mut sum = 0.0;
    for edge in ring.windows(2) {
        let (p1, p2) = (edge[0], edge[1]);
        sum += (p2.x - p1.x).to_radians()
            * (2.0 + p1.y.to_radians().sin() + p2.y.to_radians().sin());
    }

    (sum * EARTH_RADIUS_KM * EARTH_RADIUS_KM / 2.0).abs()
}

/// Even-odd ray-casting containment test.
///
/// NOTE: the query point arrives as `(lat, lng)`, the opposite of the
/// `(lng, lat)` ring storage order. This mirrors the lookup-by-coordinates
/// call it serves; keep the inversion in mind at call sites.
///
/// Returns `false` for any ring failing [`is_valid_ring`]. Points exactly
/// on an edge or vertex get no special treatment; their membership is
/// whatever the ray cast yields.
pub fn contains(ring: &[Coord<f64>], lat: f64, lng: f64) -> bool {
    if !is_valid_ring(ring) {
        return false;
    }

    let (x, y) = (lng, lat);
    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Closed 10x10 square, (lng, lat) order.
    fn square() -> Ring {
        vec![
            coord(0.0, 0.0),
            coord(0.0, 10.0),
            coord(10.0, 10.0),
            coord(10.0, 0.0),
            coord(0.0, 0.0),
        ]
    }

    /// Closed 5-point ring over lower Manhattan.
    fn nyc_ring() -> Ring {
        vec![
            coord(-74.0060, 40.7128),
            coord(-74.0160, 40.7228),
            coord(-73.9960, 40.7328),
            coord(-73.9860, 40.7228),
            coord(-74.0060, 40.7128),
        ]
    }

    #[test]
    fn valid_ring_either_winding() {
        let mut ring = square();
        assert!(is_valid_ring(&ring));
        ring.reverse();
        assert!(is_valid_ring(&ring));
    }

    #[test]
    fn invalid_when_empty_or_short() {
        assert!(!is_valid_ring(&[]));
        let triangle = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(0.0, 1.0)];
        assert!(!is_valid_ring(&triangle));
    }

    #[test]
    fn invalid_when_open() {
        let open = vec![
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(1.0, 1.0),
            coord(0.0, 1.0),
        ];
        assert!(!is_valid_ring(&open));
    }

    #[test]
    fn close_ring_appends_first_point() {
        let open = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0)];
        let closed = close_ring(open);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());
    }

    #[test]
    fn close_ring_is_idempotent() {
        let once = close_ring(square());
        let twice = close_ring(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn close_ring_empty_passthrough() {
        assert!(close_ring(Vec::new()).is_empty());
    }

    #[test]
    fn area_zero_for_invalid_ring() {
        let triangle = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(0.0, 1.0)];
        assert_eq!(area_sq_km(&triangle), 0.0);
        assert_eq!(area_sq_km(&[]), 0.0);
    }

    #[test]
    fn area_independent_of_winding() {
        let ring = nyc_ring();
        let mut reversed = ring.clone();
        reversed.reverse();
        // Summation order flips with the winding, so allow rounding drift.
        assert_relative_eq!(area_sq_km(&ring), area_sq_km(&reversed), max_relative = 1e-9);
    }

    #[test]
    fn area_nyc_ring_regression() {
        // Pinned against the recorded output of the reference formula.
        let area = area_sq_km(&nyc_ring());
        assert_relative_eq!(area, 2.811180003628209, max_relative = 1e-9);
    }

    #[test]
    fn contains_inside_square() {
        assert!(contains(&square(), 5.0, 5.0));
    }

    #[test]
    fn contains_outside_square() {
        assert!(!contains(&square(), 20.0, 20.0));
        assert!(!contains(&square(), -1.0, 5.0));
        assert!(!contains(&square(), 5.0, -1.0));
    }

    #[test]
    fn contains_false_for_invalid_ring() {
        let open = vec![coord(0.0, 0.0), coord(10.0, 0.0), coord(10.0, 10.0)];
        assert!(!contains(&open, 5.0, 5.0));
    }

    #[test]
    fn contains_nyc_center() {
        // Centroid-ish point of the lower-Manhattan ring.
        assert!(contains(&nyc_ring(), 40.7200, -74.0010));
        assert!(!contains(&nyc_ring(), 40.7128, -73.9000));
    }
}
