//! Great-circle distance helpers.
//!
//! The estimator and the restaurant selector both measure distance with
//! [`haversine_m`], so positions along a route and restaurant rankings share
//! one model of the Earth.

use geo::{Coord, Rect};

use crate::GeoPoint;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Lower bound on the length of one degree in metres, keeping envelopes
/// slightly larger than the haversine radius.
const METRES_PER_DEGREE: f64 = 111_000.0;

/// Haversine great-circle distance between two points in metres.
///
/// The result is symmetric, never negative and zero for identical points.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, geometry::haversine_m};
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 1.0);
/// let d = haversine_m(a, b);
/// assert!((d - 111_195.0).abs() < 1.0);
/// assert_eq!(haversine_m(a, a), 0.0);
/// ```
#[must_use]
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let h = sin_lat.mul_add(sin_lat, lat1.cos() * lat2.cos() * sin_lon * sin_lon);
    // Rounding can push `h` fractionally outside [0, 1] for antipodal points.
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Sum of haversine distances along consecutive points.
#[must_use]
pub fn path_length_m(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| match pair {
            [a, b] => haversine_m(*a, *b),
            _ => 0.0,
        })
        .sum()
}

/// Axis-aligned envelope that contains every point within `radius_m` of
/// `center`.
///
/// The rectangle lives in lon/lat degree space (`x = longitude`) and is a
/// conservative pre-filter; callers still apply [`haversine_m`] for the exact
/// test. Longitude padding widens towards the poles and is capped at a full
/// turn.
#[must_use]
pub fn bounding_box(center: GeoPoint, radius_m: f64) -> Rect<f64> {
    let radius = if radius_m.is_finite() {
        radius_m.max(0.0)
    } else {
        0.0
    };
    let lat_pad = radius / METRES_PER_DEGREE;
    let cos_lat = center.latitude.to_radians().cos().abs();
    let lon_pad = if cos_lat > f64::EPSILON {
        (lat_pad / cos_lat).min(360.0)
    } else {
        360.0
    };
    Rect::new(
        Coord {
            x: center.longitude - lon_pad,
            y: center.latitude - lat_pad,
        },
        Coord {
            x: center.longitude + lon_pad,
            y: center.latitude + lat_pad,
        },
    )
}

/// Envelopes covering every point within `radius_m` of `center`, folded
/// back into `[-180, 180]` longitude.
///
/// A [`bounding_box`] that crosses the antimeridian is split into one
/// rectangle on each side. A box at least a full turn wide becomes a single
/// rectangle spanning every longitude.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, geometry::search_envelopes};
///
/// assert_eq!(search_envelopes(GeoPoint::new(48.85, 2.35), 2_000.0).len(), 1);
/// assert_eq!(search_envelopes(GeoPoint::new(0.0, 179.999), 2_000.0).len(), 2);
/// ```
#[must_use]
pub fn search_envelopes(center: GeoPoint, radius_m: f64) -> Vec<Rect<f64>> {
    let bbox = bounding_box(center, radius_m);
    let (min, max) = (bbox.min(), bbox.max());
    let span = |min_x: f64, max_x: f64| {
        Rect::new(Coord { x: min_x, y: min.y }, Coord { x: max_x, y: max.y })
    };
    if max.x - min.x >= 360.0 {
        vec![span(-180.0, 180.0)]
    } else if min.x < -180.0 {
        vec![span(-180.0, max.x), span(min.x + 360.0, 180.0)]
    } else if max.x > 180.0 {
        vec![span(min.x, 180.0), span(-180.0, max.x - 360.0)]
    } else {
        vec![bbox]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Intersects;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn paris_to_london_is_about_344_km() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);
        let d = haversine_m(paris, london);
        assert!((d - 343_550.0).abs() < 1_000.0, "got {d}");
    }

    #[rstest]
    fn path_length_sums_segments() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 2.0),
        ];
        let total = path_length_m(&points);
        let expected = 2.0 * haversine_m(points[0], points[1]);
        assert!((total - expected).abs() < 1e-6);
        assert_eq!(path_length_m(&points[..1]), 0.0);
        assert_eq!(path_length_m(&[]), 0.0);
    }

    #[rstest]
    fn bounding_box_contains_points_at_radius() {
        let center = GeoPoint::new(48.85, 2.35);
        let bbox = bounding_box(center, 2_000.0);
        let north = GeoPoint::new(48.85 + 1_999.0 / 111_195.0, 2.35);
        assert!(bbox.intersects(&Coord::from(north)));
        assert!(bbox.intersects(&Coord::from(center)));
        let far = GeoPoint::new(48.95, 2.35);
        assert!(!bbox.intersects(&Coord::from(far)));
    }

    #[rstest]
    fn bounding_box_tolerates_invalid_radius() {
        let center = GeoPoint::new(10.0, 10.0);
        let bbox = bounding_box(center, f64::NAN);
        assert_eq!(bbox.min(), bbox.max());
    }

    #[rstest]
    #[case(GeoPoint::new(0.0, 179.999), GeoPoint::new(0.0, -179.999))]
    #[case(GeoPoint::new(0.0, -179.999), GeoPoint::new(0.0, 179.999))]
    #[case(GeoPoint::new(-16.5, 179.995), GeoPoint::new(-16.5, -179.995))]
    fn envelopes_reach_across_the_antimeridian(
        #[case] center: GeoPoint,
        #[case] other: GeoPoint,
    ) {
        let radius = haversine_m(center, other) + 1.0;
        assert!(radius < 2_000.0, "points should be close, got {radius}");

        let envelopes = search_envelopes(center, radius);

        assert_eq!(envelopes.len(), 2);
        assert!(envelopes.iter().any(|e| e.intersects(&Coord::from(other))));
        assert!(envelopes.iter().any(|e| e.intersects(&Coord::from(center))));
        assert!(
            envelopes
                .iter()
                .all(|e| e.min().x >= -180.0 && e.max().x <= 180.0)
        );
    }

    #[rstest]
    fn envelope_away_from_the_antimeridian_is_the_bounding_box() {
        let center = GeoPoint::new(48.85, 2.35);
        assert_eq!(
            search_envelopes(center, 2_000.0),
            vec![bounding_box(center, 2_000.0)]
        );
    }

    #[rstest]
    fn polar_envelope_spans_every_longitude() {
        let envelopes = search_envelopes(GeoPoint::new(90.0, 10.0), 1_000.0);
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].min().x, -180.0);
        assert_eq!(envelopes[0].max().x, 180.0);
    }

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-89.0..89.0_f64, -179.0..179.0_f64).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in point(), b in point()) {
            let ab = haversine_m(a, b);
            let ba = haversine_m(b, a);
            prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
        }

        #[test]
        fn distance_is_non_negative_and_zero_on_identity(a in point(), b in point()) {
            prop_assert!(haversine_m(a, b) >= 0.0);
            prop_assert_eq!(haversine_m(a, a), 0.0);
        }
    }
}
