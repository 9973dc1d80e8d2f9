//! Estimate where a traveller will be at a given time of day.
//!
//! The estimate works in two passes. [`target_distance`] converts elapsed
//! driving time into distance using the coarse per-leg timings, assuming a
//! constant speed within each leg. [`position_along`] then walks the route
//! polyline until that distance is covered.
//!
//! # Examples
//! ```
//! use waymeal_core::{GeoPoint, Route, RouteLeg, TimeOfDay, estimator};
//!
//! let start = GeoPoint::new(0.0, 0.0);
//! let route = Route::from_parts(
//!     vec![RouteLeg::new(2_000.0, 120.0)],
//!     vec![start, GeoPoint::new(0.0, 0.01), GeoPoint::new(0.0, 0.02)],
//! );
//! let departure: TimeOfDay = "12:00".parse()?;
//! let eat_at: TimeOfDay = "12:01".parse()?;
//! let point = estimator::estimate_diner_point(departure, eat_at, start, &route);
//! assert_eq!(point, Some(GeoPoint::new(0.0, 0.01)));
//! # Ok::<(), waymeal_core::TimeParseError>(())
//! ```

use log::{debug, warn};

use crate::{GeoPoint, Route, RouteLeg, TimeOfDay, geometry::haversine_m};

/// Distance travelled after `target_elapsed_s` seconds of driving.
///
/// Scans `legs` in order and stops at the first leg whose cumulative end time
/// reaches the target, interpolating linearly inside that leg. When the
/// target lies beyond the last leg the total distance is returned.
///
/// Legs with a zero, negative or non-finite duration contribute no
/// interpolated distance, and unusable distances count as zero, so the result
/// is always finite and non-negative.
///
/// # Examples
/// ```
/// use waymeal_core::{RouteLeg, estimator::target_distance};
///
/// let legs = [RouteLeg::new(30_000.0, 3_600.0), RouteLeg::new(20_000.0, 1_800.0)];
/// assert_eq!(target_distance(&legs, 1_800.0), 15_000.0);
/// assert_eq!(target_distance(&legs, 3_600.0), 30_000.0);
/// ```
#[must_use]
pub fn target_distance(legs: &[RouteLeg], target_elapsed_s: f64) -> f64 {
    let target = finite_non_negative(target_elapsed_s);
    let mut elapsed = 0.0;
    let mut travelled = 0.0;
    for leg in legs {
        let duration = finite_non_negative(leg.duration_s);
        let distance = finite_non_negative(leg.distance_m);
        let elapsed_after = elapsed + duration;
        if elapsed_after >= target {
            let overshoot = elapsed_after - target;
            let into_leg = if duration > 0.0 {
                distance * (duration - overshoot) / duration
            } else {
                0.0
            };
            return travelled + into_leg.clamp(0.0, distance);
        }
        elapsed = elapsed_after;
        travelled += distance;
    }
    debug!("target time {target}s is beyond the route ({elapsed}s); using route end");
    travelled
}

/// The first polyline point at which the walked distance exceeds
/// `target_distance_m`.
///
/// The walk starts at `start`, so the gap between the trip start and the
/// first polyline point counts towards the distance. Returns the last point when the polyline is exhausted first, and `start`
/// when the polyline has fewer than two points.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, estimator::position_along};
///
/// let start = GeoPoint::new(1.0, 1.0);
/// assert_eq!(position_along(start, &[], 500.0), start);
/// assert_eq!(position_along(start, &[GeoPoint::new(2.0, 2.0)], 500.0), start);
/// ```
#[must_use]
pub fn position_along(start: GeoPoint, polyline: &[GeoPoint], target_distance_m: f64) -> GeoPoint {
    let Some(last) = polyline.last() else {
        return start;
    };
    if polyline.len() < 2 {
        return start;
    }
    let mut walked = 0.0;
    let mut previous = start;
    for &point in polyline {
        walked += haversine_m(previous, point);
        if walked > target_distance_m {
            return point;
        }
        previous = point;
    }
    *last
}

/// Estimated position at `eat_at` for a trip leaving `start` at `departure`.
///
/// Returns `None` unless `eat_at` is strictly after `departure` on the same
/// day.
#[must_use]
pub fn estimate_diner_point(
    departure: TimeOfDay,
    eat_at: TimeOfDay,
    start: GeoPoint,
    route: &Route,
) -> Option<GeoPoint> {
    if eat_at <= departure {
        debug!("eating time {eat_at} is not after departure {departure}");
        return None;
    }
    let elapsed = f64::from(eat_at.seconds() - departure.seconds());
    if route.legs.is_empty() {
        warn!("route has no instructions; diner estimate falls back to the polyline end");
    }
    let target = target_distance(&route.legs, elapsed);
    Some(position_along(start, &route.polyline, target))
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
