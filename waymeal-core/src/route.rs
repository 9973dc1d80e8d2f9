//! Driving routes returned by a routing service.
//!
//! A [`Route`] carries the aggregate [`RouteSummary`], the ordered
//! turn-by-turn [`RouteLeg`] instructions and the full polyline. Legs are
//! coarser than the polyline: one leg spans many polyline points.

use crate::GeoPoint;

/// One maneuver segment of a route.
///
/// # Examples
/// ```
/// use waymeal_core::RouteLeg;
///
/// let leg = RouteLeg::new(30_000.0, 1_800.0);
/// assert_eq!(leg.distance_m, 30_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Distance covered by the leg in metres.
    pub distance_m: f64,
    /// Time taken to drive the leg in seconds.
    pub duration_s: f64,
}

impl RouteLeg {
    /// Construct a leg from distance and duration.
    #[must_use]
    pub const fn new(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_m,
            duration_s,
        }
    }
}

/// Route totals as reported by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Total driving distance in metres.
    pub total_distance_m: f64,
    /// Total driving time in seconds.
    pub total_duration_s: f64,
}

/// A computed route between two waypoints.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, Route, RouteLeg};
///
/// let route = Route::from_parts(
///     vec![RouteLeg::new(1_000.0, 60.0), RouteLeg::new(500.0, 30.0)],
///     vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)],
/// );
/// assert_eq!(route.summary.total_distance_m, 1_500.0);
/// assert_eq!(route.summary.total_duration_s, 90.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Aggregate distance and duration.
    pub summary: RouteSummary,
    /// Turn-by-turn instructions in travel order.
    pub legs: Vec<RouteLeg>,
    /// Geometric path from start to end.
    pub polyline: Vec<GeoPoint>,
}

impl Route {
    /// Construct a route with an explicit summary.
    #[must_use]
    pub const fn new(summary: RouteSummary, legs: Vec<RouteLeg>, polyline: Vec<GeoPoint>) -> Self {
        Self {
            summary,
            legs,
            polyline,
        }
    }

    /// Construct a route whose summary is the sum of its legs.
    #[must_use]
    pub fn from_parts(legs: Vec<RouteLeg>, polyline: Vec<GeoPoint>) -> Self {
        let summary = RouteSummary {
            total_distance_m: legs.iter().map(|leg| leg.distance_m).sum(),
            total_duration_s: legs.iter().map(|leg| leg.duration_s).sum(),
        };
        Self::new(summary, legs, polyline)
    }

    /// The first polyline point, if any.
    #[must_use]
    pub fn origin(&self) -> Option<GeoPoint> {
        self.polyline.first().copied()
    }

    /// The last polyline point, if any.
    #[must_use]
    pub fn destination(&self) -> Option<GeoPoint> {
        self.polyline.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn from_parts_sums_legs() {
        let route = Route::from_parts(
            vec![RouteLeg::new(30_000.0, 1_800.0), RouteLeg::new(20_000.0, 1_800.0)],
            Vec::new(),
        );
        assert_eq!(route.summary.total_distance_m, 50_000.0);
        assert_eq!(route.summary.total_duration_s, 3_600.0);
    }

    #[rstest]
    fn endpoints_follow_polyline() {
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(2.0, 2.0);
        let route = Route::from_parts(Vec::new(), vec![a, b]);
        assert_eq!(route.origin(), Some(a));
        assert_eq!(route.destination(), Some(b));
        assert_eq!(Route::default().origin(), None);
    }
}
