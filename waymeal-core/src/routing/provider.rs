//! Route provider trait for start/end waypoint pairs.

use crate::{GeoPoint, Route};

use super::error::RouteError;

/// Compute a driving route between two waypoints.
///
/// Implementations must return legs in travel order and a polyline in
/// latitude/longitude order. Providers are shared across threads, so they
/// must be `Send + Sync`.
///
/// # Examples
///
/// ```rust
/// use waymeal_core::{GeoPoint, Route, RouteError, RouteLeg, RouteProvider};
///
/// struct StraightLine;
///
/// impl RouteProvider for StraightLine {
///     fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
///         let metres = waymeal_core::geometry::haversine_m(start, end);
///         Ok(Route::from_parts(
///             vec![RouteLeg::new(metres, metres / 25.0)],
///             vec![start, end],
///         ))
///     }
/// }
///
/// let route = StraightLine.route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0))?;
/// assert_eq!(route.polyline.len(), 2);
/// # Ok::<(), RouteError>(())
/// ```
pub trait RouteProvider: Send + Sync {
    /// Return a route from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the service is unreachable, rejects the
    /// request or finds no route.
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError>;
}

impl<T: RouteProvider + ?Sized> RouteProvider for &T {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        (**self).route(start, end)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        (**self).route(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::{FailingRouteProvider, LinearRouteProvider};

    #[rstest]
    fn linear_provider_joins_waypoints() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(0.0, 0.1);
        let route = LinearRouteProvider::default()
            .route(start, end)
            .expect("linear route");
        assert_eq!(route.origin(), Some(start));
        assert_eq!(route.destination(), Some(end));
        assert!(route.summary.total_distance_m > 0.0);
        assert!(!route.legs.is_empty());
    }

    #[rstest]
    fn failing_provider_surfaces_error() {
        let provider = FailingRouteProvider::new(RouteError::NoRoute);
        let err = (&provider)
            .route(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0))
            .expect_err("should fail");
        assert_eq!(err, RouteError::NoRoute);
    }
}
