//! Test-only, in-memory collaborators used by unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    GeoPoint, GeolocationError, LocationProvider, PoiQuery, PoiSource, PoiSourceError,
    PointOfInterest, RawFeature, Route, RouteError, RouteLeg, RouteProvider,
    geometry::haversine_m,
};

/// In-memory `PoiSource` answering radius queries with a linear scan.
///
/// Features whose location cannot be resolved are always returned so that
/// normalisation can be exercised downstream. Features without an `amenity`
/// property match any amenity.
#[derive(Debug, Default)]
pub struct MemoryPoiSource {
    features: Vec<RawFeature>,
    failure: Option<PoiSourceError>,
    calls: AtomicUsize,
}

impl MemoryPoiSource {
    /// Create a source from a collection of features.
    pub fn with_features<I>(features: I) -> Self
    where
        I: IntoIterator<Item = RawFeature>,
    {
        Self {
            features: features.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a source that fails every query with `error`.
    pub fn failing(error: PoiSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of queries received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PoiSource for MemoryPoiSource {
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .features
            .iter()
            .filter(|raw| {
                raw.property_str("amenity")
                    .is_none_or(|amenity| amenity == query.amenity)
            })
            .filter(|raw| {
                PointOfInterest::from_raw(raw).map_or(true, |poi| {
                    haversine_m(query.center, poi.location) <= query.radius_m
                })
            })
            .cloned()
            .collect())
    }
}

/// Deterministic `RouteProvider` drawing a straight line at constant speed.
///
/// The line is split into equal segments; each segment becomes one leg.
#[derive(Debug, Clone, Copy)]
pub struct LinearRouteProvider {
    /// Number of polyline segments.
    pub segments: u32,
    /// Driving speed in metres per second.
    pub speed_mps: f64,
}

impl Default for LinearRouteProvider {
    fn default() -> Self {
        Self {
            segments: 10,
            speed_mps: 20.0,
        }
    }
}

impl RouteProvider for LinearRouteProvider {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        let segments = self.segments.max(1);
        let polyline: Vec<GeoPoint> = (0..=segments)
            .map(|i| {
                let t = f64::from(i) / f64::from(segments);
                GeoPoint::new(
                    (end.latitude - start.latitude).mul_add(t, start.latitude),
                    (end.longitude - start.longitude).mul_add(t, start.longitude),
                )
            })
            .collect();
        let legs = polyline
            .windows(2)
            .filter_map(|pair| match pair {
                [a, b] => {
                    let metres = haversine_m(*a, *b);
                    Some(RouteLeg::new(metres, metres / self.speed_mps))
                }
                _ => None,
            })
            .collect();
        Ok(Route::from_parts(legs, polyline))
    }
}

/// `RouteProvider` that fails every request with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingRouteProvider {
    error: RouteError,
}

impl FailingRouteProvider {
    /// Fail every request with `error`.
    pub fn new(error: RouteError) -> Self {
        Self { error }
    }
}

impl RouteProvider for FailingRouteProvider {
    fn route(&self, _start: GeoPoint, _end: GeoPoint) -> Result<Route, RouteError> {
        Err(self.error.clone())
    }
}

/// `LocationProvider` whose permission prompt is always refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

impl LocationProvider for DeniedLocation {
    fn current_location(&self) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}
