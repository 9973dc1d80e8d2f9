//! OSRM API response types for the Route service.
//!
//! The Route service finds the fastest route between the supplied
//! coordinates. Requests ask for `geometries=geojson`, so the route geometry
//! arrives as a GeoJSON `LineString` in `[lon, lat]` order.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One candidate route.
#[derive(Debug, Deserialize)]
pub struct RouteDto {
    /// Total distance in metres.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Route geometry; absent when `overview=false`.
    pub geometry: Option<LineStringDto>,
    /// One leg per pair of consecutive waypoints.
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct LineStringDto {
    /// `[lon, lat]` positions.
    pub coordinates: Vec<[f64; 2]>,
}

/// Route between two consecutive waypoints.
#[derive(Debug, Deserialize)]
pub struct LegDto {
    /// Leg distance in metres.
    pub distance: f64,
    /// Leg duration in seconds.
    pub duration: f64,
    /// Turn-by-turn maneuvers; empty when `steps=false`.
    #[serde(default)]
    pub steps: Vec<StepDto>,
}

/// A single maneuver.
#[derive(Debug, Deserialize)]
pub struct StepDto {
    /// Step distance in metres.
    pub distance: f64,
    /// Step duration in seconds.
    pub duration: f64,
}
