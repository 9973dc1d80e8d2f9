//! Core domain types and algorithms for the Waymeal trip planner.
//!
//! Responsibilities:
//! - Model trip requests, routes, restaurants and times of day.
//! - Estimate where a traveller will be at the desired eating time.
//! - Select the nearest restaurants matching a cuisine filter.
//! - Own the rendered map state and supersede stale computations.
//!
//! Boundaries:
//! - Routing, POI lookup and device location are reached only through the
//!   [`RouteProvider`], [`PoiSource`] and [`LocationProvider`] traits;
//!   adapters live in `waymeal-data` and the CLI.
//! - Geometry and time computations are total functions and never perform
//!   I/O.

#![forbid(unsafe_code)]

pub mod cuisine;
pub mod estimator;
pub mod geolocation;
pub mod geometry;
pub mod interaction;
pub mod planner;
pub mod poi;
pub mod poi_source;
pub mod point;
pub mod route;
pub mod routing;
pub mod selector;
pub mod session;
pub mod time;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cuisine::CuisinePreference;
pub use geolocation::{FixedLocation, GeolocationError, LocationProvider, NoLocation};
pub use interaction::{Endpoint, InputIncomplete, MapClicks, PendingClick, TripDraft};
pub use planner::{DinerOutcome, PlanError, TripPlan, TripPlanner, TripReport, TripSummary};
pub use poi::{MalformedPoi, PoiShape, PointOfInterest, RawFeature, RawGeometry};
pub use poi_source::{PoiQuery, PoiSource, PoiSourceError};
pub use point::{GeoPoint, GeoPointParseError};
pub use route::{Route, RouteLeg, RouteSummary};
pub use routing::{RouteError, RouteProvider};
pub use selector::{NearbyRestaurant, RestaurantFinder, SelectorConfig};
pub use session::{CommitOutcome, ComputationTicket, MapOverlay, PlanningSession};
pub use time::{ClockTime, TimeOfDay, TimeParseError};
