//! Facade crate for the Waymeal trip planner.
//!
//! This crate re-exports the core domain types and, behind the default
//! `adapters` feature, the HTTP and file-backed collaborators from
//! `waymeal-data`.
//!
//! # Examples
//! ```
//! use waymeal::{GeoPoint, TimeOfDay, TripDraft};
//!
//! let mut draft = TripDraft::new(TimeOfDay::from_hm(8, 0).unwrap_or(TimeOfDay::MIDNIGHT));
//! draft.set_start(GeoPoint::new(48.85, 2.35));
//! assert!(draft.to_plan().is_err());
//! ```

#![forbid(unsafe_code)]

pub use waymeal_core::{
    ClockTime, CuisinePreference, DinerOutcome, Endpoint, FixedLocation, GeoPoint,
    GeolocationError, LocationProvider, MapClicks, MapOverlay, NearbyRestaurant, PlanError,
    PlanningSession, PoiQuery, PoiSource, PoiSourceError, PointOfInterest, RestaurantFinder,
    Route, RouteError, RouteProvider, SelectorConfig, TimeOfDay, TripDraft, TripPlan, TripPlanner,
    TripReport, TripSummary,
};

#[cfg(feature = "adapters")]
pub use waymeal_data::{
    GeoJsonFilePoiSource, HttpConfig, HttpOverpassPoiSource, HttpRouteProvider,
    HttpRouteProviderConfig, ProviderBuildError,
};
