//! Query an external POI service for restaurant candidates.
//!
//! A [`PoiSource`] answers a bounded-radius [`PoiQuery`] with raw features
//! that still need normalising into [`PointOfInterest`](crate::PointOfInterest)
//! values. Failures are explicit so callers never mistake an outage for an
//! empty neighbourhood.

mod error;
mod provider;

pub use error::PoiSourceError;
pub use provider::{DEFAULT_AMENITY, DEFAULT_RADIUS_M, PoiQuery, PoiSource};
