//! Fetch driving routes between two waypoints.
//!
//! The [`RouteProvider`] trait abstracts the external routing service. Callers
//! supply a start and end [`GeoPoint`](crate::GeoPoint) and receive a
//! [`Route`](crate::Route) with its summary, per-instruction legs and
//! polyline.
//!
//! Failures are returned as [`RouteError`] so callers can report them
//! distinctly from an empty eating window.

mod error;
mod provider;

pub use error::RouteError;
pub use provider::RouteProvider;
