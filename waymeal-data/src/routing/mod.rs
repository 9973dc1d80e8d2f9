//! HTTP-based route providers for routing services.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`waymeal_core::RouteProvider`] that fetches driving routes from an OSRM
//! routing service.
//!
//! # Architecture
//!
//! The provider calls the OSRM Route API with full GeoJSON geometry and
//! turn-by-turn steps. The synchronous [`RouteProvider`] trait is implemented
//! by blocking on async HTTP calls internally, keeping the core library
//! embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waymeal_core::{GeoPoint, RouteProvider};
//! use waymeal_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
//!
//! let config = HttpRouteProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRouteProvider::with_config(config)?;
//!
//! let route = provider.route(GeoPoint::new(48.85, 2.35), GeoPoint::new(48.80, 2.13))?;
//! println!("{} m in {} s", route.summary.total_distance_m, route.summary.total_duration_s);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`RouteProvider`]: waymeal_core::RouteProvider

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_PROFILE, HttpRouteProvider, HttpRouteProviderConfig, decode_route_response,
};
