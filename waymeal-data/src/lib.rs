//! Adapters connecting the Waymeal core to external data.
//!
//! Responsibilities:
//! - Fetch driving routes from an OSRM routing service.
//! - Fetch restaurant candidates from the Overpass API or a local GeoJSON
//!   export.
//! - Encapsulate wire formats; callers only see `waymeal-core` types.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `waymeal-core`).
//! - Keep blocking I/O off async executors; HTTP adapters drive async
//!   clients on their own runtime.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod http;
pub mod pois;
pub mod routing;

pub use http::{HttpConfig, ProviderBuildError};
pub use pois::{GeoJsonFilePoiSource, HttpOverpassPoiSource};
pub use routing::{HttpRouteProvider, HttpRouteProviderConfig};
