//! Point-of-interest sources for restaurant lookup.
//!
//! Two adapters implement [`waymeal_core::PoiSource`]:
//!
//! - [`HttpOverpassPoiSource`] queries an Overpass API interpreter for
//!   elements tagged with the requested `amenity` around the search centre.
//!   Nodes keep their own position; closed ways and the outer members of
//!   relations become polygons, located like GeoJSON polygons by their first
//!   vertex.
//! - [`GeoJsonFilePoiSource`] loads a GeoJSON `FeatureCollection` once,
//!   indexes a representative location of every feature in an R\*-tree and
//!   answers radius queries from memory.
//!
//! Both return [`waymeal_core::RawFeature`] values; normalisation, cuisine
//! filtering and ranking happen in [`waymeal_core::selector`].
//!
//! # Example
//!
//! ```no_run
//! use waymeal_core::{GeoPoint, PoiQuery, PoiSource};
//! use waymeal_data::pois::HttpOverpassPoiSource;
//!
//! let source = HttpOverpassPoiSource::new("https://overpass-api.de/api/interpreter")?;
//! let features = source.fetch_features(&PoiQuery::restaurants_near(GeoPoint::new(48.85, 2.35)))?;
//! println!("{} candidates", features.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod file;
mod geojson;
mod overpass;
mod provider;

pub use file::GeoJsonFilePoiSource;
pub use geojson::parse_feature_collection;
pub use provider::{DEFAULT_OVERPASS_URL, HttpOverpassPoiSource, decode_overpass_response};
