//! Test helpers wiring the CLI to in-memory collaborators.

use super::*;
use crate::sources::{BoxedPlanner, PlannerBuilder, SourceConfig};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value, json};
use std::fs;
use tempfile::TempDir;
use waymeal_core::{
    PoiSource, RawFeature, RestaurantFinder, RouteProvider, TripPlanner,
    test_support::{LinearRouteProvider, MemoryPoiSource},
};

/// Builds planners over a straight-line router and a fixed restaurant list.
#[derive(Debug, Clone)]
pub(super) struct StubPlannerBuilder {
    features: Vec<RawFeature>,
}

impl StubPlannerBuilder {
    pub(super) fn new(features: Vec<RawFeature>) -> Self {
        Self { features }
    }
}

impl PlannerBuilder for StubPlannerBuilder {
    fn build(&self, config: &SourceConfig) -> Result<BoxedPlanner, CliError> {
        let routes: Box<dyn RouteProvider> = Box::new(LinearRouteProvider::default());
        let pois: Box<dyn PoiSource> =
            Box::new(MemoryPoiSource::with_features(self.features.clone()));
        Ok(TripPlanner::new(
            routes,
            RestaurantFinder::with_config(pois, config.selector.clone()),
        ))
    }
}

pub(super) fn restaurant(id: &str, lat: f64, lon: f64, name: &str, cuisine: &str) -> RawFeature {
    let properties = match json!({
        "amenity": "restaurant",
        "name": name,
        "cuisine": cuisine,
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    RawFeature::point(id, lon, lat, properties)
}

/// Restaurants scattered along the equator between longitudes 0 and 1.
pub(super) fn equator_restaurants() -> Vec<RawFeature> {
    vec![
        restaurant("node/1", 0.0, 0.3, "Trattoria Zero", "italian;pizza"),
        restaurant("node/2", 0.0, 0.31, "Golden Wok", "chinese"),
        restaurant("node/3", 0.01, 0.9, "Pizzeria Est", "italian"),
    ]
}

/// A temporary directory holding a restaurant export placeholder.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(
            &root.join("restaurants.geojson"),
            br#"{"type":"FeatureCollection","features":[]}"#,
        );
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn pois_geojson(&self) -> Utf8PathBuf {
        self.root.join("restaurants.geojson")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}
