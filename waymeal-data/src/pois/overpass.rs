//! DTOs and query text for the Overpass API.
//!
//! The adapter decodes into these transport DTOs first, then maps each
//! element into a [`RawFeature`] in one pass.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use waymeal_core::{PoiQuery, RawFeature, RawGeometry};

/// Server-side timeout requested in the query header, in seconds.
pub(super) const QUERY_TIMEOUT_SECS: u64 = 25;

/// Build the Overpass QL text for `query`.
///
/// Double quotes and backslashes in the amenity are escaped so the value
/// cannot break out of the tag filter.
pub(super) fn build_query(query: &PoiQuery) -> String {
    let amenity = query.amenity.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];nwr[\"amenity\"=\"{amenity}\"](around:{radius},{lat},{lon});out geom tags;",
        radius = query.radius_m.max(0.0),
        lat = query.center.latitude,
        lon = query.center.longitude,
    )
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
    /// Runtime diagnostics such as `"runtime error: Query timed out"`.
    pub(super) remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lon: Option<f64>,
    pub(super) lat: Option<f64>,
    /// Way vertices; entries are `null` where Overpass clipped the way.
    #[serde(default)]
    pub(super) geometry: Vec<Option<OverpassPositionDto>>,
    #[serde(default)]
    pub(super) members: Vec<OverpassMemberDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct OverpassPositionDto {
    pub(super) lon: f64,
    pub(super) lat: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassMemberDto {
    #[serde(default)]
    pub(super) role: String,
    #[serde(default)]
    pub(super) geometry: Vec<Option<OverpassPositionDto>>,
}

impl OverpassResponseDto {
    /// The remark, when it reports a server-side failure.
    pub(super) fn runtime_error(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|remark| remark.contains("error"))
    }

    pub(super) fn into_raw_features(self) -> Vec<RawFeature> {
        self.elements
            .into_iter()
            .map(OverpassElementDto::into_raw_feature)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_raw_feature(self) -> RawFeature {
        let geometry = self.raw_geometry();
        let properties: Map<String, Value> = self
            .tags
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        RawFeature {
            id: format!("{}/{}", self.element_type, self.id),
            geometry,
            properties,
        }
    }

    /// Nodes become points. Closed ways and the outer members of relations
    /// become polygons, the shape a GeoJSON export would give them.
    fn raw_geometry(&self) -> RawGeometry {
        if let (Some(longitude), Some(latitude)) = (self.lon, self.lat) {
            return RawGeometry::Point([longitude, latitude]);
        }
        let ring = positions(&self.geometry);
        if !ring.is_empty() {
            return if is_closed(&ring) {
                RawGeometry::Polygon(vec![ring])
            } else {
                RawGeometry::Other(format!("open {}", self.element_type))
            };
        }
        let outer: Vec<Vec<[f64; 2]>> = self
            .members
            .iter()
            .filter(|member| member.role == "outer")
            .map(|member| positions(&member.geometry))
            .filter(|ring| !ring.is_empty())
            .collect();
        if outer.is_empty() {
            RawGeometry::Other(format!("{} without coordinates", self.element_type))
        } else {
            RawGeometry::Polygon(outer)
        }
    }
}

fn positions(geometry: &[Option<OverpassPositionDto>]) -> Vec<[f64; 2]> {
    geometry
        .iter()
        .flatten()
        .map(|position| [position.lon, position.lat])
        .collect()
}

fn is_closed(ring: &[[f64; 2]]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}
