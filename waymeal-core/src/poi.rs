//! Restaurant records and their normalisation from raw collaborator data.
//!
//! POI collaborators hand back [`RawFeature`] values that still carry the
//! source's axis order and loosely typed properties. [`PointOfInterest::from_raw`]
//! resolves a representative location in latitude/longitude order and pulls
//! the `name` and `cuisine` tags out of the property bag.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::GeoPoint;

/// Geometry attached to a raw POI record, in source `(lon, lat)` order.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    /// A single `[lon, lat]` position.
    Point([f64; 2]),
    /// Polygon rings, each a list of `[lon, lat]` positions.
    Polygon(Vec<Vec<[f64; 2]>>),
    /// Any other geometry kind, kept by name for diagnostics.
    Other(String),
}

/// A POI record as returned by a [`PoiSource`](crate::PoiSource).
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    /// Source identifier, e.g. `"node/123"`.
    pub id: String,
    /// Source geometry.
    pub geometry: RawGeometry,
    /// Free-form properties such as `name`, `cuisine` and `amenity`.
    pub properties: Map<String, Value>,
}

impl RawFeature {
    /// Construct a point feature from a `(lon, lat)` position.
    ///
    /// # Examples
    /// ```
    /// use serde_json::{Map, Value};
    /// use waymeal_core::{RawFeature, RawGeometry};
    ///
    /// let feature = RawFeature::point("node/1", 2.35, 48.85, Map::new());
    /// assert_eq!(feature.geometry, RawGeometry::Point([2.35, 48.85]));
    /// ```
    #[must_use]
    pub fn point(
        id: impl Into<String>,
        longitude: f64,
        latitude: f64,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            geometry: RawGeometry::Point([longitude, latitude]),
            properties,
        }
    }

    /// String value of a property, if present and a string.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Shape of the source geometry a [`PointOfInterest`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PoiShape {
    /// The source was a point.
    Point,
    /// The source was a polygon; the location is its first vertex.
    Polygon,
}

/// A normalised restaurant candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    /// Source identifier.
    pub id: String,
    /// Display name, when tagged.
    pub name: Option<String>,
    /// Raw `cuisine` tag, when present and a string.
    pub cuisine: Option<String>,
    /// Representative location in latitude/longitude order.
    pub location: GeoPoint,
    /// Geometry kind of the source record.
    pub shape: PoiShape,
}

/// Why a raw record could not become a [`PointOfInterest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedPoi {
    /// Geometry other than point or polygon.
    #[error("feature {id} has unsupported geometry {kind}")]
    UnsupportedGeometry {
        /// Source identifier.
        id: String,
        /// Geometry kind reported by the source.
        kind: String,
    },
    /// Polygon without any vertex.
    #[error("feature {id} has an empty polygon")]
    EmptyPolygon {
        /// Source identifier.
        id: String,
    },
    /// Coordinates were NaN, infinite or outside WGS84 bounds.
    #[error("feature {id} has invalid coordinates ({longitude}, {latitude})")]
    InvalidCoordinates {
        /// Source identifier.
        id: String,
        /// Raw longitude.
        longitude: f64,
        /// Raw latitude.
        latitude: f64,
    },
}

impl PointOfInterest {
    /// Normalise a raw record.
    ///
    /// Polygons are represented by the first vertex of their first ring.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedPoi`] when the geometry is unsupported, empty or
    /// carries unusable coordinates.
    ///
    /// # Examples
    /// ```
    /// use serde_json::{Map, json};
    /// use waymeal_core::{GeoPoint, PointOfInterest, RawFeature};
    ///
    /// let mut props = Map::new();
    /// props.insert("cuisine".into(), json!("italian;pizza"));
    /// let raw = RawFeature::point("node/7", 2.35, 48.85, props);
    /// let poi = PointOfInterest::from_raw(&raw)?;
    /// assert_eq!(poi.location, GeoPoint::new(48.85, 2.35));
    /// assert_eq!(poi.cuisine.as_deref(), Some("italian;pizza"));
    /// # Ok::<(), waymeal_core::MalformedPoi>(())
    /// ```
    pub fn from_raw(raw: &RawFeature) -> Result<Self, MalformedPoi> {
        let (position, shape) = match &raw.geometry {
            RawGeometry::Point(position) => (*position, PoiShape::Point),
            RawGeometry::Polygon(rings) => {
                let first = rings
                    .first()
                    .and_then(|ring| ring.first())
                    .ok_or_else(|| MalformedPoi::EmptyPolygon { id: raw.id.clone() })?;
                (*first, PoiShape::Polygon)
            }
            RawGeometry::Other(kind) => {
                return Err(MalformedPoi::UnsupportedGeometry {
                    id: raw.id.clone(),
                    kind: kind.clone(),
                });
            }
        };
        let [longitude, latitude] = position;
        let location = GeoPoint::from_lon_lat(longitude, latitude);
        if !location.is_finite() || latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return Err(MalformedPoi::InvalidCoordinates {
                id: raw.id.clone(),
                longitude,
                latitude,
            });
        }
        Ok(Self {
            id: raw.id.clone(),
            name: raw.property_str("name").map(str::to_owned),
            cuisine: raw.property_str("cuisine").map(str::to_owned),
            location,
            shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[rstest]
    fn polygon_uses_first_vertex_swapped() {
        let raw = RawFeature {
            id: "way/1".into(),
            geometry: RawGeometry::Polygon(vec![vec![[2.0, 48.0], [2.1, 48.1], [2.0, 48.0]]]),
            properties: props(json!({"name": "Chez Nous", "cuisine": "french"})),
        };
        let poi = PointOfInterest::from_raw(&raw).expect("valid polygon");
        assert_eq!(poi.location, GeoPoint::new(48.0, 2.0));
        assert_eq!(poi.shape, PoiShape::Polygon);
        assert_eq!(poi.name.as_deref(), Some("Chez Nous"));
    }

    #[rstest]
    fn non_string_cuisine_is_absent() {
        let raw = RawFeature::point("node/2", 0.0, 0.0, props(json!({"cuisine": 42})));
        let poi = PointOfInterest::from_raw(&raw).expect("valid point");
        assert_eq!(poi.cuisine, None);
    }

    #[rstest]
    #[case(RawGeometry::Polygon(Vec::new()))]
    #[case(RawGeometry::Polygon(vec![Vec::new()]))]
    fn empty_polygon_is_malformed(#[case] geometry: RawGeometry) {
        let raw = RawFeature {
            id: "way/3".into(),
            geometry,
            properties: Map::new(),
        };
        assert_eq!(
            PointOfInterest::from_raw(&raw),
            Err(MalformedPoi::EmptyPolygon { id: "way/3".into() })
        );
    }

    #[rstest]
    #[case([f64::NAN, 0.0])]
    #[case([0.0, 95.0])]
    #[case([200.0, 0.0])]
    fn invalid_coordinates_are_malformed(#[case] position: [f64; 2]) {
        let raw = RawFeature {
            id: "node/4".into(),
            geometry: RawGeometry::Point(position),
            properties: Map::new(),
        };
        assert!(matches!(
            PointOfInterest::from_raw(&raw),
            Err(MalformedPoi::InvalidCoordinates { .. })
        ));
    }

    #[rstest]
    fn other_geometry_is_malformed() {
        let raw = RawFeature {
            id: "rel/5".into(),
            geometry: RawGeometry::Other("LineString".into()),
            properties: Map::new(),
        };
        let err = PointOfInterest::from_raw(&raw).expect_err("unsupported");
        assert!(err.to_string().contains("LineString"));
    }
}
