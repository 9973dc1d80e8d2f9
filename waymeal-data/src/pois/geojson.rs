//! GeoJSON `FeatureCollection` decoding.
//!
//! Only `Point` and `Polygon` geometries carry a usable position; every other
//! geometry is kept as [`RawGeometry::Other`] so the selector can report and
//! skip it.

use serde::Deserialize;
use serde_json::{Map, Value};
use waymeal_core::{PoiSourceError, RawFeature, RawGeometry};

#[derive(Debug, Deserialize)]
struct FeatureCollectionDto {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<GeometryDto>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct GeometryDto {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Decode a GeoJSON `FeatureCollection` into raw features.
///
/// Feature identifiers come from the feature `id`, then the `@id` property
/// written by Overpass exports, then the feature's position in the file.
///
/// # Errors
///
/// Returns [`PoiSourceError::ParseError`] when the text is not JSON or not a
/// `FeatureCollection`.
///
/// # Examples
/// ```
/// use waymeal_core::RawGeometry;
/// use waymeal_data::pois::parse_feature_collection;
///
/// let features = parse_feature_collection(
///     r#"{"type": "FeatureCollection", "features": [
///         {"type": "Feature", "properties": {"@id": "node/1"},
///          "geometry": {"type": "Point", "coordinates": [2.35, 48.85]}}
///     ]}"#,
/// )?;
/// assert_eq!(features[0].id, "node/1");
/// assert_eq!(features[0].geometry, RawGeometry::Point([2.35, 48.85]));
/// # Ok::<(), waymeal_core::PoiSourceError>(())
/// ```
pub fn parse_feature_collection(text: &str) -> Result<Vec<RawFeature>, PoiSourceError> {
    let collection: FeatureCollectionDto =
        serde_json::from_str(text).map_err(|err| PoiSourceError::ParseError {
            message: err.to_string(),
        })?;
    if collection.kind != "FeatureCollection" {
        return Err(PoiSourceError::ParseError {
            message: format!("expected a FeatureCollection, found {}", collection.kind),
        });
    }
    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature.into_raw_feature(index))
        .collect())
}

impl FeatureDto {
    fn into_raw_feature(self, index: usize) -> RawFeature {
        let properties = self.properties.unwrap_or_default();
        let id = self
            .id
            .as_ref()
            .and_then(id_text)
            .or_else(|| properties.get("@id").and_then(id_text))
            .unwrap_or_else(|| format!("feature/{index}"));
        let geometry = self
            .geometry
            .map_or_else(|| RawGeometry::Other("null".into()), GeometryDto::into_raw);
        RawFeature {
            id,
            geometry,
            properties,
        }
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl GeometryDto {
    fn into_raw(self) -> RawGeometry {
        let decoded = match self.kind.as_str() {
            "Point" => serde_json::from_value::<Vec<f64>>(self.coordinates)
                .ok()
                .and_then(|position| position_of(&position))
                .map(RawGeometry::Point),
            "Polygon" => serde_json::from_value::<Vec<Vec<Vec<f64>>>>(self.coordinates)
                .ok()
                .and_then(|rings| {
                    rings
                        .iter()
                        .map(|ring| ring.iter().map(|p| position_of(p)).collect())
                        .collect::<Option<Vec<Vec<[f64; 2]>>>>()
                })
                .map(RawGeometry::Polygon),
            _ => None,
        };
        decoded.unwrap_or(RawGeometry::Other(self.kind))
    }
}

/// The `[lon, lat]` prefix of a GeoJSON position; altitude is ignored.
fn position_of(position: &[f64]) -> Option<[f64; 2]> {
    match position {
        [lon, lat, ..] => Some([*lon, *lat]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_points_and_polygons() {
        let features = parse_feature_collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": 42,
                 "properties": {"amenity": "restaurant", "cuisine": "italian"},
                 "geometry": {"type": "Point", "coordinates": [2.35, 48.85, 35.0]}},
                {"type": "Feature", "id": "way/7", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[2.0, 48.0], [2.1, 48.0], [2.0, 48.1], [2.0, 48.0]]]}}
            ]}"#,
        )
        .expect("valid collection");

        assert_eq!(features[0].id, "42");
        assert_eq!(features[0].geometry, RawGeometry::Point([2.35, 48.85]));
        assert_eq!(features[0].property_str("cuisine"), Some("italian"));
        assert_eq!(features[1].id, "way/7");
        match &features[1].geometry {
            RawGeometry::Polygon(rings) => assert_eq!(rings[0][0], [2.0, 48.0]),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[rstest]
    #[case(r#"{"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}"#, "LineString")]
    #[case(r#"{"type": "Point", "coordinates": [1.0]}"#, "Point")]
    #[case("null", "null")]
    fn unusable_geometry_is_kept_by_name(#[case] geometry: &str, #[case] kind: &str) {
        let text = format!(
            r#"{{"type": "FeatureCollection", "features": [{{"type": "Feature", "properties": null, "geometry": {geometry}}}]}}"#
        );

        let features = parse_feature_collection(&text).expect("valid collection");

        assert_eq!(features[0].geometry, RawGeometry::Other(kind.into()));
        assert_eq!(features[0].id, "feature/0");
    }

    #[rstest]
    fn rejects_other_top_level_types() {
        let err = parse_feature_collection(r#"{"type": "Feature", "properties": {}}"#)
            .expect_err("not a collection");

        assert!(matches!(err, PoiSourceError::ParseError { .. }));
    }

    #[rstest]
    fn rejects_invalid_json() {
        let err = parse_feature_collection("{not json").expect_err("invalid JSON");

        assert!(matches!(err, PoiSourceError::ParseError { .. }));
    }
}
