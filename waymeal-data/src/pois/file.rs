//! In-memory `PoiSource` backed by a GeoJSON file.

use camino::Utf8Path;
use log::{debug, warn};
use rstar::{AABB, RTree, RTreeObject};
use waymeal_core::{
    GeoPoint, PoiQuery, PoiSource, PoiSourceError, PointOfInterest, RawFeature,
    geometry::{haversine_m, search_envelopes},
};

use super::geojson::parse_feature_collection;

/// Entry stored in the R\*-tree: a feature and its representative location.
#[derive(Debug, Clone)]
struct IndexedFeature {
    /// Position of the feature in the source file, used for stable output.
    order: usize,
    location: GeoPoint,
    feature: RawFeature,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.longitude, self.location.latitude])
    }
}

/// Restaurants loaded from a GeoJSON `FeatureCollection`.
///
/// Features are indexed by the same representative location the selector
/// uses: the point itself, or the first vertex of a polygon. Features that
/// cannot be located are logged and dropped at load time.
#[derive(Debug)]
pub struct GeoJsonFilePoiSource {
    index: RTree<IndexedFeature>,
}

impl GeoJsonFilePoiSource {
    /// Load features from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PoiSourceError::Io`] when the file cannot be read and
    /// [`PoiSourceError::ParseError`] when it is not a `FeatureCollection`.
    pub fn open(path: &Utf8Path) -> Result<Self, PoiSourceError> {
        let text = waymeal_fs::read_utf8_to_string(path).map_err(|err| PoiSourceError::Io {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let source = Self::from_geojson(&text)?;
        debug!("indexed {} features from {path}", source.len());
        Ok(source)
    }

    /// Load features from GeoJSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PoiSourceError::ParseError`] when the text is not a
    /// `FeatureCollection`.
    pub fn from_geojson(text: &str) -> Result<Self, PoiSourceError> {
        Ok(Self::from_features(parse_feature_collection(text)?))
    }

    /// Index already decoded features.
    pub fn from_features<I>(features: I) -> Self
    where
        I: IntoIterator<Item = RawFeature>,
    {
        let entries = features
            .into_iter()
            .enumerate()
            .filter_map(|(order, feature)| match PointOfInterest::from_raw(&feature) {
                Ok(poi) => Some(IndexedFeature {
                    order,
                    location: poi.location,
                    feature,
                }),
                Err(err) => {
                    warn!("not indexing feature: {err}");
                    None
                }
            })
            .collect();
        Self {
            index: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether no feature was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }
}

impl PoiSource for GeoJsonFilePoiSource {
    /// Features within `radius_m` of the query centre whose `amenity`
    /// matches, in file order. Features without an `amenity` property match
    /// any query.
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        let mut hits: Vec<&IndexedFeature> = Vec::new();
        for rect in search_envelopes(query.center, query.radius_m) {
            let envelope =
                AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
            hits.extend(
                self.index
                    .locate_in_envelope_intersecting(&envelope)
                    .filter(|entry| haversine_m(query.center, entry.location) <= query.radius_m)
                    .filter(|entry| {
                        entry
                            .feature
                            .property_str("amenity")
                            .is_none_or(|amenity| amenity == query.amenity)
                    }),
            );
        }
        hits.sort_unstable_by_key(|entry| entry.order);
        hits.dedup_by_key(|entry| entry.order);
        Ok(hits.into_iter().map(|entry| entry.feature.clone()).collect())
    }
}
