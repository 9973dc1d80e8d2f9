//! Pick the nearest restaurants matching a cuisine filter.
//!
//! Selection is a bounded filter and sort: raw features are normalised,
//! filtered by cuisine substring, ranked by great-circle distance to the
//! estimated diner point and truncated. Every call returns a complete
//! replacement set.

use log::{debug, warn};

use crate::{
    GeoPoint, PoiQuery, PoiSource, PoiSourceError, PointOfInterest, RawFeature,
    geometry::haversine_m,
    poi_source::{DEFAULT_AMENITY, DEFAULT_RADIUS_M},
};

/// Number of restaurants shown by the reference application.
pub const DEFAULT_RESULT_COUNT: usize = 3;

/// A restaurant and its distance from the search centre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyRestaurant {
    /// The restaurant.
    pub poi: PointOfInterest,
    /// Great-circle distance to the search centre in metres.
    pub distance_m: f64,
}

/// Normalise raw features, skipping malformed records.
///
/// Skipped records are logged and never abort the batch.
#[must_use]
pub fn normalise_features(features: &[RawFeature]) -> Vec<PointOfInterest> {
    features
        .iter()
        .filter_map(|raw| match PointOfInterest::from_raw(raw) {
            Ok(poi) => Some(poi),
            Err(err) => {
                warn!("skipping malformed POI: {err}");
                None
            }
        })
        .collect()
}

/// Whether `poi` carries a cuisine tag containing `filter`.
///
/// Matching is a case-sensitive substring test; an empty filter accepts any
/// tagged POI. Untagged POIs never match.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, PoiShape, PointOfInterest, selector::matches_cuisine};
///
/// let poi = PointOfInterest {
///     id: "node/1".into(),
///     name: None,
///     cuisine: Some("italian-french-fusion".into()),
///     location: GeoPoint::new(0.0, 0.0),
///     shape: PoiShape::Point,
/// };
/// assert!(matches_cuisine(&poi, "italian"));
/// assert!(matches_cuisine(&poi, ""));
/// assert!(!matches_cuisine(&poi, "Italian"));
/// ```
#[must_use]
pub fn matches_cuisine(poi: &PointOfInterest, filter: &str) -> bool {
    poi.cuisine
        .as_deref()
        .is_some_and(|cuisine| cuisine.contains(filter))
}

/// The `k` POIs nearest to `center` whose cuisine matches `filter`.
///
/// Ties keep their input order.
#[must_use]
pub fn select_nearest<I>(center: GeoPoint, pois: I, filter: &str, k: usize) -> Vec<NearbyRestaurant>
where
    I: IntoIterator<Item = PointOfInterest>,
{
    let mut ranked: Vec<NearbyRestaurant> = pois
        .into_iter()
        .filter(|poi| matches_cuisine(poi, filter))
        .map(|poi| NearbyRestaurant {
            distance_m: haversine_m(center, poi.location),
            poi,
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ranked.truncate(k);
    ranked
}

/// Search parameters for [`RestaurantFinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Search radius in metres.
    pub radius_m: f64,
    /// OpenStreetMap `amenity` value.
    pub amenity: String,
    /// Maximum number of results.
    pub result_count: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            amenity: DEFAULT_AMENITY.to_owned(),
            result_count: DEFAULT_RESULT_COUNT,
        }
    }
}

/// Finds nearby restaurants through a [`PoiSource`].
#[derive(Debug, Clone)]
pub struct RestaurantFinder<P> {
    source: P,
    config: SelectorConfig,
}

impl<P: PoiSource> RestaurantFinder<P> {
    /// Use `source` with the default configuration.
    pub fn new(source: P) -> Self {
        Self::with_config(source, SelectorConfig::default())
    }

    /// Use `source` with explicit parameters.
    pub fn with_config(source: P, config: SelectorConfig) -> Self {
        Self { source, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Restaurants near `center` matching `filter`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns the source's [`PoiSourceError`] unchanged; a failed lookup is
    /// never reported as an empty result.
    pub fn find(
        &self,
        center: GeoPoint,
        filter: &str,
    ) -> Result<Vec<NearbyRestaurant>, PoiSourceError> {
        let query = PoiQuery {
            center,
            radius_m: self.config.radius_m,
            amenity: self.config.amenity.clone(),
        };
        let features = self.source.fetch_features(&query)?;
        let pois = normalise_features(&features);
        debug!(
            "{} of {} features normalised around {center}",
            pois.len(),
            features.len()
        );
        Ok(select_nearest(center, pois, filter, self.config.result_count))
    }
}
