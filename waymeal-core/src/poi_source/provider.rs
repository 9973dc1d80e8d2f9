//! POI source trait and the radius query it answers.

use crate::{GeoPoint, RawFeature};

use super::error::PoiSourceError;

/// Search radius used by the reference application, in metres.
pub const DEFAULT_RADIUS_M: f64 = 2_000.0;

/// OpenStreetMap `amenity` value for restaurants.
pub const DEFAULT_AMENITY: &str = "restaurant";

/// A bounded-radius search for features of one amenity type.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, PoiQuery};
///
/// let query = PoiQuery::restaurants_near(GeoPoint::new(48.85, 2.35));
/// assert_eq!(query.radius_m, 2_000.0);
/// assert_eq!(query.amenity, "restaurant");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoiQuery {
    /// Centre of the search.
    pub center: GeoPoint,
    /// Search radius in metres.
    pub radius_m: f64,
    /// OpenStreetMap `amenity` value to request.
    pub amenity: String,
}

impl PoiQuery {
    /// Restaurants within the default radius of `center`.
    #[must_use]
    pub fn restaurants_near(center: GeoPoint) -> Self {
        Self {
            center,
            radius_m: DEFAULT_RADIUS_M,
            amenity: DEFAULT_AMENITY.to_owned(),
        }
    }

    /// Replace the search radius.
    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Replace the amenity type.
    #[must_use]
    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenity = amenity.into();
        self
    }
}

/// Fetch raw POI features around a point.
///
/// Implementations return every feature the service reports for the query;
/// normalisation and filtering happen in [`crate::selector`].
pub trait PoiSource: Send + Sync {
    /// Run `query` against the source.
    ///
    /// # Errors
    ///
    /// Returns [`PoiSourceError`] when the source is unreachable, rejects the
    /// request or returns an undecodable payload.
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError>;
}

impl<T: PoiSource + ?Sized> PoiSource for &T {
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        (**self).fetch_features(query)
    }
}

impl<T: PoiSource + ?Sized> PoiSource for Box<T> {
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        (**self).fetch_features(query)
    }
}
