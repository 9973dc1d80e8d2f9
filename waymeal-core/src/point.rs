//! Geographic points in latitude/longitude order.
//!
//! [`GeoPoint`] is the value type used for trip endpoints, map clicks, device
//! locations, route polylines and restaurant positions. It converts to and
//! from [`geo::Coord`], which stores WGS84 coordinates as `x = longitude` and
//! `y = latitude`.

use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

/// A WGS84 position in decimal degrees.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymeal_core::GeoPoint;
///
/// let paris = GeoPoint::new(48.8566, 2.3522);
/// let coord: Coord<f64> = paris.into();
/// assert_eq!(coord.x, 2.3522);
/// assert_eq!(coord.y, 48.8566);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Construct a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Construct a point from a `(longitude, latitude)` pair.
    ///
    /// GeoJSON, OSRM and Overpass all emit positions in this axis order.
    ///
    /// # Examples
    /// ```
    /// use waymeal_core::GeoPoint;
    ///
    /// let point = GeoPoint::from_lon_lat(2.35, 48.85);
    /// assert_eq!(point, GeoPoint::new(48.85, 2.35));
    /// ```
    #[must_use]
    pub const fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Self::new(latitude, longitude)
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Self {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self::from_lon_lat(coord.x, coord.y)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Errors returned when parsing a [`GeoPoint`] from `"lat, lng"` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoPointParseError {
    /// The text did not contain exactly two comma-separated components.
    #[error("expected \"latitude, longitude\", found {input:?}")]
    Format {
        /// Text supplied by the caller.
        input: String,
    },
    /// A component was not a finite number.
    #[error("invalid {axis} {value:?}")]
    InvalidNumber {
        /// Name of the offending axis.
        axis: &'static str,
        /// Raw component text.
        value: String,
    },
    /// A component was outside its valid range.
    #[error("{axis} {value} is out of range")]
    OutOfRange {
        /// Name of the offending axis.
        axis: &'static str,
        /// Parsed component value.
        value: String,
    },
}

impl FromStr for GeoPoint {
    type Err = GeoPointParseError;

    /// Parse manual form entry such as `"48.8566, 2.3522"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(GeoPointParseError::Format {
                input: s.to_owned(),
            });
        };
        let latitude = parse_axis("latitude", lat, 90.0)?;
        let longitude = parse_axis("longitude", lng, 180.0)?;
        Ok(Self::new(latitude, longitude))
    }
}

fn parse_axis(axis: &'static str, raw: &str, limit: f64) -> Result<f64, GeoPointParseError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| GeoPointParseError::InvalidNumber {
            axis,
            value: trimmed.to_owned(),
        })?;
    if value.abs() > limit {
        return Err(GeoPointParseError::OutOfRange {
            axis,
            value: trimmed.to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("48.8566, 2.3522", GeoPoint::new(48.8566, 2.3522))]
    #[case("0,0", GeoPoint::new(0.0, 0.0))]
    #[case("  -33.9 ,  151.2 ", GeoPoint::new(-33.9, 151.2))]
    fn parses_manual_entry(#[case] input: &str, #[case] expected: GeoPoint) {
        let point: GeoPoint = input.parse().expect("valid point");
        assert_eq!(point, expected);
    }

    #[rstest]
    #[case("48.8566")]
    #[case("1,2,3")]
    #[case("")]
    fn rejects_wrong_component_count(#[case] input: &str) {
        let err = input.parse::<GeoPoint>().expect_err("should fail");
        assert!(matches!(err, GeoPointParseError::Format { .. }));
    }

    #[rstest]
    #[case("north, 2.0", "latitude")]
    #[case("1.0, NaN", "longitude")]
    #[case("1.0, inf", "longitude")]
    fn rejects_non_numeric_components(#[case] input: &str, #[case] expected_axis: &str) {
        match input.parse::<GeoPoint>() {
            Err(GeoPointParseError::InvalidNumber { axis, .. }) => assert_eq!(axis, expected_axis),
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[rstest]
    #[case("91.0, 0.0")]
    #[case("0.0, -180.5")]
    fn rejects_out_of_range(#[case] input: &str) {
        let err = input.parse::<GeoPoint>().expect_err("should fail");
        assert!(matches!(err, GeoPointParseError::OutOfRange { .. }));
    }

    #[rstest]
    fn coord_round_trip_swaps_axes() {
        let coord = Coord { x: 2.0, y: 48.0 };
        let point = GeoPoint::from(coord);
        assert_eq!(point.latitude, 48.0);
        assert_eq!(point.longitude, 2.0);
        assert_eq!(Coord::from(point), coord);
    }
}
