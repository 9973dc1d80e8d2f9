//! Device location lookups.
//!
//! The trip form can fill its start point from the device position. Lookups
//! may be refused or unavailable; both are reported as [`GeolocationError`]
//! and never abort the session.

use thiserror::Error;

use crate::GeoPoint;

/// Why the device position could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user or platform refused access to the position.
    #[error("location permission denied")]
    PermissionDenied,
    /// No position could be determined.
    #[error("location unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
}

/// Source of the device's current position.
pub trait LocationProvider {
    /// Read the current position.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] when permission is denied or no fix is
    /// available.
    fn current_location(&self) -> Result<GeoPoint, GeolocationError>;
}

/// A fixed position, e.g. one supplied through configuration.
///
/// # Examples
/// ```
/// use waymeal_core::{FixedLocation, GeoPoint, LocationProvider};
///
/// let here = FixedLocation::new(GeoPoint::new(52.52, 13.40));
/// assert_eq!(here.current_location(), Ok(GeoPoint::new(52.52, 13.40)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(GeoPoint);

impl FixedLocation {
    /// Report `point` on every lookup.
    #[must_use]
    pub const fn new(point: GeoPoint) -> Self {
        Self(point)
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Result<GeoPoint, GeolocationError> {
        Ok(self.0)
    }
}

/// A provider with no position source at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_location(&self) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::Unavailable {
            reason: "no location source configured".to_owned(),
        })
    }
}

impl<T: LocationProvider> LocationProvider for Option<T> {
    fn current_location(&self) -> Result<GeoPoint, GeolocationError> {
        self.as_ref()
            .map_or_else(|| NoLocation.current_location(), LocationProvider::current_location)
    }
}
