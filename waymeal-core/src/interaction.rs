//! Form state and map-click plumbing for an interactive front end.
//!
//! [`TripDraft`] mirrors the trip form. Points are explicit `Option`s, so a
//! coordinate of `0.0, 0.0` counts as set. [`MapClicks`] hands out one-shot
//! click subscriptions: each subscription receives at most one click and is
//! detached as soon as it fires.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use log::warn;
use thiserror::Error;

use crate::{
    CuisinePreference, GeoPoint, GeoPointParseError, GeolocationError, LocationProvider, TimeOfDay,
    TripPlan,
};

/// Which endpoint of the trip a value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The departure point.
    Start,
    /// The destination.
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// The draft cannot be planned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the {missing} point is not set")]
pub struct InputIncomplete {
    /// The first endpoint found missing.
    pub missing: Endpoint,
}

/// Mutable trip form state.
///
/// # Examples
/// ```
/// use waymeal_core::{Endpoint, GeoPoint, InputIncomplete, TimeOfDay, TripDraft};
///
/// let mut draft = TripDraft::new("08:00".parse()?);
/// assert_eq!(draft.to_plan(), Err(InputIncomplete { missing: Endpoint::Start }));
///
/// draft.set_start(GeoPoint::new(0.0, 0.0));
/// draft.set_end_text("48.85, 2.35").expect("valid coordinates");
/// let plan = draft.to_plan().expect("complete");
/// assert_eq!(plan.start, GeoPoint::new(0.0, 0.0));
/// # Ok::<(), waymeal_core::TimeParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
    departure: TimeOfDay,
    eat_at: Option<TimeOfDay>,
    cuisine: CuisinePreference,
}

impl TripDraft {
    /// An empty draft leaving at `departure`.
    #[must_use]
    pub fn new(departure: TimeOfDay) -> Self {
        Self {
            start: None,
            end: None,
            departure,
            eat_at: None,
            cuisine: CuisinePreference::default(),
        }
    }

    /// Current departure point.
    #[must_use]
    pub fn start(&self) -> Option<GeoPoint> {
        self.start
    }

    /// Current destination.
    #[must_use]
    pub fn end(&self) -> Option<GeoPoint> {
        self.end
    }

    /// Departure time of day.
    #[must_use]
    pub fn departure(&self) -> TimeOfDay {
        self.departure
    }

    /// Desired eating time, if chosen.
    #[must_use]
    pub fn eat_at(&self) -> Option<TimeOfDay> {
        self.eat_at
    }

    /// Selected cuisine.
    #[must_use]
    pub fn cuisine(&self) -> &CuisinePreference {
        &self.cuisine
    }

    /// Set the departure point.
    pub fn set_start(&mut self, point: GeoPoint) {
        self.start = Some(point);
    }

    /// Set the destination.
    pub fn set_end(&mut self, point: GeoPoint) {
        self.end = Some(point);
    }

    /// Forget the departure point.
    pub fn clear_start(&mut self) {
        self.start = None;
    }

    /// Forget the destination.
    pub fn clear_end(&mut self) {
        self.end = None;
    }

    /// Set `endpoint` from manual `"lat, lng"` entry.
    ///
    /// # Errors
    ///
    /// Returns [`GeoPointParseError`] and keeps the previous value when the
    /// text does not parse.
    pub fn set_text(&mut self, endpoint: Endpoint, text: &str) -> Result<(), GeoPointParseError> {
        let point = text.parse()?;
        self.apply_click(endpoint, point);
        Ok(())
    }

    /// Set the departure point from manual entry.
    ///
    /// # Errors
    ///
    /// See [`TripDraft::set_text`].
    pub fn set_start_text(&mut self, text: &str) -> Result<(), GeoPointParseError> {
        self.set_text(Endpoint::Start, text)
    }

    /// Set the destination from manual entry.
    ///
    /// # Errors
    ///
    /// See [`TripDraft::set_text`].
    pub fn set_end_text(&mut self, text: &str) -> Result<(), GeoPointParseError> {
        self.set_text(Endpoint::End, text)
    }

    /// Apply a map click to `endpoint`.
    pub fn apply_click(&mut self, endpoint: Endpoint, point: GeoPoint) {
        match endpoint {
            Endpoint::Start => self.set_start(point),
            Endpoint::End => self.set_end(point),
        }
    }

    /// Set the departure time.
    pub fn set_departure(&mut self, departure: TimeOfDay) {
        self.departure = departure;
    }

    /// Set or clear the desired eating time.
    pub fn set_eat_at(&mut self, eat_at: Option<TimeOfDay>) {
        self.eat_at = eat_at;
    }

    /// Select a cuisine.
    pub fn set_cuisine(&mut self, cuisine: CuisinePreference) {
        self.cuisine = cuisine;
    }

    /// Fill the departure point from the device position.
    ///
    /// # Errors
    ///
    /// Returns the lookup failure after logging it; the current start point
    /// is left unchanged.
    pub fn use_device_location(
        &mut self,
        provider: &dyn LocationProvider,
    ) -> Result<GeoPoint, GeolocationError> {
        match provider.current_location() {
            Ok(point) => {
                self.set_start(point);
                Ok(point)
            }
            Err(err) => {
                warn!("device location lookup failed: {err}");
                Err(err)
            }
        }
    }

    /// Freeze the draft into a plan.
    ///
    /// # Errors
    ///
    /// Returns [`InputIncomplete`] naming the first unset endpoint.
    pub fn to_plan(&self) -> Result<TripPlan, InputIncomplete> {
        let start = self.start.ok_or(InputIncomplete {
            missing: Endpoint::Start,
        })?;
        let end = self.end.ok_or(InputIncomplete {
            missing: Endpoint::End,
        })?;
        Ok(TripPlan {
            start,
            end,
            departure: self.departure,
            eat_at: self.eat_at,
            cuisine: self.cuisine.clone(),
        })
    }
}

/// Hands out one-shot map click subscriptions.
///
/// # Examples
/// ```
/// use waymeal_core::{GeoPoint, MapClicks};
///
/// let mut clicks = MapClicks::default();
/// let pending = clicks.once();
/// assert_eq!(clicks.dispatch(GeoPoint::new(1.0, 2.0)), 1);
/// assert_eq!(clicks.dispatch(GeoPoint::new(3.0, 4.0)), 0);
/// assert_eq!(pending.try_take(), Some(GeoPoint::new(1.0, 2.0)));
/// ```
#[derive(Debug, Default)]
pub struct MapClicks {
    pending: Vec<Sender<GeoPoint>>,
}

impl MapClicks {
    /// Subscribe to the next click only.
    pub fn once(&mut self) -> PendingClick {
        let (sender, receiver) = mpsc::channel();
        self.pending.push(sender);
        PendingClick { receiver }
    }

    /// Number of subscriptions still waiting.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.pending.len()
    }

    /// Deliver `point` to every waiting subscription and detach them all.
    ///
    /// Returns how many subscriptions received the click.
    pub fn dispatch(&mut self, point: GeoPoint) -> usize {
        self.pending
            .drain(..)
            .filter(|sender| sender.send(point).is_ok())
            .count()
    }
}

/// A subscription to a single future map click.
#[derive(Debug)]
pub struct PendingClick {
    receiver: Receiver<GeoPoint>,
}

impl PendingClick {
    /// The delivered click, if it has arrived.
    #[must_use]
    pub fn try_take(&self) -> Option<GeoPoint> {
        self.receiver.try_recv().ok()
    }
}
