//! Own the rendered map state and serialise trip computations.
//!
//! A [`PlanningSession`] holds exactly one [`MapOverlay`]. Each computation
//! starts with [`PlanningSession::begin`], which clears the overlay and
//! issues a [`ComputationTicket`]. Only the ticket from the most recent
//! `begin` may commit; older results are discarded so a slow response can
//! never overwrite a newer plan.
//!
//! # Examples
//! ```
//! use waymeal_core::{CommitOutcome, PlanError, PlanningSession, RouteError};
//!
//! let mut session = PlanningSession::new();
//! let first = session.begin();
//! let second = session.begin();
//! let stale = session.commit(first, Err(PlanError::Route(RouteError::NoRoute)));
//! assert_eq!(stale, CommitOutcome::Superseded);
//! assert!(session.overlay().is_empty());
//! # let _ = second;
//! ```

use log::{debug, warn};

use crate::{
    GeoPoint, InputIncomplete, NearbyRestaurant, PlanError, PoiSource, RouteProvider, TripDraft,
    TripPlanner, TripReport, planner::DinerOutcome,
};

/// The map objects drawn for one plan.
///
/// Every field is replaced as a whole; nothing accumulates across renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOverlay {
    route: Vec<GeoPoint>,
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
    diner: Option<GeoPoint>,
    restaurants: Vec<NearbyRestaurant>,
}

impl MapOverlay {
    /// Remove every drawn object.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace the drawn objects with those of `report`.
    pub fn render(&mut self, report: &TripReport) {
        self.clear();
        self.route.clone_from(&report.route.polyline);
        self.start = Some(report.plan.start);
        self.end = Some(report.plan.end);
        if let DinerOutcome::Found { point, restaurants } = &report.diner {
            self.diner = Some(*point);
            self.restaurants.clone_from(restaurants);
        }
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The route line.
    #[must_use]
    pub fn route(&self) -> &[GeoPoint] {
        &self.route
    }

    /// Start and end markers.
    #[must_use]
    pub fn endpoints(&self) -> (Option<GeoPoint>, Option<GeoPoint>) {
        (self.start, self.end)
    }

    /// The diner marker.
    #[must_use]
    pub fn diner(&self) -> Option<GeoPoint> {
        self.diner
    }

    /// Restaurant markers, nearest first.
    #[must_use]
    pub fn restaurants(&self) -> &[NearbyRestaurant] {
        &self.restaurants
    }
}

/// Proof that a computation was started by [`PlanningSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be committed for its result to be shown"]
pub struct ComputationTicket(u64);

/// What [`PlanningSession::commit`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A newer computation had started; the result was dropped.
    Superseded,
    /// The report is now drawn.
    Rendered,
    /// The plan failed; the overlay stays empty.
    Failed,
}

/// Serialises trip computations over a single owned overlay.
#[derive(Debug, Default)]
pub struct PlanningSession {
    overlay: MapOverlay,
    generation: u64,
    last_report: Option<TripReport>,
    last_error: Option<PlanError>,
}

impl PlanningSession {
    /// A session with an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a computation: clear the overlay and supersede older tickets.
    pub fn begin(&mut self) -> ComputationTicket {
        self.overlay.clear();
        self.last_report = None;
        self.last_error = None;
        self.generation = self.generation.wrapping_add(1);
        ComputationTicket(self.generation)
    }

    /// Whether `ticket` belongs to the most recent computation.
    #[must_use]
    pub fn is_current(&self, ticket: ComputationTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Publish the result of the computation identified by `ticket`.
    pub fn commit(
        &mut self,
        ticket: ComputationTicket,
        result: Result<TripReport, PlanError>,
    ) -> CommitOutcome {
        if !self.is_current(ticket) {
            debug!("discarding result of superseded computation {}", ticket.0);
            return CommitOutcome::Superseded;
        }
        match result {
            Ok(report) => {
                self.overlay.render(&report);
                self.last_report = Some(report);
                CommitOutcome::Rendered
            }
            Err(err) => {
                warn!("trip planning failed: {err}");
                self.last_error = Some(err);
                CommitOutcome::Failed
            }
        }
    }

    /// Plan `draft` and commit the result.
    ///
    /// Returns `Ok(None)` without touching the overlay when the draft lacks a
    /// start or end point.
    ///
    /// # Errors
    ///
    /// Returns the [`PlanError`] of a failed plan after recording it; the
    /// overlay is left cleared.
    pub fn run<R, P>(
        &mut self,
        planner: &TripPlanner<R, P>,
        draft: &TripDraft,
    ) -> Result<Option<&TripReport>, PlanError>
    where
        R: RouteProvider,
        P: PoiSource,
    {
        let plan = match draft.to_plan() {
            Ok(plan) => plan,
            Err(InputIncomplete { missing }) => {
                debug!("not planning: {missing} point is not set");
                return Ok(None);
            }
        };
        let ticket = self.begin();
        let result = planner.plan(&plan);
        match self.commit(ticket, result) {
            CommitOutcome::Rendered => Ok(self.last_report.as_ref()),
            CommitOutcome::Failed | CommitOutcome::Superseded => {
                self.last_error.clone().map_or(Ok(None), Err)
            }
        }
    }

    /// The drawn map state.
    #[must_use]
    pub fn overlay(&self) -> &MapOverlay {
        &self.overlay
    }

    /// The report currently drawn, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&TripReport> {
        self.last_report.as_ref()
    }

    /// The failure of the most recent computation, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&PlanError> {
        self.last_error.as_ref()
    }
}
