//! Plan a drive and the meal stop along it.
//!
//! [`TripPlanner::plan`] chains the collaborators: fetch a route, summarise
//! it, estimate where the traveller will be at the eating time and look up
//! restaurants around that point. Any collaborator failure fails the whole
//! plan, so callers never see a half-built report.

use log::debug;
use thiserror::Error;

use crate::{
    ClockTime, CuisinePreference, GeoPoint, NearbyRestaurant, PoiSource, PoiSourceError, Route,
    RouteError, RouteProvider, TimeOfDay, estimator::estimate_diner_point,
    selector::RestaurantFinder,
};

/// A complete trip request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripPlan {
    /// Departure point.
    pub start: GeoPoint,
    /// Destination.
    pub end: GeoPoint,
    /// Departure time of day.
    pub departure: TimeOfDay,
    /// Desired eating time; no restaurant search happens without one.
    pub eat_at: Option<TimeOfDay>,
    /// Cuisine filter.
    pub cuisine: CuisinePreference,
}

/// Distance, driving time and arrival clock of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSummary {
    /// Route length in kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Driving time as a wrapped clock reading.
    pub duration: ClockTime,
    /// Arrival time of day, wrapped past midnight.
    pub arrival: ClockTime,
}

impl TripSummary {
    /// Summarise `route` for a trip leaving at `departure`.
    ///
    /// # Examples
    /// ```
    /// use waymeal_core::{Route, RouteLeg, TimeOfDay, TripSummary};
    ///
    /// let route = Route::from_parts(vec![RouteLeg::new(12_345.0, 5_400.0)], Vec::new());
    /// let summary = TripSummary::from_route(&route, "23:00".parse()?);
    /// assert_eq!(summary.distance_km, 12.35);
    /// assert_eq!(summary.duration.to_string(), "01:30:00");
    /// assert_eq!(summary.arrival.to_string(), "00:30:00");
    /// # Ok::<(), waymeal_core::TimeParseError>(())
    /// ```
    #[must_use]
    pub fn from_route(route: &Route, departure: TimeOfDay) -> Self {
        let metres = route.summary.total_distance_m;
        let distance_km = if metres.is_finite() && metres > 0.0 {
            (metres / 10.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            distance_km,
            duration: ClockTime::from_seconds(route.summary.total_duration_s),
            arrival: departure.clock_after(route.summary.total_duration_s),
        }
    }
}

/// Restaurant outcome of a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum DinerOutcome {
    /// The eating time was missing or not after departure.
    NoRestaurantSearch,
    /// Restaurants around the estimated diner point.
    Found {
        /// Estimated position at the eating time.
        point: GeoPoint,
        /// Nearest matching restaurants, nearest first.
        restaurants: Vec<NearbyRestaurant>,
    },
}

/// Everything a front end renders for one plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripReport {
    /// The plan this report answers.
    pub plan: TripPlan,
    /// The route drawn on the map.
    pub route: Route,
    /// Trip totals.
    pub summary: TripSummary,
    /// Diner point and restaurants.
    pub diner: DinerOutcome,
}

/// Why a plan could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The routing service failed.
    #[error("route lookup failed: {0}")]
    Route(#[source] RouteError),
    /// The POI service failed.
    #[error("restaurant lookup failed: {0}")]
    Poi(#[source] PoiSourceError),
}

/// Plans trips with a routing service and a POI source.
#[derive(Debug)]
pub struct TripPlanner<R, P> {
    routes: R,
    restaurants: RestaurantFinder<P>,
}

impl<R: RouteProvider, P: PoiSource> TripPlanner<R, P> {
    /// Combine a route provider with a restaurant finder.
    pub fn new(routes: R, restaurants: RestaurantFinder<P>) -> Self {
        Self {
            routes,
            restaurants,
        }
    }

    /// Compute the route, summary and meal stop for `plan`.
    ///
    /// The restaurant finder is consulted only when the eating time falls
    /// after departure.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Route`] or [`PlanError::Poi`] when a collaborator
    /// fails.
    pub fn plan(&self, plan: &TripPlan) -> Result<TripReport, PlanError> {
        let route = self
            .routes
            .route(plan.start, plan.end)
            .map_err(PlanError::Route)?;
        let summary = TripSummary::from_route(&route, plan.departure);
        let point = plan
            .eat_at
            .and_then(|eat_at| estimate_diner_point(plan.departure, eat_at, plan.start, &route));
        let diner = match point {
            Some(point) => {
                let restaurants = self
                    .restaurants
                    .find(point, plan.cuisine.as_filter())
                    .map_err(PlanError::Poi)?;
                debug!("{} restaurants near {point}", restaurants.len());
                DinerOutcome::Found { point, restaurants }
            }
            None => DinerOutcome::NoRestaurantSearch,
        };
        Ok(TripReport {
            plan: plan.clone(),
            route,
            summary,
            diner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingRouteProvider, LinearRouteProvider, MemoryPoiSource};
    use rstest::{fixture, rstest};
    use serde_json::{Map, json};

    fn time(text: &str) -> TimeOfDay {
        text.parse().expect("valid time")
    }

    #[fixture]
    fn plan() -> TripPlan {
        TripPlan {
            start: GeoPoint::new(0.0, 0.0),
            end: GeoPoint::new(0.0, 0.5),
            departure: time("08:00"),
            eat_at: Some(time("08:10")),
            cuisine: CuisinePreference::Italian,
        }
    }

    fn italian_at(lon: f64) -> crate::RawFeature {
        let mut props = Map::new();
        props.insert("cuisine".into(), json!("italian"));
        crate::RawFeature::point(format!("node/{lon}"), lon, 0.0, props)
    }

    #[rstest]
    fn finds_restaurants_near_estimated_point(plan: TripPlan) {
        // 600 s at 20 m/s is 12 km, about 0.108 degrees of longitude.
        let source = MemoryPoiSource::with_features([italian_at(0.11), italian_at(0.4)]);
        let routes = LinearRouteProvider {
            segments: 100,
            ..LinearRouteProvider::default()
        };
        let planner = TripPlanner::new(routes, RestaurantFinder::new(source));
        let report = planner.plan(&plan).expect("plan succeeds");
        match report.diner {
            DinerOutcome::Found { restaurants, .. } => {
                assert_eq!(restaurants.len(), 1);
                assert_eq!(restaurants[0].poi.id, "node/0.11");
            }
            DinerOutcome::NoRestaurantSearch => panic!("expected a restaurant search"),
        }
    }

    #[rstest]
    #[case(Some("07:00"))]
    #[case(Some("08:00"))]
    #[case(None)]
    fn skips_search_without_valid_window(mut plan: TripPlan, #[case] eat_at: Option<&str>) {
        plan.eat_at = eat_at.map(time);
        let source = MemoryPoiSource::default();
        let planner = TripPlanner::new(LinearRouteProvider::default(), RestaurantFinder::new(&source));
        let report = planner.plan(&plan).expect("plan succeeds");
        assert_eq!(report.diner, DinerOutcome::NoRestaurantSearch);
        assert!(report.summary.distance_km > 0.0);
        assert_eq!(source.calls(), 0);
    }

    #[rstest]
    fn route_failure_is_reported(plan: TripPlan) {
        let planner = TripPlanner::new(
            FailingRouteProvider::new(RouteError::NoRoute),
            RestaurantFinder::new(MemoryPoiSource::default()),
        );
        assert_eq!(planner.plan(&plan), Err(PlanError::Route(RouteError::NoRoute)));
    }

    #[rstest]
    fn poi_failure_fails_the_plan(plan: TripPlan) {
        let failure = PoiSourceError::NetworkError {
            url: "http://overpass.invalid".into(),
            message: "connection refused".into(),
        };
        let planner = TripPlanner::new(
            LinearRouteProvider::default(),
            RestaurantFinder::new(MemoryPoiSource::failing(failure.clone())),
        );
        assert_eq!(planner.plan(&plan), Err(PlanError::Poi(failure)));
    }
}
