//! Behavioural tests for planning a trip through a `PlanningSession`.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Map, json};
use std::cell::RefCell;
use waymeal_core::{
    CuisinePreference, DinerOutcome, GeoPoint, PlanError, PlanningSession, PoiQuery, PoiSource,
    PoiSourceError, RawFeature, RestaurantFinder, Route, RouteError, RouteLeg, RouteProvider,
    TimeOfDay, TripDraft, TripPlanner, TripReport, geometry::path_length_m,
};

/// Straight eastward route at 20 m/s with a point every 0.001 degrees.
struct StraightRoute;

impl RouteProvider for StraightRoute {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        let steps = 200;
        let polyline: Vec<GeoPoint> = (0..=steps)
            .map(|i| {
                let t = f64::from(i) / f64::from(steps);
                GeoPoint::new(
                    start.latitude + (end.latitude - start.latitude) * t,
                    start.longitude + (end.longitude - start.longitude) * t,
                )
            })
            .collect();
        let metres = path_length_m(&polyline);
        Ok(Route::from_parts(
            vec![RouteLeg::new(metres, metres / 20.0)],
            polyline,
        ))
    }
}

struct ListedPois(Result<Vec<RawFeature>, PoiSourceError>);

impl PoiSource for ListedPois {
    fn fetch_features(&self, _query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        self.0.clone()
    }
}

fn restaurant(id: &str, cuisine: &str, latitude: f64) -> RawFeature {
    let mut props = Map::new();
    props.insert("amenity".into(), json!("restaurant"));
    props.insert("cuisine".into(), json!(cuisine));
    RawFeature::point(id, 0.054, latitude, props)
}

fn time(text: &str) -> TimeOfDay {
    text.parse().expect("valid time")
}

fn draft_to_east(eat_at: &str) -> TripDraft {
    let mut draft = TripDraft::new(time("12:00"));
    draft.set_start(GeoPoint::new(0.0, 0.0));
    draft.set_end(GeoPoint::new(0.0, 0.2));
    draft.set_eat_at(Some(time(eat_at)));
    draft.set_cuisine(CuisinePreference::Italian);
    draft
}

#[derive(Default)]
struct PlanningWorld {
    source: RefCell<Option<ListedPois>>,
    draft: RefCell<Option<TripDraft>>,
    session: RefCell<PlanningSession>,
    outcome: RefCell<Option<Result<Option<TripReport>, PlanError>>>,
}

#[fixture]
fn world() -> PlanningWorld {
    PlanningWorld::default()
}

#[given("restaurants tagged italian, french and italian-french-fusion near the route")]
fn given_restaurants(#[from(world)] world: &PlanningWorld) {
    *world.source.borrow_mut() = Some(ListedPois(Ok(vec![
        restaurant("node/fusion", "italian-french-fusion", 0.003),
        restaurant("node/french", "french", 0.002),
        restaurant("node/italian", "italian", 0.001),
    ])));
}

#[given("a POI service that is unreachable")]
fn given_unreachable(#[from(world)] world: &PlanningWorld) {
    *world.source.borrow_mut() = Some(ListedPois(Err(PoiSourceError::NetworkError {
        url: "http://overpass.invalid/api/interpreter".into(),
        message: "connection refused".into(),
    })));
}

#[given("a complete trip draft with an italian preference")]
fn given_complete_draft(#[from(world)] world: &PlanningWorld) {
    *world.draft.borrow_mut() = Some(draft_to_east("12:05"));
}

#[given("a complete trip draft eating before departure")]
fn given_early_draft(#[from(world)] world: &PlanningWorld) {
    *world.draft.borrow_mut() = Some(draft_to_east("11:00"));
}

#[given("a trip draft without a destination")]
fn given_incomplete_draft(#[from(world)] world: &PlanningWorld) {
    let mut draft = draft_to_east("12:05");
    draft.clear_end();
    *world.draft.borrow_mut() = Some(draft);
}

#[when("I compute the route")]
fn when_compute(#[from(world)] world: &PlanningWorld) {
    let source = world.source.borrow_mut().take().expect("POI source set");
    let planner = TripPlanner::new(StraightRoute, RestaurantFinder::new(source));
    let draft = world.draft.borrow().clone().expect("draft set");
    let mut session = world.session.borrow_mut();
    let outcome = session.run(&planner, &draft).map(|report| report.cloned());
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the italian and fusion restaurants are shown nearest first")]
fn then_filtered(#[from(world)] world: &PlanningWorld) {
    let session = world.session.borrow();
    let ids: Vec<_> = session
        .overlay()
        .restaurants()
        .iter()
        .map(|r| r.poi.id.as_str())
        .collect();
    assert_eq!(ids, ["node/italian", "node/fusion"]);
}

#[then("the trip summary is shown without a restaurant search")]
fn then_no_search(#[from(world)] world: &PlanningWorld) {
    let outcome = world.outcome.borrow();
    let report = outcome
        .as_ref()
        .and_then(|o| o.as_ref().ok())
        .and_then(Option::as_ref)
        .expect("report produced");
    assert_eq!(report.diner, DinerOutcome::NoRestaurantSearch);
    assert!(report.summary.distance_km > 22.0);
    assert!(world.session.borrow().overlay().restaurants().is_empty());
}

#[then("the failure is reported and the map is empty")]
fn then_failure(#[from(world)] world: &PlanningWorld) {
    let outcome = world.outcome.borrow();
    assert!(
        matches!(outcome.as_ref(), Some(Err(PlanError::Poi(_)))),
        "expected a POI failure, got {outcome:?}"
    );
    assert!(world.session.borrow().overlay().is_empty());
}

#[then("nothing is planned")]
fn then_nothing(#[from(world)] world: &PlanningWorld) {
    assert!(matches!(world.outcome.borrow().as_ref(), Some(Ok(None))));
    assert!(world.session.borrow().overlay().is_empty());
}

#[scenario(path = "tests/features/trip_planning.feature", index = 0)]
fn cuisine_filter(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_planning.feature", index = 1)]
fn eating_before_departure(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_planning.feature", index = 2)]
fn poi_service_failure(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/trip_planning.feature", index = 3)]
fn incomplete_draft(world: PlanningWorld) {
    let _ = world;
}
