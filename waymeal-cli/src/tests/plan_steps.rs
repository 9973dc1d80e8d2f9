//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::helpers::{StubPlannerBuilder, Workspace, equator_restaurants};
use super::*;
use crate::plan::run_plan_with;
use crate::sources::{ARG_OVERPASS_URL, ARG_POIS_GEOJSON, ARG_RADIUS_M};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use waymeal_core::{DinerOutcome, TripReport};

#[derive(Debug)]
struct PlanWorld {
    workspace: Workspace,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_args<const N: usize>(&self, args: [&str; N]) {
        self.cli_args
            .borrow_mut()
            .extend(args.into_iter().map(str::to_owned));
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["waymeal".to_owned(), "plan".to_owned()];
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn report(&self) -> TripReport {
        let borrowed = self.result.borrow();
        borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success");
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON trip report")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

#[given("a restaurant export exists on disk")]
fn export_exists(#[from(world)] world: &PlanWorld) {
    let path = world.workspace.pois_geojson();
    assert!(path.as_std_path().is_file(), "expected {path} to exist");
    world.push_args([format!("--{ARG_POIS_GEOJSON}").as_str(), path.as_str()]);
}

#[given("I plan a trip along the equator departing at noon")]
fn equator_trip(#[from(world)] world: &PlanWorld) {
    world.push_args([
        "--start",
        "0, 0",
        "--end",
        "0, 1",
        "--departure",
        "12:00",
        format!("--{ARG_RADIUS_M}").as_str(),
        "20000",
    ]);
}

#[given("I want to eat italian food half an hour after departure")]
fn italian_at_half_past(#[from(world)] world: &PlanWorld) {
    world.push_args(["--eat-at", "12:30", "--cuisine", "italian"]);
}

#[given("I only give the start point")]
fn only_start(#[from(world)] world: &PlanWorld) {
    world.push_args(["--start", "0, 0"]);
}

#[given("I also pass an Overpass URL")]
fn also_overpass(#[from(world)] world: &PlanWorld) {
    world.push_args([
        format!("--{ARG_OVERPASS_URL}").as_str(),
        "https://overpass.example/api/interpreter",
    ]);
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Plan(args) => {
            let builder = StubPlannerBuilder::new(equator_restaurants());
            let mut buffer = world.stdout.borrow_mut();
            run_plan_with(args, &builder, &mut *buffer)
        }
        Command::Session(_) => panic!("expected plan command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints a trip report")]
fn prints_report(#[from(world)] world: &PlanWorld) {
    let report = world.report();
    assert_eq!(report.route.polyline.len(), 11);
    assert!(report.summary.distance_km > 100.0);
}

#[then("the report lists the nearest italian restaurant")]
fn lists_italian(#[from(world)] world: &PlanWorld) {
    match world.report().diner {
        DinerOutcome::Found { restaurants, .. } => {
            let names: Vec<_> = restaurants
                .iter()
                .filter_map(|nearby| nearby.poi.name.as_deref())
                .collect();
            assert_eq!(names, ["Trattoria Zero"]);
        }
        other => panic!("expected restaurants, found {other:?}"),
    }
}

#[then("the report skips the restaurant search")]
fn skips_search(#[from(world)] world: &PlanWorld) {
    assert_eq!(world.report().diner, DinerOutcome::NoRestaurantSearch);
}

#[then("the command reports that the \"end\" flag is missing")]
fn reports_missing_end(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_END);
            assert_eq!(*env, ENV_PLAN_END);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the restaurant sources conflict")]
fn reports_conflict(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::ConflictingArguments { .. } => {}
        other => panic!("expected ConflictingArguments, found {other:?}"),
    }
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_with_meal_stop, "planning a trip with a meal stop");
register_plan_scenario!(plan_without_eating_time, "planning a trip without an eating time");
register_plan_scenario!(plan_missing_destination, "rejecting a missing destination");
register_plan_scenario!(plan_conflicting_sources, "rejecting two restaurant sources");
