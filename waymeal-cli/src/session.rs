//! Interactive session command for the Waymeal CLI.
//!
//! The session reads one command per line and mirrors the trip form: points
//! can be typed, taken from the configured device location or picked with a
//! one-shot map click (`start click`, then `click LAT,LNG`). `go` plans the
//! trip and replaces everything previously drawn.

use std::io::{self, BufRead, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymeal_core::{
    CuisinePreference, DinerOutcome, Endpoint, GeoPoint, MapClicks, PendingClick,
    PlanningSession, TimeOfDay, TripDraft, TripReport,
};

use crate::plan::{local_now, parse_time};
use crate::sources::{
    ARG_DEVICE_LOCATION, ARG_OSRM_BASE_URL, ARG_OVERPASS_URL, ARG_POIS_GEOJSON, ARG_RADIUS_M,
    ARG_RESULTS, ARG_TIMEOUT_SECS, BoxedPlanner, ConfiguredLocation, DefaultPlannerBuilder,
    PlannerBuilder, SourceConfig, SourceOptions,
};
use crate::{ARG_DEPARTURE, CliError};

const HELP: &str = "\
commands:
  start LAT,LNG | start click | start device   set the departure point
  end LAT,LNG | end click                      set the destination
  click LAT,LNG                                click the map
  cuisine NAME                                 choose a cuisine (any, regional, italian, ...)
  depart HH:MM                                 set the departure time
  eat HH:MM | eat none                         set or clear the eating time
  go                                           plan the trip
  show                                         describe the current form and map
  quit                                         leave the session";

/// CLI arguments for the `session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "session",
    long_about = "Start an interactive planning session on standard input. \
                 Type `help` for the list of commands.",
    about = "Plan trips interactively"
)]
#[ortho_config(prefix = "WAYMEAL")]
pub(crate) struct SessionArgs {
    /// Initial departure time (HH:MM); defaults to the current local time.
    #[arg(long = ARG_DEPARTURE, value_name = "hh:mm")]
    #[serde(default)]
    pub(crate) departure: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = "osrm-profile", value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Query an Overpass API interpreter for restaurants.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Read restaurants from a GeoJSON export (default `restaurants.geojson`).
    #[arg(long = ARG_POIS_GEOJSON, value_name = "path")]
    #[serde(default)]
    pub(crate) pois_geojson: Option<Utf8PathBuf>,
    /// Maximum number of restaurants to list.
    #[arg(long = ARG_RESULTS, value_name = "count")]
    #[serde(default)]
    pub(crate) results: Option<usize>,
    /// Search radius around the diner point, in metres.
    #[arg(long = ARG_RADIUS_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_m: Option<f64>,
    /// Timeout for each HTTP request, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Position reported as the device location, as "LAT,LNG".
    #[arg(long = ARG_DEVICE_LOCATION, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) device_location: Option<String>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<SessionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SessionConfig::resolve(merged, local_now())
    }
}

/// Resolved `session` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SessionConfig {
    pub(crate) departure: TimeOfDay,
    pub(crate) sources: SourceConfig,
}

impl SessionConfig {
    pub(crate) fn resolve(args: SessionArgs, now: TimeOfDay) -> Result<Self, CliError> {
        let departure = parse_time(args.departure.as_deref(), ARG_DEPARTURE)?.unwrap_or(now);
        let sources = SourceConfig::try_from(SourceOptions {
            osrm_base_url: args.osrm_base_url,
            osrm_profile: args.osrm_profile,
            overpass_url: args.overpass_url,
            pois_geojson: args.pois_geojson,
            results: args.results,
            radius_m: args.radius_m,
            timeout_secs: args.timeout_secs,
            device_location: args.device_location,
        })?;
        Ok(Self { departure, sources })
    }
}

/// How a point should be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PointInput {
    Text(String),
    Click,
    Device,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Point(Endpoint, PointInput),
    Click(String),
    Cuisine(String),
    Depart(String),
    Eat(Option<String>),
    Go,
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(verb, rest)| (verb, rest.trim()));
        let command = match (verb.to_ascii_lowercase().as_str(), rest) {
            ("start", rest) => Self::Point(Endpoint::Start, point_input(rest, true)?),
            ("end", rest) => Self::Point(Endpoint::End, point_input(rest, false)?),
            ("click", "") => return Err("usage: click LAT,LNG".to_owned()),
            ("click", rest) => Self::Click(rest.to_owned()),
            ("cuisine", rest) => Self::Cuisine(rest.to_owned()),
            ("depart", "") => return Err("usage: depart HH:MM".to_owned()),
            ("depart", rest) => Self::Depart(rest.to_owned()),
            ("eat", "" | "none") => Self::Eat(None),
            ("eat", rest) => Self::Eat(Some(rest.to_owned())),
            ("go", "") => Self::Go,
            ("show", "") => Self::Show,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            _ => return Err(format!("unknown command {trimmed:?} (type `help`)")),
        };
        Ok(Some(command))
    }
}

fn point_input(rest: &str, allow_device: bool) -> Result<PointInput, String> {
    match rest.to_ascii_lowercase().as_str() {
        "" => Err("usage: start|end LAT,LNG | click".to_owned()),
        "click" => Ok(PointInput::Click),
        "device" if allow_device => Ok(PointInput::Device),
        _ => Ok(PointInput::Text(rest.to_owned())),
    }
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// State of one interactive session.
struct SessionState {
    draft: TripDraft,
    session: PlanningSession,
    clicks: MapClicks,
    waiting: Vec<(Endpoint, PendingClick)>,
    location: ConfiguredLocation,
}

impl SessionState {
    fn new(departure: TimeOfDay, location: ConfiguredLocation) -> Self {
        Self {
            draft: TripDraft::new(departure),
            session: PlanningSession::new(),
            clicks: MapClicks::default(),
            waiting: Vec::new(),
            location,
        }
    }

    /// Handle one input line and describe the result on `out`.
    fn handle(
        &mut self,
        line: &str,
        planner: &BoxedPlanner,
        out: &mut dyn Write,
    ) -> io::Result<Flow> {
        let command = match SessionCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(message) => {
                writeln!(out, "error: {message}")?;
                return Ok(Flow::Continue);
            }
        };
        match command {
            SessionCommand::Point(endpoint, input) => self.set_point(endpoint, input, out)?,
            SessionCommand::Click(text) => self.click(&text, out)?,
            SessionCommand::Cuisine(text) => match text.parse::<CuisinePreference>() {
                Ok(cuisine) => {
                    writeln!(out, "cuisine set to {cuisine}")?;
                    self.draft.set_cuisine(cuisine);
                }
                Err(message) => writeln!(out, "error: {message}")?,
            },
            SessionCommand::Depart(text) => match text.parse::<TimeOfDay>() {
                Ok(time) => {
                    self.draft.set_departure(time);
                    writeln!(out, "departure set to {time}")?;
                }
                Err(err) => writeln!(out, "error: {err}")?,
            },
            SessionCommand::Eat(None) => {
                self.draft.set_eat_at(None);
                writeln!(out, "eating time cleared")?;
            }
            SessionCommand::Eat(Some(text)) => match text.parse::<TimeOfDay>() {
                Ok(time) => {
                    self.draft.set_eat_at(Some(time));
                    writeln!(out, "eating time set to {time}")?;
                }
                Err(err) => writeln!(out, "error: {err}")?,
            },
            SessionCommand::Go => self.go(planner, out)?,
            SessionCommand::Show => self.show(out)?,
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn set_point(
        &mut self,
        endpoint: Endpoint,
        input: PointInput,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        match input {
            PointInput::Text(text) => match self.draft.set_text(endpoint, &text) {
                Ok(()) => describe_point(out, endpoint, &self.draft),
                Err(err) => writeln!(out, "error: {err}"),
            },
            PointInput::Click => {
                self.waiting.push((endpoint, self.clicks.once()));
                writeln!(out, "waiting for a map click to set the {endpoint} point")
            }
            PointInput::Device => match self.draft.use_device_location(&self.location) {
                Ok(_) => describe_point(out, endpoint, &self.draft),
                Err(err) => writeln!(out, "device location unavailable: {err}"),
            },
        }
    }

    fn click(&mut self, text: &str, out: &mut dyn Write) -> io::Result<()> {
        let point: GeoPoint = match text.parse() {
            Ok(point) => point,
            Err(err) => return writeln!(out, "error: {err}"),
        };
        if self.clicks.dispatch(point) == 0 {
            return writeln!(out, "map clicked at {point}; nothing was waiting");
        }
        for (endpoint, pending) in std::mem::take(&mut self.waiting) {
            if let Some(clicked) = pending.try_take() {
                self.draft.apply_click(endpoint, clicked);
                describe_point(out, endpoint, &self.draft)?;
            }
        }
        Ok(())
    }

    fn go(&mut self, planner: &BoxedPlanner, out: &mut dyn Write) -> io::Result<()> {
        match self.session.run(planner, &self.draft) {
            Ok(Some(report)) => describe_report(out, report),
            Ok(None) => {
                let reason = self
                    .draft
                    .to_plan()
                    .err()
                    .map_or_else(String::new, |incomplete| incomplete.to_string());
                writeln!(out, "cannot plan yet: {reason}")
            }
            Err(err) => writeln!(out, "planning failed: {err}"),
        }
    }

    fn show(&self, out: &mut dyn Write) -> io::Result<()> {
        let point_text = |point: Option<GeoPoint>| {
            point.map_or_else(|| "not set".to_owned(), |point| point.to_string())
        };
        writeln!(out, "start: {}", point_text(self.draft.start()))?;
        writeln!(out, "end: {}", point_text(self.draft.end()))?;
        writeln!(out, "departure: {}", self.draft.departure())?;
        let eat_at = self
            .draft
            .eat_at()
            .map_or_else(|| "not set".to_owned(), |time| time.to_string());
        writeln!(out, "eat at: {eat_at}")?;
        writeln!(out, "cuisine: {}", self.draft.cuisine())?;
        let overlay = self.session.overlay();
        if overlay.is_empty() {
            writeln!(out, "map: empty")
        } else {
            writeln!(
                out,
                "map: route of {} points, diner {}, {} restaurant markers",
                overlay.route().len(),
                point_text(overlay.diner()),
                overlay.restaurants().len()
            )
        }
    }
}

fn describe_point(out: &mut dyn Write, endpoint: Endpoint, draft: &TripDraft) -> io::Result<()> {
    let point = match endpoint {
        Endpoint::Start => draft.start(),
        Endpoint::End => draft.end(),
    };
    match point {
        Some(point) => writeln!(out, "{endpoint} set to {point}"),
        None => Ok(()),
    }
}

fn describe_report(out: &mut dyn Write, report: &TripReport) -> io::Result<()> {
    let summary = &report.summary;
    writeln!(
        out,
        "route: {:.2} km, {} driving, arriving at {}",
        summary.distance_km, summary.duration, summary.arrival
    )?;
    match &report.diner {
        DinerOutcome::NoRestaurantSearch => writeln!(
            out,
            "no restaurant search: the eating time is missing or not after departure"
        ),
        DinerOutcome::Found { point, restaurants } => {
            writeln!(out, "diner point: {point}")?;
            if restaurants.is_empty() {
                writeln!(out, "no matching restaurants nearby")?;
            }
            for (rank, nearby) in restaurants.iter().enumerate() {
                let poi = &nearby.poi;
                let name = poi.name.as_deref().unwrap_or(poi.id.as_str());
                let cuisine = poi.cuisine.as_deref().unwrap_or("unspecified cuisine");
                writeln!(
                    out,
                    "{}. {name} ({cuisine}), {:.0} m",
                    rank + 1,
                    nearby.distance_m
                )?;
            }
            Ok(())
        }
    }
}

pub(super) fn run_session(args: SessionArgs) -> Result<(), CliError> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout().lock();
    run_session_with(args, &DefaultPlannerBuilder, &mut input, &mut stdout)
}

pub(super) fn run_session_with(
    args: SessionArgs,
    builder: &dyn PlannerBuilder,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.sources.validate_sources()?;
    let planner = builder.build(&config.sources)?;
    drive_session(&config, &planner, input, output)
}

pub(crate) fn drive_session(
    config: &SessionConfig,
    planner: &BoxedPlanner,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let mut state = SessionState::new(config.departure, config.sources.device_location);
    let mut line = String::new();
    loop {
        line.clear();
        let read = input.read_line(&mut line).map_err(CliError::Terminal)?;
        if read == 0 {
            return Ok(());
        }
        let flow = state
            .handle(&line, planner, output)
            .map_err(CliError::Terminal)?;
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}
