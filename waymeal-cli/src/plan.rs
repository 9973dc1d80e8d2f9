//! Plan command implementation for the Waymeal CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::Timelike;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tracing::debug;
use waymeal_core::{Endpoint, TimeOfDay, TripDraft, TripPlan, TripReport};

use crate::sources::{
    ARG_DEVICE_LOCATION, ARG_OSRM_BASE_URL, ARG_OVERPASS_URL, ARG_POIS_GEOJSON, ARG_RADIUS_M,
    ARG_RESULTS, ARG_TIMEOUT_SECS, DefaultPlannerBuilder, PlannerBuilder, SourceConfig,
    SourceOptions,
};
use crate::{
    ARG_CUISINE, ARG_DEPARTURE, ARG_EAT_AT, ARG_END, ARG_START, CliError, ENV_PLAN_END,
    ENV_PLAN_START,
};

/// `--start` value selecting the configured device location.
pub(crate) const DEVICE_START: &str = "device";

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Fetch a driving route between two points, estimate where \
                 you will be at the desired eating time and list the nearest \
                 restaurants around that point. The trip report is printed \
                 as JSON.",
    about = "Plan a drive and a meal stop along it"
)]
#[ortho_config(prefix = "WAYMEAL")]
pub(crate) struct PlanArgs {
    /// Departure point as "LAT,LNG", or "device" for the configured device location.
    #[arg(long = ARG_START, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Destination as "LAT,LNG".
    #[arg(long = ARG_END, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// Departure time (HH:MM); defaults to the current local time.
    #[arg(long = ARG_DEPARTURE, value_name = "hh:mm")]
    #[serde(default)]
    pub(crate) departure: Option<String>,
    /// Desired eating time (HH:MM); without it no restaurants are searched.
    #[arg(long = ARG_EAT_AT, value_name = "hh:mm")]
    #[serde(default)]
    pub(crate) eat_at: Option<String>,
    /// Cuisine filter, e.g. "italian"; "any" matches every restaurant.
    #[arg(long = ARG_CUISINE, value_name = "name")]
    #[serde(default)]
    pub(crate) cuisine: Option<String>,
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

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }

    fn source_options(&self) -> SourceOptions {
        SourceOptions {
            osrm_base_url: self.osrm_base_url.clone(),
            osrm_profile: self.osrm_profile.clone(),
            overpass_url: self.overpass_url.clone(),
            pois_geojson: self.pois_geojson.clone(),
            results: self.results,
            radius_m: self.radius_m,
            timeout_secs: self.timeout_secs,
            device_location: self.device_location.clone(),
        }
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// The trip to plan.
    pub(crate) plan: TripPlan,
    /// Collaborator settings.
    pub(crate) sources: SourceConfig,
}

impl PlanConfig {
    /// Resolve `args`, using `now` when no departure time is given.
    pub(crate) fn resolve(args: PlanArgs, now: TimeOfDay) -> Result<Self, CliError> {
        let start = args.start.clone().ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_PLAN_START,
        })?;
        let end = args.end.clone().ok_or(CliError::MissingArgument {
            field: ARG_END,
            env: ENV_PLAN_END,
        })?;
        let sources = SourceConfig::try_from(args.source_options())?;

        let departure = parse_time(args.departure.as_deref(), ARG_DEPARTURE)?.unwrap_or(now);
        let mut draft = TripDraft::new(departure);
        if start.trim().eq_ignore_ascii_case(DEVICE_START) {
            draft
                .use_device_location(&sources.device_location)
                .map_err(CliError::DeviceLocation)?;
        } else {
            draft
                .set_start_text(&start)
                .map_err(|source| CliError::InvalidCoordinate {
                    field: ARG_START,
                    source,
                })?;
        }
        draft
            .set_end_text(&end)
            .map_err(|source| CliError::InvalidCoordinate {
                field: ARG_END,
                source,
            })?;
        draft.set_eat_at(parse_time(args.eat_at.as_deref(), ARG_EAT_AT)?);
        if let Some(cuisine) = args.cuisine.as_deref() {
            draft.set_cuisine(cuisine.parse().map_err(CliError::InvalidCuisine)?);
        }

        let plan = draft.to_plan().map_err(|incomplete| match incomplete.missing {
            Endpoint::Start => CliError::MissingArgument {
                field: ARG_START,
                env: ENV_PLAN_START,
            },
            Endpoint::End => CliError::MissingArgument {
                field: ARG_END,
                env: ENV_PLAN_END,
            },
        })?;
        Ok(Self { plan, sources })
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        Self::resolve(args, local_now())
    }
}

/// Parse an optional `HH:MM` option.
pub(crate) fn parse_time(
    text: Option<&str>,
    field: &'static str,
) -> Result<Option<TimeOfDay>, CliError> {
    text.map(|value| {
        value
            .parse()
            .map_err(|source| CliError::InvalidTime { field, source })
    })
    .transpose()
}

/// The current local wall-clock time, to the minute.
pub(crate) fn local_now() -> TimeOfDay {
    let now = chrono::Local::now();
    TimeOfDay::from_hm(now.hour(), now.minute()).unwrap_or(TimeOfDay::MIDNIGHT)
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultPlannerBuilder;
    run_plan_with(args, &builder, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_plan(args, builder)?;
    write_report(writer, &report)
}

fn execute_plan(args: PlanArgs, builder: &dyn PlannerBuilder) -> Result<TripReport, CliError> {
    let config = resolve_plan_config(args)?;
    debug!(
        start = %config.plan.start,
        end = %config.plan.end,
        departure = %config.plan.departure,
        "planning trip"
    );
    let planner = builder.build(&config.sources)?;
    Ok(planner.plan(&config.plan)?)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.sources.validate_sources()?;
    Ok(config)
}

fn write_report(writer: &mut dyn Write, report: &TripReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::Terminal)?;
    writer.write_all(b"\n").map_err(CliError::Terminal)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
    now: TimeOfDay,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::resolve(merged, now)
}
