//! Error types emitted by the Waymeal CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymeal_core::{GeoPointParseError, GeolocationError, PlanError, PoiSourceError, TimeParseError};
use waymeal_data::ProviderBuildError;

/// Errors emitted by the Waymeal CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Two options that select the same resource were both set.
    #[error("--{first} and --{second} cannot be used together")]
    ConflictingArguments {
        first: &'static str,
        second: &'static str,
    },
    /// A coordinate option did not parse as `LAT,LNG`.
    #[error("invalid {field} coordinate: {source}")]
    InvalidCoordinate {
        field: &'static str,
        #[source]
        source: GeoPointParseError,
    },
    /// A time option did not parse as `HH:MM`.
    #[error("invalid {field} time: {source}")]
    InvalidTime {
        field: &'static str,
        #[source]
        source: TimeParseError,
    },
    /// The cuisine option was not recognised.
    #[error("invalid cuisine: {0}")]
    InvalidCuisine(String),
    /// A numeric option was out of range.
    #[error("{field} must be {requirement}")]
    InvalidNumber {
        field: &'static str,
        requirement: &'static str,
    },
    /// The device location was requested but could not be read.
    #[error("cannot use the device location: {0}")]
    DeviceLocation(#[source] GeolocationError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildProvider {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Loading the restaurant export failed.
    #[error("failed to load restaurants: {0}")]
    LoadPois(#[source] PoiSourceError),
    /// Planning the trip failed.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Serialising the trip report failed.
    #[error("failed to serialise trip report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Reading input or writing output failed.
    #[error("failed to access the terminal: {0}")]
    Terminal(#[source] std::io::Error),
}
