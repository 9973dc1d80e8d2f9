//! Collaborator settings shared by the `plan` and `session` commands.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use waymeal_core::{
    FixedLocation, GeoPoint, PoiSource, RestaurantFinder, RouteProvider, SelectorConfig,
    TripPlanner,
};
use waymeal_data::{
    GeoJsonFilePoiSource, HttpConfig, HttpOverpassPoiSource, HttpRouteProvider,
    HttpRouteProviderConfig,
};

use crate::CliError;

pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_POIS_GEOJSON: &str = "pois-geojson";
pub(crate) const ARG_RESULTS: &str = "results";
pub(crate) const ARG_RADIUS_M: &str = "radius-m";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_DEVICE_LOCATION: &str = "device-location";

/// Public OSRM demo server.
pub(crate) const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// Restaurant export looked up in the working directory.
pub(crate) const DEFAULT_POIS_GEOJSON: &str = "restaurants.geojson";

/// Device location as configured by the user, if any.
pub(crate) type ConfiguredLocation = Option<FixedLocation>;

/// Trip planner wired to boxed collaborators.
pub(crate) type BoxedPlanner = TripPlanner<Box<dyn RouteProvider>, Box<dyn PoiSource>>;

/// Raw collaborator options as merged from every configuration layer.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceOptions {
    pub(crate) osrm_base_url: Option<String>,
    pub(crate) osrm_profile: Option<String>,
    pub(crate) overpass_url: Option<String>,
    pub(crate) pois_geojson: Option<Utf8PathBuf>,
    pub(crate) results: Option<usize>,
    pub(crate) radius_m: Option<f64>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) device_location: Option<String>,
}

/// Where restaurant candidates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PoiBackend {
    /// An Overpass API interpreter.
    Overpass { url: String },
    /// A GeoJSON `FeatureCollection` on disk.
    GeoJson { path: Utf8PathBuf },
}

/// Resolved collaborator settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceConfig {
    pub(crate) osrm_base_url: String,
    pub(crate) osrm_profile: String,
    pub(crate) pois: PoiBackend,
    pub(crate) selector: SelectorConfig,
    pub(crate) timeout: Duration,
    pub(crate) device_location: ConfiguredLocation,
}

impl TryFrom<SourceOptions> for SourceConfig {
    type Error = CliError;

    fn try_from(options: SourceOptions) -> Result<Self, Self::Error> {
        let pois = match (options.overpass_url, options.pois_geojson) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_OVERPASS_URL,
                    second: ARG_POIS_GEOJSON,
                });
            }
            (Some(url), None) => PoiBackend::Overpass { url },
            (None, Some(path)) => PoiBackend::GeoJson { path },
            (None, None) => PoiBackend::GeoJson {
                path: Utf8PathBuf::from(DEFAULT_POIS_GEOJSON),
            },
        };

        let mut selector = SelectorConfig::default();
        if let Some(results) = options.results {
            if results == 0 {
                return Err(CliError::InvalidNumber {
                    field: ARG_RESULTS,
                    requirement: "at least 1",
                });
            }
            selector.result_count = results;
        }
        if let Some(radius_m) = options.radius_m {
            if !(radius_m.is_finite() && radius_m > 0.0) {
                return Err(CliError::InvalidNumber {
                    field: ARG_RADIUS_M,
                    requirement: "a positive number of metres",
                });
            }
            selector.radius_m = radius_m;
        }

        let timeout = match options.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidNumber {
                    field: ARG_TIMEOUT_SECS,
                    requirement: "at least 1",
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => HttpConfig::new(DEFAULT_OSRM_BASE_URL).timeout,
        };

        let device_location = options
            .device_location
            .map(|text| {
                text.parse::<GeoPoint>()
                    .map(FixedLocation::new)
                    .map_err(|source| CliError::InvalidCoordinate {
                        field: ARG_DEVICE_LOCATION,
                        source,
                    })
            })
            .transpose()?;

        let defaults = HttpRouteProviderConfig::new(DEFAULT_OSRM_BASE_URL);
        Ok(Self {
            osrm_base_url: options.osrm_base_url.unwrap_or(defaults.http.base_url),
            osrm_profile: options.osrm_profile.unwrap_or(defaults.profile),
            pois,
            selector,
            timeout,
            device_location,
        })
    }
}

impl SourceConfig {
    /// Check that a file-backed POI source points at a readable file.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match &self.pois {
            PoiBackend::GeoJson { path } => require_existing(path, ARG_POIS_GEOJSON),
            PoiBackend::Overpass { .. } => Ok(()),
        }
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match waymeal_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds a trip planner for the current invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &SourceConfig) -> Result<BoxedPlanner, CliError>;
}

/// Wires the HTTP and file adapters from `waymeal-data`.
pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &SourceConfig) -> Result<BoxedPlanner, CliError> {
        let route_config = HttpRouteProviderConfig::new(config.osrm_base_url.clone())
            .with_profile(config.osrm_profile.clone())
            .with_timeout(config.timeout);
        let routes = HttpRouteProvider::with_config(route_config).map_err(|source| {
            CliError::BuildProvider {
                service: "OSRM",
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;

        let pois: Box<dyn PoiSource> = match &config.pois {
            PoiBackend::Overpass { url } => {
                let http = HttpConfig::new(url.clone()).with_timeout(config.timeout);
                Box::new(HttpOverpassPoiSource::with_config(http).map_err(|source| {
                    CliError::BuildProvider {
                        service: "Overpass",
                        base_url: url.clone(),
                        source,
                    }
                })?)
            }
            PoiBackend::GeoJson { path } => {
                let source = GeoJsonFilePoiSource::open(path).map_err(CliError::LoadPois)?;
                debug!(path = %path, features = source.len(), "loaded restaurant export");
                Box::new(source)
            }
        };

        let routes: Box<dyn RouteProvider> = Box::new(routes);
        let finder = RestaurantFinder::with_config(pois, config.selector.clone());
        Ok(TripPlanner::new(routes, finder))
    }
}
