//! HTTP-based `RouteProvider` using OSRM's Route API.
//!
//! Requests have the form
//! `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson&steps=true`.
//! Every step of every leg becomes one [`RouteLeg`], in travel order, and the
//! GeoJSON geometry becomes the polyline with its axes swapped to
//! latitude/longitude.

use std::time::Duration;

use log::debug;
use waymeal_core::{GeoPoint, Route, RouteError, RouteLeg, RouteProvider, RouteSummary};

use super::osrm::{RouteDto, RouteResponse};
use crate::http::{BlockingClient, HttpConfig, ProviderBuildError, TransportFailure};

/// Routing profile used by the reference deployment.
pub const DEFAULT_PROFILE: &str = "driving";

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRouteProviderConfig {
    /// Connection settings.
    pub http: HttpConfig,
    /// OSRM profile segment of the URL, e.g. `"driving"`.
    pub profile: String,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

impl HttpRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpConfig::new(base_url),
            profile: DEFAULT_PROFILE.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http = self.http.with_user_agent(user_agent);
        self
    }

    /// Set the OSRM profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }
}

/// HTTP-based route provider using the OSRM Route API.
///
/// The provider owns a Tokio runtime that is reused across calls; see
/// [`crate::http`] for how it behaves inside an existing runtime.
#[derive(Debug)]
pub struct HttpRouteProvider {
    http: BlockingClient,
    profile: String,
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            http: BlockingClient::new(config.http)?,
            profile: config.profile,
        })
    }

    /// Build the OSRM Route API URL for a start/end pair.
    fn build_route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.http.config.trimmed_base_url(),
            self.profile,
            start.longitude,
            start.latitude,
            end.longitude,
            end.latitude,
        )
    }

    /// Fetch the route asynchronously.
    async fn fetch_route_async(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        let url = self.build_route_url(start, end);
        debug!("requesting route from {url}");

        let response = self
            .http
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        decode_route_response(&url, status, &body)
    }

    /// Convert a reqwest error to a `RouteError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteError {
        match self.http.classify(error) {
            TransportFailure::Timeout { timeout_secs } => RouteError::Timeout {
                url: url.to_owned(),
                timeout_secs,
            },
            TransportFailure::Status { status, message } => RouteError::HttpError {
                url: url.to_owned(),
                status,
                message,
            },
            TransportFailure::Network { message } => RouteError::NetworkError {
                url: url.to_owned(),
                message,
            },
        }
    }
}

/// Turn an OSRM Route API reply into a [`Route`].
///
/// OSRM reports `NoRoute` and `InvalidQuery` with a 400 status and a JSON
/// body, so the body is decoded before the status is considered. A non-2xx
/// reply whose body is not OSRM JSON, such as a proxy error page, becomes
/// [`RouteError::HttpError`] with the status reason as message.
///
/// # Errors
///
/// Returns [`RouteError::NoRoute`] when no route connects the endpoints,
/// [`RouteError::ServiceError`] for other OSRM failure codes and
/// [`RouteError::ParseError`] when a successful body cannot be decoded.
pub fn decode_route_response(url: &str, status: u16, body: &str) -> Result<Route, RouteError> {
    match serde_json::from_str::<RouteResponse>(body) {
        Ok(decoded) => convert_response(decoded),
        Err(_) if !(200..300).contains(&status) => Err(RouteError::HttpError {
            url: url.to_owned(),
            status,
            message: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or_default()
                .to_owned(),
        }),
        Err(err) => Err(RouteError::ParseError {
            message: err.to_string(),
        }),
    }
}

/// Convert an OSRM response to a `Route`.
fn convert_response(response: RouteResponse) -> Result<Route, RouteError> {
    if response.code == "NoRoute" {
        return Err(RouteError::NoRoute);
    }
    if !response.is_ok() {
        return Err(RouteError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let best = response
        .routes
        .into_iter()
        .next()
        .ok_or(RouteError::NoRoute)?;
    Ok(convert_route(best))
}

fn convert_route(route: RouteDto) -> Route {
    let legs = route
        .legs
        .iter()
        .flat_map(|leg| {
            if leg.steps.is_empty() {
                vec![RouteLeg::new(leg.distance, leg.duration)]
            } else {
                leg.steps
                    .iter()
                    .map(|step| RouteLeg::new(step.distance, step.duration))
                    .collect()
            }
        })
        .collect();
    let polyline = route
        .geometry
        .map(|line| {
            line.coordinates
                .into_iter()
                .map(|[lon, lat]| GeoPoint::from_lon_lat(lon, lat))
                .collect()
        })
        .unwrap_or_default();
    let summary = RouteSummary {
        total_distance_m: route.distance,
        total_duration_s: route.duration,
    };
    Route::new(summary, legs, polyline)
}

impl RouteProvider for HttpRouteProvider {
    /// Fetch the driving route between `start` and `end`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). A `current_thread` caller
    /// falls back to the provider's own runtime.
    fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<Route, RouteError> {
        self.http.block_on(self.fetch_route_async(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn endpoints() -> (GeoPoint, GeoPoint) {
        (GeoPoint::new(51.5, -0.1), GeoPoint::new(51.6, -0.2))
    }

    fn decode(json: &str) -> RouteResponse {
        serde_json::from_str(json).expect("should deserialise")
    }

    #[rstest]
    fn build_route_url_formats_lon_lat_pairs(endpoints: (GeoPoint, GeoPoint)) {
        let provider = HttpRouteProvider::new("http://osrm.example.com").expect("provider builds");
        let (start, end) = endpoints;

        let url = provider.build_route_url(start, end);

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/-0.1,51.5;-0.2,51.6?overview=full&geometries=geojson&steps=true"
        );
    }

    #[rstest]
    fn build_route_url_strips_trailing_slash(endpoints: (GeoPoint, GeoPoint)) {
        let config = HttpRouteProviderConfig::new("http://osrm.example.com/").with_profile("car");
        let provider = HttpRouteProvider::with_config(config).expect("provider builds");
        let (start, end) = endpoints;

        let url = provider.build_route_url(start, end);

        assert!(url.starts_with("http://osrm.example.com/route/v1/car/"));
        assert!(!url.contains("//route"));
    }

    #[rstest]
    fn convert_response_flattens_steps_of_every_leg() {
        let response = decode(
            r#"{"code": "Ok", "routes": [{
                "distance": 3000.0, "duration": 300.0,
                "geometry": {"type": "LineString", "coordinates": [[-0.1, 51.5], [-0.15, 51.55], [-0.2, 51.6]]},
                "legs": [
                    {"distance": 1000.0, "duration": 100.0, "steps": [
                        {"distance": 600.0, "duration": 60.0},
                        {"distance": 400.0, "duration": 40.0}
                    ]},
                    {"distance": 2000.0, "duration": 200.0, "steps": [
                        {"distance": 2000.0, "duration": 200.0}
                    ]}
                ]
            }]}"#,
        );

        let route = convert_response(response).expect("should convert");

        assert_eq!(
            route.legs,
            vec![
                RouteLeg::new(600.0, 60.0),
                RouteLeg::new(400.0, 40.0),
                RouteLeg::new(2000.0, 200.0),
            ]
        );
        assert_eq!(route.summary.total_distance_m, 3000.0);
        assert_eq!(route.polyline[0], GeoPoint::new(51.5, -0.1));
        assert_eq!(route.polyline.len(), 3);
    }

    #[rstest]
    fn convert_response_uses_legs_without_steps() {
        let response = decode(
            r#"{"code": "Ok", "routes": [{
                "distance": 1000.0, "duration": 100.0,
                "legs": [{"distance": 1000.0, "duration": 100.0}]
            }]}"#,
        );

        let route = convert_response(response).expect("should convert");

        assert_eq!(route.legs, vec![RouteLeg::new(1000.0, 100.0)]);
        assert!(route.polyline.is_empty());
    }

    #[rstest]
    #[case(r#"{"code": "NoRoute", "message": "Impossible route"}"#)]
    #[case(r#"{"code": "Ok", "routes": []}"#)]
    fn convert_response_reports_missing_route(#[case] json: &str) {
        let err = convert_response(decode(json)).expect_err("should fail");
        assert_eq!(err, RouteError::NoRoute);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response = decode(r#"{"code": "InvalidQuery", "message": "Query string malformed"}"#);

        let err = convert_response(response).expect_err("should fail");

        match err {
            RouteError::ServiceError { code, message } => {
                assert_eq!(code, "InvalidQuery");
                assert_eq!(message, "Query string malformed");
            }
            _ => panic!("expected ServiceError, got {err:?}"),
        }
    }

    const URL: &str = "http://osrm.example.com/route/v1/driving/2.35,48.85;2.29,48.86";

    #[rstest]
    fn bad_request_with_no_route_body_is_no_route() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;

        assert_eq!(decode_route_response(URL, 400, body), Err(RouteError::NoRoute));
    }

    #[rstest]
    fn bad_request_with_invalid_query_is_a_service_error() {
        let body = r#"{"code":"InvalidQuery","message":"Query string malformed close to position 28"}"#;

        let err = decode_route_response(URL, 400, body).expect_err("should fail");

        assert!(
            matches!(&err, RouteError::ServiceError { code, .. } if code == "InvalidQuery"),
            "got {err:?}"
        );
    }

    #[rstest]
    fn gateway_error_page_is_an_http_error() {
        let body = "<html><head><title>502 Bad Gateway</title></head></html>";

        let err = decode_route_response(URL, 502, body).expect_err("should fail");

        assert_eq!(
            err,
            RouteError::HttpError {
                url: URL.to_owned(),
                status: 502,
                message: "Bad Gateway".to_owned(),
            }
        );
    }

    #[rstest]
    fn garbled_success_is_a_parse_error() {
        let err = decode_route_response(URL, 200, "{\"code\": ").expect_err("truncated body");

        assert!(matches!(err, RouteError::ParseError { .. }));
    }

    #[rstest]
    fn successful_reply_becomes_a_route() {
        let body = r#"{"code":"Ok","waypoints":[],"routes":[{
            "distance":5200.4,"duration":610.2,"weight":610.2,"weight_name":"routability",
            "geometry":{"type":"LineString","coordinates":[[2.3522,48.8566],[2.32,48.86],[2.2945,48.8584]]},
            "legs":[{"distance":5200.4,"duration":610.2,"summary":"","weight":610.2,"steps":[
                {"distance":3000.0,"duration":350.0,"name":"Quai","mode":"driving"},
                {"distance":2200.4,"duration":260.2,"name":"Avenue","mode":"driving"}
            ]}]
        }]}"#;

        let route = decode_route_response(URL, 200, body).expect("valid route");

        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.polyline[0], GeoPoint::new(48.8566, 2.3522));
        assert_eq!(route.summary.total_duration_s, 610.2);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpRouteProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_profile("car");

        assert_eq!(config.http.base_url, "http://example.com");
        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.http.user_agent, "test-agent/1.0");
        assert_eq!(config.profile, "car");
    }
}
