//! HTTP-based `PoiSource` using the Overpass API.

use std::time::Duration;

use log::{debug, warn};
use url::Url;
use waymeal_core::{PoiQuery, PoiSource, PoiSourceError, RawFeature};

use super::overpass::{OverpassResponseDto, build_query};
use crate::http::{BlockingClient, HttpConfig, ProviderBuildError, TransportFailure};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass API client answering restaurant radius queries.
///
/// The query is sent as the `data` parameter of a GET request to the
/// configured interpreter URL.
#[derive(Debug)]
pub struct HttpOverpassPoiSource {
    http: BlockingClient,
}

impl HttpOverpassPoiSource {
    /// Create a source for the interpreter at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpConfig::new(base_url))
    }

    /// Create a source with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            http: BlockingClient::new(config)?,
        })
    }

    /// Create a source for [`DEFAULT_OVERPASS_URL`] with the given timeout.
    ///
    /// # Errors
    ///
    /// See [`HttpOverpassPoiSource::new`].
    pub fn public(timeout: Duration) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpConfig::new(DEFAULT_OVERPASS_URL).with_timeout(timeout))
    }

    fn build_request_url(&self, query: &PoiQuery) -> Result<Url, PoiSourceError> {
        let base = self.http.config.trimmed_base_url();
        Url::parse_with_params(base, &[("data", build_query(query))]).map_err(|err| {
            PoiSourceError::NetworkError {
                url: base.to_owned(),
                message: err.to_string(),
            }
        })
    }

    async fn fetch_async(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        let url = self.build_request_url(query)?;
        let display_url = self.http.config.trimmed_base_url().to_owned();
        debug!("querying {display_url} for {} around {}", query.amenity, query.center);

        let response = self
            .http
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &display_url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &display_url))?;
        decode_overpass_response(&display_url, status, &body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> PoiSourceError {
        match self.http.classify(error) {
            TransportFailure::Timeout { timeout_secs } => PoiSourceError::Timeout {
                url: url.to_owned(),
                timeout_secs,
            },
            TransportFailure::Status { status, message } => PoiSourceError::HttpError {
                url: url.to_owned(),
                status,
                message,
            },
            TransportFailure::Network { message } => PoiSourceError::NetworkError {
                url: url.to_owned(),
                message,
            },
        }
    }
}

/// Turn an Overpass interpreter reply into raw features.
///
/// Non-2xx statuses become [`PoiSourceError::HttpError`] carrying the body.
/// A `remark` mentioning an error becomes [`PoiSourceError::ServiceError`],
/// since Overpass reports query timeouts and memory exhaustion that way with
/// a 200 status.
///
/// # Errors
///
/// Returns [`PoiSourceError::ParseError`] when a successful body is not an
/// Overpass JSON document.
pub fn decode_overpass_response(
    url: &str,
    status: u16,
    body: &str,
) -> Result<Vec<RawFeature>, PoiSourceError> {
    if !(200..300).contains(&status) {
        return Err(PoiSourceError::HttpError {
            url: url.to_owned(),
            status,
            message: body.to_owned(),
        });
    }
    let decoded: OverpassResponseDto =
        serde_json::from_str(body).map_err(|err| PoiSourceError::ParseError {
            message: err.to_string(),
        })?;
    if let Some(remark) = decoded.runtime_error() {
        warn!("Overpass reported a runtime error: {remark}");
        return Err(PoiSourceError::ServiceError {
            message: remark.to_owned(),
        });
    }
    Ok(decoded.into_raw_features())
}

impl PoiSource for HttpOverpassPoiSource {
    fn fetch_features(&self, query: &PoiQuery) -> Result<Vec<RawFeature>, PoiSourceError> {
        self.http.block_on(self.fetch_async(query))
    }
}
