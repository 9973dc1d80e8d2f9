use thiserror::Error;

/// Errors from [`crate::poi_source::PoiSource::fetch_features`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoiSourceError {
    /// The request could not reach the POI service.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport failure description.
        message: String,
    },
    /// The POI service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The POI service answered with a non-success HTTP status.
    #[error("POI service returned HTTP {status} for {url}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response or client message.
        message: String,
    },
    /// The POI service reported an application-level failure.
    #[error("POI service error: {message}")]
    ServiceError {
        /// Service message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse POI response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },
    /// A file-backed source could not be read.
    #[error("failed to read POI data from {path}: {message}")]
    Io {
        /// Data file location.
        path: String,
        /// I/O failure description.
        message: String,
    },
}
