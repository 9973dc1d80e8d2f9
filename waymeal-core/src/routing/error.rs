use thiserror::Error;

/// Errors from [`crate::routing::RouteProvider::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The request could not reach the routing service.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport failure description.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("routing service returned HTTP {status} for {url}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response or client message.
        message: String,
    },
    /// The routing service reported an application-level failure.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `"InvalidQuery"`.
        code: String,
        /// Service message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },
    /// The service found no route between the waypoints.
    #[error("no route found between the requested waypoints")]
    NoRoute,
}
