//! Shared plumbing for the blocking HTTP adapters.
//!
//! The collaborator traits in `waymeal-core` are synchronous. Each HTTP
//! adapter owns a [`BlockingClient`]: an async `reqwest` client plus a
//! current-thread Tokio runtime used to drive it.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "waymeal/0.1";

/// Error type for HTTP adapter construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        /// URL supplied by the caller.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings shared by the HTTP adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpConfig {
    /// Settings for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The base URL without trailing slashes.
    #[must_use]
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// How a failed `reqwest` call should be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Timeout { timeout_secs: u64 },
    Status { status: u16, message: String },
    Network { message: String },
}

/// An async HTTP client driven to completion on demand.
///
/// When called from outside any Tokio runtime the client uses its own
/// current-thread runtime. Inside a multi-threaded runtime it borrows the
/// caller's handle through [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime it falls back to its own runtime, which may
/// deadlock if the caller's runtime drives IO this request depends on.
pub(crate) struct BlockingClient {
    pub(crate) client: Client,
    pub(crate) config: HttpConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn new(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        url::Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    pub(crate) fn classify(&self, error: &reqwest::Error) -> TransportFailure {
        if error.is_timeout() {
            return TransportFailure::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return TransportFailure::Status {
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        TransportFailure::Network {
            message: error.to_string(),
        }
    }
}
