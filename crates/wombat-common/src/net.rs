//! HTTP fetch for loading documents from a URL.
//!
//! The loader only ever needs "GET this URL as text", so that is the whole
//! of [`HttpClient`]. [`BlockingClient`] backs it with reqwest; tests swap in
//! an in-memory implementation.

use std::time::Duration;

use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("wombat/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Failure while fetching a remote document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    /// The request could not be sent or timed out.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
    },
    /// The body could not be read or decoded as text.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Something that can GET a URL and return the body as text.
pub trait HttpClient {
    /// Fetch `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the request fails or the status is not 2xx.
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed blocking client.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    timeout: Duration,
}

impl Default for BlockingClient {
    fn default() -> Self {
        Self { timeout: TIMEOUT }
    }
}

impl BlockingClient {
    /// Create a client with the default 30 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl HttpClient for BlockingClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        tracing::debug!(url, "fetching document");
        let response = client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}
