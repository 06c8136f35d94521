//! # HTTP Transport
//!
//! The seam between request building and response parsing. [`TideTable`]
//! only needs "give me the body text and the URL you ended up at", so that
//! contract is a trait; the blocking reqwest client behind it is the one
//! piece of the crate that touches the network.
//!
//! Transport failures (DNS, TLS, timeouts, non-success status) are never
//! masked — they surface to the caller as [`TideError::Http`].
//!
//! [`TideTable`]: crate::TideTable

use crate::error::TideError;
use crate::request::{TideRequest, BASE_URL};
use reqwest::header::REFERER;
use std::time::Duration;

/// Default request timeout, matching the service's worst observed latency
/// for a full annual table with margin.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What came back from one request: the resolved final URL (after any
/// redirects) and the full body text, both kept for diagnostics.
#[derive(Clone, Debug)]
pub struct FetchedResponse {
    pub url: String,
    pub body: String,
}

/// Collaborator that turns a built request into a response body.
///
/// Implemented by [`HttpTransport`] for production and by in-memory stubs in
/// tests, which keeps the parser and facade testable offline.
pub trait Transport {
    fn fetch(&self, request: &TideRequest) -> Result<FetchedResponse, TideError>;
}

/// Blocking HTTP transport against the NOAA facade endpoint.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    /// Transport with the production endpoint and default timeout.
    pub fn new() -> Result<HttpTransport, TideError> {
        Self::with_base_url(BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Transport against an alternate endpoint (configuration override or a
    /// local test server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<HttpTransport, TideError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.into(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, request: &TideRequest) -> Result<FetchedResponse, TideError> {
        tracing::debug!(
            station = request.station_id(),
            year = request.effective_year(),
            datum = request.effective_datum().as_str(),
            "fetching tide predictions"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_params())
            .header(REFERER, request.referer())
            .send()?
            .error_for_status()?;

        let url = response.url().to_string();
        let body = response.text()?;

        tracing::debug!(url = %url, bytes = body.len(), "response received");
        Ok(FetchedResponse { url, body })
    }
}
