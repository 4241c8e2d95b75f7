// Transport configuration for building the pooled reqwest::Client.
//
// The router's web server enforces a CSRF-style Origin/Referer check and
// expects `text/plain` bodies, so those go in as default headers on the
// client rather than on every request.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER};

use crate::error::Error;

/// Fixed per-request timeout used by the router's own web UI.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BODY_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    /// Skip certificate verification. The router speaks plain HTTP, so
    /// this only matters behind a TLS-terminating proxy.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
            accept_invalid_certs: true,
            user_agent: concat!("ztectl/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` carrying the headers the router requires.
    pub fn build_client(&self, host: &str) -> Result<reqwest::Client, Error> {
        let headers = device_headers(host)?;

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

/// Default headers for every request sent to `host`.
fn device_headers(host: &str) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(BODY_CONTENT_TYPE));
    headers.insert(ORIGIN, HeaderValue::from_str(&format!("http://{host}"))?);
    headers.insert(REFERER, HeaderValue::from_str(&format!("http://{host}/"))?);
    Ok(headers)
}
