// ubus session client
//
// Owns the pooled HTTP client, the current session token and the request
// id counter. Endpoint-specific behaviour (login, the refresh batch, the
// single-call getters) lives in sibling modules as further inherent
// methods; this module is the transport and batch machinery they share.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::Error;
use crate::rpc::{Envelope, RpcCall, extract_result};
use crate::session::SessionToken;
use crate::transport::TransportConfig;

/// ubus error code for "Access denied".
pub const ACCESS_DENIED_CODE: i64 = -32002;

/// Access-denied replies within one batch at which the session is
/// considered dead.
///
/// A single denial happens routinely (one endpoint wanting auth the
/// anonymous session lacks); two or more means the router dropped our
/// token. Observed on current firmware; older revisions may differ.
pub const SESSION_EXPIRY_THRESHOLD: usize = 2;

/// Session-authenticated client for the router's `/ubus/` endpoint.
///
/// Not designed for concurrent use: every operation that touches the
/// network takes `&mut self`, so callers serialize `refresh()` and
/// `authenticate()` by construction.
pub struct SessionClient {
    host: String,
    base_url: Url,
    password: Option<SecretString>,
    transport: TransportConfig,
    /// Built on first use and dropped by [`close`](Self::close).
    http: Option<reqwest::Client>,
    token: SessionToken,
    next_id: u64,
}

impl SessionClient {
    /// Create a client for the router at `host` (e.g. `192.168.0.1`).
    ///
    /// Without a password only the anonymous endpoints will return data.
    /// An empty password counts as none. No network traffic happens until
    /// the first call.
    pub fn new(host: impl Into<String>, password: Option<SecretString>) -> Result<Self, Error> {
        let host = host.into();
        let base_url = Url::parse(&format!("http://{host}/ubus/"))?;

        Ok(Self {
            host,
            base_url,
            password: password.filter(|p| !p.expose_secret().is_empty()),
            transport: TransportConfig::default(),
            http: None,
            token: SessionToken::unauthenticated(),
            next_id: 1,
        })
    }

    /// Replace the transport settings. Takes effect on the next
    /// (re)built HTTP client.
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self.http = None;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_authenticated()
    }

    pub fn has_credential(&self) -> bool {
        self.password.is_some()
    }

    pub(crate) fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub(crate) fn set_token(&mut self, token: SessionToken) {
        self.token = token;
    }

    /// Release the pooled HTTP client. Safe to call repeatedly; the next
    /// call rebuilds the pool.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            debug!(host = %self.host, "closed HTTP connection pool");
        }
    }

    // ── Envelope construction ────────────────────────────────────────

    /// Stamp `call` with the next request id and the current token.
    pub fn build_envelope(&mut self, call: &RpcCall) -> Envelope {
        let id = self.next_id;
        self.next_id += 1;
        Envelope::new(id, &self.token, call)
    }

    /// `http://{host}/ubus/?t={epoch-millis}`; the timestamp is a cache
    /// buster the router insists on.
    fn request_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("t", &Utc::now().timestamp_millis().to_string());
        url
    }

    // ── Transport ────────────────────────────────────────────────────

    fn http(&mut self) -> Result<&reqwest::Client, Error> {
        if self.http.is_none() {
            debug!(host = %self.host, "building HTTP connection pool");
            self.http = Some(self.transport.build_client(&self.host)?);
        }
        self.http.as_ref().ok_or_else(|| Error::ClientBuild("client pool unavailable".into()))
    }

    /// POST a batch of envelopes and return the reply array.
    ///
    /// The router labels its JSON as `text/html`, so the body is parsed
    /// regardless of the declared content type.
    async fn post_envelopes(&mut self, envelopes: &[Envelope]) -> Result<Vec<Value>, Error> {
        let url = self.request_url();
        let body = serde_json::to_vec(envelopes)?;
        debug!(calls = envelopes.len(), "POST {}", url);

        let resp = self.http()?.post(url).body(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { status });
        }

        let bytes = resp.bytes().await?;
        trace!(len = bytes.len(), "received ubus reply");

        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Array(items) => Ok(items),
            other => Err(Error::Protocol {
                message: format!("expected a reply array, got {}", json_kind(&other)),
            }),
        }
    }

    // ── Call paths ───────────────────────────────────────────────────

    /// Issue a single RPC. Any failure is logged and yields `None`.
    pub async fn call_one(&mut self, call: &RpcCall) -> Option<Value> {
        let envelope = self.build_envelope(call);

        let outcome = match self.post_envelopes(std::slice::from_ref(&envelope)).await {
            Ok(items) => items.first().map_or_else(
                || {
                    Err(Error::Protocol {
                        message: "empty reply array".into(),
                    })
                },
                extract_result,
            ),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!(call = %call, error = %e, "API call failed");
                None
            }
        }
    }

    /// Issue `calls` as one HTTP round trip.
    ///
    /// Always returns exactly one entry per call, in input order. If two or
    /// more replies are access-denied while we hold an authenticated
    /// token, the token is reset so the next refresh logs in again.
    pub async fn call_batch(&mut self, calls: &[RpcCall]) -> Vec<Option<Value>> {
        let envelopes: Vec<Envelope> = calls.iter().map(|c| self.build_envelope(c)).collect();

        let items = match self.post_envelopes(&envelopes).await {
            Ok(items) => items,
            Err(e) => {
                error!(calls = calls.len(), error = %e, "batch API call failed");
                return vec![None; calls.len()];
            }
        };

        if items.len() != calls.len() {
            warn!(
                expected = calls.len(),
                got = items.len(),
                "batch reply length does not match request"
            );
        }

        let mut access_denied = 0;
        let mut results = Vec::with_capacity(calls.len());

        for (idx, call) in calls.iter().enumerate() {
            let Some(item) = items.get(idx) else {
                results.push(None);
                continue;
            };

            match extract_result(item) {
                Ok(payload) => results.push(Some(payload)),
                Err(e) if e.is_access_denied() => {
                    access_denied += 1;
                    debug!(idx, call = %call, "access denied (session may have expired)");
                    results.push(None);
                }
                Err(e @ Error::Rpc { .. }) => {
                    warn!(idx, call = %call, error = %e, "API call returned error");
                    results.push(None);
                }
                Err(e) => {
                    debug!(idx, call = %call, error = %e, "unusable reply item");
                    results.push(None);
                }
            }
        }

        if access_denied >= SESSION_EXPIRY_THRESHOLD && self.token.is_authenticated() {
            info!(
                denied = access_denied,
                "session expired, will re-authenticate on next cycle"
            );
            self.token = SessionToken::unauthenticated();
        }

        results
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
