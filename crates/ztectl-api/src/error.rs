use thiserror::Error;

use crate::client::ACCESS_DENIED_CODE;

/// Top-level error type for the `ztectl-api` crate.
///
/// These never escape the public [`SessionClient`](crate::SessionClient)
/// operations: every variant is logged at the call boundary and collapsed
/// into "no data". They exist so the internal request path can use `?`
/// and so logs carry a precise cause.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The router answered with a non-2xx status.
    #[error("HTTP {status} from router")]
    HttpStatus { status: reqwest::StatusCode },

    /// URL parsing error (usually a malformed host).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A default header could not be built from the configured host.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The pooled HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The response did not have the shape the ubus protocol requires.
    #[error("Protocol violation: {message}")]
    Protocol { message: String },

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Application ─────────────────────────────────────────────────
    /// An RPC item carried an `error` member.
    #[error(
        "RPC error {}: {}",
        .code.map_or_else(|| "?".into(), |c| c.to_string()),
        .message.as_deref().unwrap_or("no message")
    )]
    Rpc {
        code: Option<i64>,
        message: Option<String>,
    },
}

impl Error {
    /// Returns `true` for the `-32002` "access denied" RPC error, the
    /// signal that the session token may have been invalidated.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Rpc { code: Some(code), .. } if *code == ACCESS_DENIED_CODE)
    }
}
