// Login handshake
//
// The router hands out a per-login salt via `web_login_info`, expects
// `SHA256(SHA256(password) + salt)` (both hex, uppercased) via
// `web_login`, and answers with a result code plus a fresh ubus session.

use secrecy::ExposeSecret;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::client::SessionClient;
use crate::endpoints::{self, SALT_FIELD};
use crate::session::SessionToken;

/// Compute the salted login digest the router expects as `password`.
pub fn login_digest(password: &str, salt: &str) -> String {
    let first = hex::encode_upper(Sha256::digest(password.as_bytes()));
    hex::encode_upper(Sha256::digest(format!("{first}{salt}").as_bytes()))
}

/// Interpretation of a `web_login` reply.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoginOutcome {
    /// `result == 0`. The session is absent on some firmware.
    Success { session: Option<String> },
    /// `result == 1`: wrong password.
    Rejected {
        failures: Option<Value>,
        message: Option<String>,
    },
    /// `result == 2`: too many attempts.
    Locked { remaining_secs: Option<Value> },
    /// Any other code.
    Unknown {
        code: Option<Value>,
        message: Option<String>,
    },
}

/// Whether `value` is the result code `code`, written either as a JSON
/// integer or as its decimal string (firmware uses both).
fn is_result_code(value: &Value, code: u8) -> bool {
    match value {
        Value::Number(n) => n.as_u64() == Some(u64::from(code)),
        Value::String(s) => *s == code.to_string(),
        _ => false,
    }
}

pub(crate) fn classify_login(reply: &Value) -> LoginOutcome {
    let message = reply.get("msg").and_then(Value::as_str).map(String::from);

    match reply.get("result") {
        Some(code) if is_result_code(code, 0) => LoginOutcome::Success {
            session: reply
                .get("ubus_rpc_session")
                .and_then(Value::as_str)
                .map(String::from),
        },
        Some(code) if is_result_code(code, 1) => LoginOutcome::Rejected {
            failures: reply.get("login_fail_num").cloned(),
            message,
        },
        Some(code) if is_result_code(code, 2) => LoginOutcome::Locked {
            remaining_secs: reply.get("login_fail_lock_lefttime").cloned(),
        },
        code => LoginOutcome::Unknown {
            code: code.cloned(),
            message,
        },
    }
}

fn or_unknown(value: Option<&Value>) -> String {
    value.map_or_else(|| "unknown".into(), ToString::to_string)
}

impl SessionClient {
    /// Log in with the configured password.
    ///
    /// Returns `true` and adopts the router's session token on success.
    /// Every failure (no password, no salt, wrong password, lockout,
    /// unreachable router) is logged and returns `false` with the token
    /// left untouched.
    pub async fn authenticate(&mut self) -> bool {
        let Some(password) = self.password().cloned() else {
            error!("password is required for authentication");
            return false;
        };

        let Some(info) = self.call_one(&endpoints::login_info()).await else {
            error!("could not get login info");
            return false;
        };
        let Some(salt) = info.get(SALT_FIELD).and_then(Value::as_str) else {
            error!("login info carries no salt");
            return false;
        };

        let digest = login_digest(password.expose_secret(), salt);
        debug!("submitting login digest");

        let Some(reply) = self.call_one(&endpoints::login(&digest)).await else {
            warn!("authentication failed: no response from router");
            return false;
        };

        match classify_login(&reply) {
            LoginOutcome::Success { session } => {
                if let Some(session) = session {
                    self.set_token(SessionToken::new(session));
                } else {
                    warn!("login succeeded without a session id; keeping current token");
                }
                info!(session = ?self.token(), "authenticated to router");
                true
            }
            LoginOutcome::Rejected { failures, message } => {
                error!(
                    attempt = %or_unknown(failures.as_ref()),
                    message = message.as_deref().unwrap_or("unknown error"),
                    "authentication failed: incorrect password"
                );
                false
            }
            LoginOutcome::Locked { remaining_secs } => {
                warn!(
                    wait_secs = %or_unknown(remaining_secs.as_ref()),
                    "router login is locked after too many attempts"
                );
                false
            }
            LoginOutcome::Unknown { code, message } => {
                warn!(
                    result = %or_unknown(code.as_ref()),
                    message = message.as_deref().unwrap_or("unknown error"),
                    "authentication failed"
                );
                false
            }
        }
    }
}
