use std::fmt;

/// Session id the router itself uses for anonymous calls.
pub const UNAUTHENTICATED_SESSION: &str = "00000000000000000000000000000000";

const REDACTED_PREFIX_LEN: usize = 8;

/// The ubus session token sent as the first RPC parameter.
///
/// Replaced wholesale on login and reset wholesale to the anonymous
/// sentinel when the router stops honouring it. `Debug` only shows a
/// short prefix so tokens do not end up in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The anonymous sentinel token.
    pub fn unauthenticated() -> Self {
        Self(UNAUTHENTICATED_SESSION.to_owned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.0 != UNAUTHENTICATED_SESSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the token, safe for logging.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(REDACTED_PREFIX_LEN).collect();
        format!("{prefix}...")
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}
