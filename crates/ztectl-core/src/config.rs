// ── Runtime connection configuration ──
//
// Describes *how* to reach one router. Carries the credential but never
// touches disk: the CLI (via ztectl-config) builds a `RouterConfig` and
// hands it in.

use std::time::Duration;

use secrecy::SecretString;

use ztectl_api::{REQUEST_TIMEOUT, SessionClient, TransportConfig};

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "192.168.0.1";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for talking to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Host or `host:port` of the router's web UI.
    pub host: String,
    /// Admin password. `None` restricts refreshes to anonymous data.
    pub password: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between refresh cycles when polling.
    pub poll_interval: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            password: None,
            timeout: REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RouterConfig {
    /// Build a session client for this router. No traffic is sent yet.
    pub fn build_client(&self) -> Result<SessionClient, CoreError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        Ok(SessionClient::new(self.host.clone(), self.password.clone())?.with_transport(transport))
    }
}
