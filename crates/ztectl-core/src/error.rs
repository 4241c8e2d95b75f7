// ── Core error types ──
//
// The session client itself never fails once built, so the only errors
// left at this layer are construction problems and a poller task that
// died instead of shutting down.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid router configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Poller task failed: {message}")]
    TaskFailed { message: String },
}

impl From<ztectl_api::Error> for CoreError {
    fn from(err: ztectl_api::Error) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}
