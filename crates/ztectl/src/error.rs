//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ztectl_config::ConfigError;
use ztectl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("No usable data from router at {host}")]
    #[diagnostic(
        code(ztectl::connection_failed),
        help(
            "Check that the router's web UI is reachable at http://{host}/\n\
             Run with -v for per-request details."
        )
    )]
    ConnectionFailed { host: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login to {host} failed")]
    #[diagnostic(
        code(ztectl::auth_failed),
        help(
            "Verify the admin password. Repeated failures lock the web UI for a while.\n\
             Run: ztectl config set-password --profile {profile}"
        )
    )]
    AuthFailed { host: String, profile: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(ztectl::no_credentials),
        help(
            "Store one with: ztectl config set-password --profile {profile}\n\
             Or set the ZTECTL_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ztectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ztectl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ztectl config init --host <HOST> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(ztectl::config))]
    Config(Box<ConfigError>),

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Background poller failed: {message}")]
    #[diagnostic(code(ztectl::poller))]
    Poller { message: String },

    #[error("Interactive prompt failed: {0}")]
    #[diagnostic(code(ztectl::prompt))]
    Prompt(#[source] std::io::Error),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Lower-layer error mapping ────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidConfig { message } => CliError::Validation {
                field: "router config".into(),
                reason: message,
            },
            CoreError::TaskFailed { message } => CliError::Poller { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}
