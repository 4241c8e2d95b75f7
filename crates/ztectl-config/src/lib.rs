//! Shared configuration for ztectl.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `ztectl_core::RouterConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use ztectl_core::RouterConfig;
use ztectl_core::config::DEFAULT_HOST;

/// Environment variable consulted first for the router password.
pub const PASSWORD_ENV: &str = "ZTECTL_PASSWORD";

const ENV_PREFIX: &str = "ZTECTL_";
const KEYRING_SERVICE: &str = "ztectl";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named router profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between refreshes in `watch` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    30
}

/// A named router profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Router address, `host` or `host:port` (e.g. "192.168.0.1").
    #[serde(default = "default_host")]
    pub host: String,

    /// Admin password (plaintext; prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Override timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override poll interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
}

impl Profile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: None,
            timeout: None,
            poll_interval: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ztectl", "ztectl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ztectl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Host validation ─────────────────────────────────────────────────

/// Normalize a user-supplied router address to `host[:port]`.
///
/// Accepts a bare host, `host:port`, or an `http://` URL with an optional
/// trailing slash. Anything with a path, query, or credentials is
/// rejected.
pub fn normalize_host(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::Validation {
        field: "host".into(),
        reason: format!("{reason}: {raw:?}"),
    };

    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix("http://")
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    if bare.is_empty() {
        return Err(invalid("empty host"));
    }
    if bare.contains("://") {
        return Err(invalid("only plain http is supported"));
    }

    let url = Url::parse(&format!("http://{bare}/")).map_err(|_| invalid("not a valid host"))?;
    if url.path() != "/" || url.query().is_some() || !url.username().is_empty() {
        return Err(invalid("expected host or host:port"));
    }

    Ok(bare.to_owned())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name).ok()?.get_password().ok()
}

/// First non-empty password from env var, keyring, then plaintext.
fn choose_password(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env.filter(|pw| !pw.is_empty())
        .or_else(|| keyring().filter(|pw| !pw.is_empty()))
        .or_else(|| plaintext.filter(|pw| !pw.is_empty()).map(String::from))
        .map(SecretString::from)
}

/// Resolve the router password for a profile.
///
/// `None` is not an error: the router serves part of its data
/// anonymously.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    choose_password(
        std::env::var(PASSWORD_ENV).ok(),
        || keyring_password(profile_name),
        profile.password.as_deref(),
    )
}

// ── Profile → RouterConfig ──────────────────────────────────────────

/// Name of the profile to use: explicit override, then the configured
/// default, then `"default"`.
pub fn active_profile_name(cfg: &Config, requested: Option<&str>) -> String {
    requested
        .map(String::from)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up a profile by name.
pub fn find_profile<'a>(cfg: &'a Config, name: &str) -> Result<&'a Profile, ConfigError> {
    cfg.profiles
        .get(name)
        .ok_or_else(|| ConfigError::ProfileNotFound {
            name: name.into(),
            available: {
                let mut names: Vec<String> = cfg.profiles.keys().cloned().collect();
                names.sort();
                names
            },
        })
}

/// Build a `RouterConfig` from a profile, falling back to `defaults` for
/// unset timings.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<RouterConfig, ConfigError> {
    let host = normalize_host(&profile.host)?;
    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    let poll_interval = profile.poll_interval.unwrap_or(defaults.poll_interval);

    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    if poll_interval == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(RouterConfig {
        host,
        password: resolve_password(profile, profile_name),
        timeout: Duration::from_secs(timeout),
        poll_interval: Duration::from_secs(poll_interval),
    })
}
