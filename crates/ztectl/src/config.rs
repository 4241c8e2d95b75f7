//! Layer CLI flag overrides on top of the resolved profile.

use secrecy::SecretString;

use ztectl_config::{self as config, Profile};
use ztectl_core::RouterConfig;
use ztectl_core::config::DEFAULT_HOST;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A router to talk to, plus the profile it came from.
pub struct Target {
    pub profile: String,
    pub router: RouterConfig,
}

/// Resolve the target router from the config file, profile, and flags.
///
/// Without a config file the stock router address is used, so a bare
/// `ztectl status` works on a fresh machine. An explicit `--profile` that
/// doesn't exist is an error unless `--host` is also given.
pub fn resolve_target(global: &GlobalOpts) -> Result<Target, CliError> {
    let cfg = config::load_config()?;
    let name = config::active_profile_name(&cfg, global.profile.as_deref());

    let mut profile = match config::find_profile(&cfg, &name) {
        Ok(profile) => profile.clone(),
        Err(err) if global.profile.is_some() && global.host.is_none() => return Err(err.into()),
        Err(_) => Profile::new(DEFAULT_HOST),
    };
    apply_overrides(&mut profile, global);

    let mut router = config::profile_to_router_config(&profile, &name, &cfg.defaults)?;
    if let Some(password) = global.password.as_deref().filter(|pw| !pw.is_empty()) {
        router.password = Some(SecretString::from(password.to_owned()));
    }

    Ok(Target {
        profile: name,
        router,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(host) = &global.host {
        profile.host.clone_from(host);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
