//! Config subcommand handlers.

use secrecy::SecretString;

use ztectl_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init => {
            let raw_host = global.host.as_deref().ok_or_else(|| CliError::Validation {
                field: "host".into(),
                reason: "config init needs the router address: --host <HOST>".into(),
            })?;
            let host = config::normalize_host(raw_host)?;

            let mut cfg = config::load_config()?;
            let name = global.profile.clone().unwrap_or_else(|| "default".into());
            upsert_profile(&mut cfg, &name, host);

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' written to {}", path.display());
                eprintln!("  Store the admin password with: ztectl config set-password --profile {name}");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(config::load_config()?);
            let out = output::render_single(global.output, &cfg, |c| {
                format!(
                    "# {}\n{}",
                    config::config_path().display(),
                    toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}"))
                )
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load_config()?;
            let name = config::active_profile_name(&cfg, global.profile.as_deref());
            config::find_profile(&cfg, &name)?;

            let secret = rpassword::prompt_password(format!("Router password for '{name}': "))
                .map_err(CliError::Prompt)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_password(&name, &SecretString::from(secret))?;
            if !global.quiet {
                eprintln!("✓ Password stored in system keyring for profile '{name}'");
            }
            Ok(())
        }
    }
}

/// Insert or re-point a profile. The first profile becomes the default.
fn upsert_profile(cfg: &mut Config, name: &str, host: String) {
    let first = cfg.profiles.is_empty();
    match cfg.profiles.get_mut(name) {
        Some(profile) => profile.host = host,
        None => {
            cfg.profiles.insert(name.to_owned(), Profile::new(host));
        }
    }
    if first || cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.to_owned());
    }
}

fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}
