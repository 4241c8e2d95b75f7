//! `ztectl probe`: the connection test run before saving a router.
//!
//! A refresh that yields nothing at all means the router can't be reached
//! (or isn't a ZTE ubus endpoint). Partial data is fine: without a password
//! only the anonymous status section is expected.

use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};

use ztectl_core::{Section, Snapshot};

use crate::cli::GlobalOpts;
use crate::config::Target;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ProbeReport {
    host: String,
    profile: String,
    authenticated: bool,
    present: Vec<&'static str>,
    missing: Vec<&'static str>,
}

impl ProbeReport {
    fn new(target: &Target, authenticated: bool, snapshot: &Snapshot) -> Self {
        let (present, missing): (Vec<Section>, Vec<Section>) =
            Section::iter().partition(|s| !snapshot.section(*s).is_empty());
        Self {
            host: target.router.host.clone(),
            profile: target.profile.clone(),
            authenticated,
            present: present.into_iter().map(Section::as_str).collect(),
            missing: missing.into_iter().map(Section::as_str).collect(),
        }
    }

    fn detail(&self) -> String {
        let login = if self.authenticated {
            "authenticated"
        } else {
            "anonymous"
        };
        let mut out = format!(
            "Router at {} is reachable ({login})\n  Sections: {}/{}",
            self.host,
            self.present.len(),
            Section::COUNT
        );
        if !self.missing.is_empty() {
            out.push_str("\n  Missing:  ");
            out.push_str(&self.missing.join(", "));
        }
        out
    }
}

pub async fn handle(target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let mut client = target.router.build_client()?;
    let snapshot = client.refresh().await;
    let authenticated = client.is_authenticated();
    client.close();

    if !snapshot.has_data() {
        return Err(CliError::ConnectionFailed {
            host: target.router.host.clone(),
        });
    }

    let report = ProbeReport::new(target, authenticated, &snapshot);
    let out = output::render_single(global.output, &report, ProbeReport::detail)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
