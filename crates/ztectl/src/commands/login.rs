//! `ztectl login`: run only the handshake.

use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::config::Target;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct LoginReport {
    host: String,
    /// Redacted session token.
    session: String,
}

pub async fn handle(target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let mut client = target.router.build_client()?;
    if !client.has_credential() {
        return Err(CliError::NoCredentials {
            profile: target.profile.clone(),
        });
    }

    let ok = client.authenticate().await;
    let report = LoginReport {
        host: client.host().to_owned(),
        session: client.token().redacted(),
    };
    client.close();

    if !ok {
        return Err(CliError::AuthFailed {
            host: report.host,
            profile: target.profile.clone(),
        });
    }

    let out = output::render_single(global.output, &report, |r| {
        format!("✓ Logged in to {} (session {})", r.host, r.session)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
