//! `ztectl status`: one refresh, printed.

use crate::cli::GlobalOpts;
use crate::config::Target;
use crate::error::CliError;
use crate::output;

pub async fn handle(target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let mut client = target.router.build_client()?;
    let snapshot = client.refresh().await;
    client.close();

    let out = output::render_snapshot(global.output, &snapshot)?;
    output::print_output(&out, global.quiet);

    if snapshot.has_data() {
        Ok(())
    } else {
        Err(CliError::ConnectionFailed {
            host: client.host().to_owned(),
        })
    }
}
