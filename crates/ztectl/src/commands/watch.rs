//! `ztectl watch`: poll until Ctrl-C.

use std::time::Duration;

use tracing::debug;

use ztectl_core::Poller;

use crate::cli::GlobalOpts;
use crate::config::Target;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    target: &Target,
    interval: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = interval.map_or(target.router.poll_interval, Duration::from_secs);

    let handle = Poller::spawn(target.router.build_client()?, interval)?;
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                debug!("interrupted, stopping poller");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = rx.borrow_and_update().clone();
                if let Some(update) = update {
                    let out = output::render_update(global.output, &update)?;
                    output::print_output(&out, global.quiet);
                }
            }
        }
    }

    handle.shutdown().await?;
    Ok(())
}
