//! Command dispatch: bridges CLI args -> router operations -> output formatting.

pub mod config_cmd;
pub mod login;
pub mod probe;
pub mod status;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(target, global).await,
        Command::Probe => probe::handle(target, global).await,
        Command::Login => login::handle(target, global).await,
        Command::Watch(args) => watch::handle(target, args.interval, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
