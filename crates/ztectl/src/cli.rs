//! Clap derive structures for the `ztectl` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ztectl -- query ZTE routers over their ubus JSON-RPC web API
#[derive(Debug, Parser)]
#[command(
    name = "ztectl",
    version,
    about = "Query ZTE routers from the command line",
    long_about = "Talks to the ubus JSON-RPC endpoint behind the router's web UI.\n\n\
        Without a password only the anonymous router status is available;\n\
        with one, ztectl logs in and fetches network, usage, device and WLAN data.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router profile to use
    #[arg(long, short = 'p', env = "ZTECTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router address, host or host:port (overrides profile)
    #[arg(long, short = 'H', env = "ZTECTL_HOST", global = true)]
    pub host: Option<String>,

    /// Router admin password
    #[arg(
        long,
        env = "ZTECTL_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZTECTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZTECTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one snapshot of every data section
    #[command(alias = "st")]
    Status,

    /// Check that the router answers with usable data
    Probe,

    /// Run only the login handshake
    Login,

    /// Poll the router and print every update until Ctrl-C
    Watch(WatchArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (overrides profile)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a profile for the router given by --host
    Init,

    /// Display current configuration (passwords redacted)
    Show,

    /// Store the profile's router password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
