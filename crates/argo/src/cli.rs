//! Clap derive structures for the `argo` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// argo -- remote control for BLOBbox media appliances
#[derive(Debug, Parser)]
#[command(
    name = "argo",
    version,
    about = "Discover and remote-control BLOBbox media appliances",
    long_about = "Find BLOBbox appliances on the local network, log in to their\n\
        JSON-RPC control interface and send keys, media and downloads.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "ARGO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance address, host or host:port (overrides profile)
    #[arg(long, short = 'a', env = "ARGO_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Login user name (overrides profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// RPC timeout in milliseconds (overrides profile and defaults)
    #[arg(long, env = "ARGO_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARGO_OUTPUT",
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
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the local network for appliances
    #[command(alias = "scan")]
    Discover(DiscoverArgs),

    /// Check that an address hosts a supported appliance
    Validate(ValidateArgs),

    /// Log in and report the authorized user
    Login,

    /// Press a remote-control key
    Key(KeyArgs),

    /// Play a media URL (YouTube links open the portal page)
    Play(PlayArgs),

    /// Open a URL in the appliance browser
    Browse(BrowseArgs),

    /// Queue a URL in the download manager
    #[command(alias = "dl")]
    Download(DownloadArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// Fetch each appliance's friendly name from its description document
    #[arg(long, short = 'n')]
    pub names: bool,

    /// Receive window in seconds (overrides config)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Address to check (defaults to --address or the profile's)
    pub address: Option<String>,
}

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Key name, e.g. HOME, OK, UP, VOLUME_UP
    pub key: String,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Media URL
    pub url: String,

    /// Title shown by the player (defaults to the URL)
    #[arg(long, short = 't')]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Page URL
    pub url: String,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// URL to download
    pub url: String,

    /// MIME type (guessed from the URL extension when omitted)
    #[arg(long, short = 'm')]
    pub mime: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
