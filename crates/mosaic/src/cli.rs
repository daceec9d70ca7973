//! Clap derive structures for the `mosaic` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mosaic_core::Priority;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mosaic -- drive Mosaic LED-matrix displays from the command line
#[derive(Debug, Parser)]
#[command(
    name = "mosaic",
    version,
    about = "Control Mosaic LED-matrix displays from the command line",
    long_about = "Push notifications, toggle power and rotation, and watch display\n\
        state on a Mosaic display service.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "MOSAIC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service URL (overrides profile)
    #[arg(long, short = 'u', env = "MOSAIC_URL", global = true)]
    pub url: Option<String>,

    /// Bearer API key
    #[arg(long, env = "MOSAIC_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOSAIC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MOSAIC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MOSAIC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show service status
    Status,

    /// Inspect and configure displays
    #[command(alias = "d")]
    Displays(DisplaysArgs),

    /// Push or clear notifications
    #[command(alias = "n")]
    Notify(NotifyArgs),

    /// Control app rotation
    #[command(alias = "rot")]
    Rotation(RotationArgs),

    /// Save the frame a display is currently showing
    Frame(FrameArgs),

    /// Poll the service and print display state on every refresh
    Watch(WatchArgs),

    /// Probe well-known addresses for a running Mosaic service
    Discover(DiscoverArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Displays ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DisplaysArgs {
    #[command(subcommand)]
    pub command: DisplaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum DisplaysCommand {
    /// List displays
    #[command(alias = "ls")]
    List,

    /// Show one display
    Get {
        /// Display id
        display: String,
    },

    /// Register a new display with the service
    Register {
        /// Display id
        id: String,

        /// Human-readable name (defaults to the id)
        #[arg(long)]
        name: Option<String>,

        /// Panel width in pixels
        #[arg(long, default_value_t = 64)]
        width: u32,

        /// Panel height in pixels
        #[arg(long, default_value_t = 32)]
        height: u32,

        /// Client type reported to the service
        #[arg(long, default_value = "web")]
        client_type: String,
    },

    /// Set brightness (0-100)
    Brightness {
        /// Display id
        display: String,

        /// Brightness level
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },

    /// Turn a display on or off
    Power {
        /// Display id
        display: String,

        /// Desired power state
        state: OnOff,
    },
}

// ── Notify ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotifyCommand {
    /// Push a text notification
    Text {
        /// Message to show
        text: String,

        #[command(flatten)]
        common: NotifyOpts,

        /// Text color
        #[arg(long, default_value = "#FFFFFF")]
        color: String,

        /// Font name
        #[arg(long, default_value = "default")]
        font: String,
    },

    /// Push an image notification
    Image {
        /// Image URL or base64 payload
        image: String,

        #[command(flatten)]
        common: NotifyOpts,
    },

    /// Clear notifications
    Clear {
        /// Display id, or "all"
        #[arg(long, short = 't', default_value = "all")]
        target: String,
    },
}

/// Options shared by text and image notifications.
#[derive(Debug, Args)]
pub struct NotifyOpts {
    /// Display id, or "all"
    #[arg(long, short = 't', default_value = "all")]
    pub target: String,

    /// Seconds on screen
    #[arg(long, short = 'd', default_value_t = 10)]
    pub duration: u32,

    /// Priority: low, normal, high, sticky
    #[arg(long, default_value = "normal")]
    pub priority: Priority,
}

// ── Rotation ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RotationArgs {
    #[command(subcommand)]
    pub command: RotationCommand,
}

#[derive(Debug, Subcommand)]
pub enum RotationCommand {
    /// Show rotation settings
    Get {
        /// Display id
        display: String,
    },

    /// Enable app rotation
    Enable {
        /// Display id
        display: String,
    },

    /// Disable app rotation
    Disable {
        /// Display id
        display: String,
    },

    /// Skip to the next app
    Skip {
        /// Display id
        display: String,
    },

    /// Show one app immediately
    ShowApp {
        /// Display id
        display: String,

        /// App id
        app: String,

        /// Seconds before rotation resumes
        #[arg(long, short = 'd', default_value_t = 30)]
        duration: u32,
    },
}

// ── Frame / Watch / Discover ─────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FrameArgs {
    /// Display id
    pub display: String,

    /// Image format requested from the service
    #[arg(long, short = 'f', default_value = "png")]
    pub format: String,

    /// Output file ("-" for stdout; defaults to <display>.<format>)
    #[arg(long, short = 'O')]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh interval (e.g. "30s", "2m"); overrides profile
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct DiscoverArgs {
    /// URL to probe (repeatable; defaults to the add-on addresses)
    #[arg(long = "candidate", short = 'c')]
    pub candidates: Vec<String>,

    /// Per-candidate probe timeout
    #[arg(long, default_value = "2s", value_parser = humantime::parse_duration)]
    pub probe_timeout: Duration,

    /// Save the discovered URL into the active profile
    #[arg(long)]
    pub save: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with one profile (URL from --url or discovery)
    Init {
        /// Store this API key in the system keyring for the profile
        #[arg(long)]
        keyring_key: Option<String>,

        /// Overwrite an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
