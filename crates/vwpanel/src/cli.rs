//! Clap derive structures for the `vwpanel` CLI.
//!
//! Only depends on clap, so `build.rs` can include it to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vwpanel -- settings panel for the Vaultwarden router plugin
#[derive(Debug, Parser)]
#[command(
    name = "vwpanel",
    version,
    about = "Edit a router-hosted Vaultwarden .env file and manage its TLS files",
    long_about = "Talks to the Vaultwarden plugin API on your router.\n\n\
        Reads and rewrites the plugin's .env file as a whole, and uploads or\n\
        deletes the certificate and private key the server serves TLS with.",
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
    #[arg(long, short = 'p', env = "VWPANEL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router base URL (overrides profile)
    #[arg(long, short = 'a', env = "VWPANEL_API", global = true)]
    pub api: Option<String>,

    /// API token (overrides profile)
    #[arg(long, env = "VWPANEL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Plugin route prefix
    #[arg(long, env = "VWPANEL_PLUGIN_PATH", global = true)]
    pub plugin_path: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VWPANEL_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VWPANEL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "VWPANEL_TIMEOUT", global = true)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and edit the Vaultwarden .env file
    #[command(alias = "e")]
    Env(EnvArgs),

    /// Manage the TLS certificate and private key
    Ssl(SslArgs),

    /// Summarize the env file and TLS state
    Status,

    /// Check that the plugin is reachable
    Ping,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ENV
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// List variables, grouped by section
    #[command(alias = "ls")]
    List {
        /// Include free-standing comment lines
        #[arg(long, short = 'c')]
        comments: bool,

        /// Only show the section with this title
        #[arg(long, short = 's')]
        section: Option<String>,
    },

    /// Show one variable
    Show {
        /// Variable name
        key: String,
    },

    /// Set a variable's value and save
    Set {
        /// Variable name
        key: String,

        /// New value
        value: String,

        /// Also enable the variable
        #[arg(long, short = 'e')]
        enable: bool,
    },

    /// Flip a variable between enabled and commented out, then save
    Toggle {
        /// Variable name
        key: String,
    },

    /// Enable a variable and save
    Enable {
        /// Variable name
        key: String,
    },

    /// Comment out a variable and save
    Disable {
        /// Variable name
        key: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SSL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SslArgs {
    #[command(subcommand)]
    pub command: SslCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SlotArg {
    /// TLS certificate
    Cert,
    /// Private key
    Key,
}

#[derive(Debug, Subcommand)]
pub enum SslCommand {
    /// Show which TLS files are present
    Status,

    /// Upload a certificate or key (.pem .crt .cer .der .key .p12 .pfx)
    Upload {
        /// Which slot to fill
        slot: SlotArg,

        /// File to upload
        file: PathBuf,
    },

    /// Delete a certificate or key
    #[command(alias = "rm")]
    Delete {
        /// Which slot to clear
        slot: SlotArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Profile key (e.g., "api_url", "plugin_path", "timeout")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the API token (or basic-auth password) in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
