//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Reconcile catalog product parameters from a workbook
#[derive(Parser, Debug)]
#[command(name = "paramsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog API endpoint, e.g. https://api.example.com/public/v1
    #[arg(long, global = true, env = "PARAMSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Catalog API key (sent as the Authorization header)
    #[arg(long, global = true, env = "PARAMSYNC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output as JSON (for agent integration)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress per-row progress narration
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize parameter sheets against the catalog
    Sync {
        /// Workbook directory holding the parameter sheets
        workbook: PathBuf,

        /// Sheet to synchronize (default: every known parameter sheet present)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
