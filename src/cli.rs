//! CLI argument parsing via clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Build base16 colorschemes for many applications from shared palettes.
#[derive(Debug, Parser)]
#[command(name = "base16-forge", disable_version_flag = true)]
pub struct Args {
    /// Path to config file (default: ~/.config/base16-forge/config.toml).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Cache directory holding fetched sources; must already exist.
    #[arg(short = 'c', long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all sources needed for building.
    Update {
        /// Maximum concurrent fetches.
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,
    },
    /// Generate colorscheme files.
    Build {
        /// Only build these scheme slugs.
        #[arg(short = 's', long = "schemes", num_args = 1..)]
        schemes: Vec<String>,
        /// Only build these templates.
        #[arg(short = 't', long = "templates", num_args = 1..)]
        templates: Vec<String>,
        /// Output directory.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Maximum concurrent pairings.
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,
    },
    /// Display available schemes and templates.
    List {
        /// Only show schemes.
        #[arg(short = 's', long = "schemes")]
        schemes: bool,
        /// Only show templates.
        #[arg(short = 't', long = "templates")]
        templates: bool,
        /// List items in a single column.
        #[arg(short = 'r', long = "raw")]
        raw: bool,
    },
    /// Display version.
    Version,
}
