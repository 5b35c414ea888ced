//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cairn - Versioned Artifact Fetcher
///
/// Downloads application and platform artifacts by URL into a local cache,
/// following publisher redirect manifests and pulling prerequisite
/// components along with platform artifacts.
#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CAIRN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch an artifact into the cache
    Fetch(FetchArgs),

    /// Inspect the artifact cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Artifact URL
    pub url: String,

    /// Also fetch the associated platform artifact
    #[arg(short, long)]
    pub platform: bool,

    /// Discard cached entries and download again
    #[arg(short, long)]
    pub force: bool,

    /// Discard cached redirect entries so pointer updates are picked up
    #[arg(long)]
    pub force_redirection: bool,

    /// Cache directory (overrides configuration)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Per-download timeout in seconds (overrides configuration)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached artifact entries
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Cache directory (overrides configuration)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Show the cache location an artifact URL maps to
    Path {
        /// Artifact URL
        url: String,

        /// Cache directory (overrides configuration)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.base_path)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Output format for fetch and cache list
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, styled output
    Text,
    /// JSON output
    Json,
    /// Bare values (one per line), for scripting
    Plain,
}
