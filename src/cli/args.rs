//! Command-line argument parsing for News Feed Sync
//!
//! This module defines the CLI structure using clap derive macros,
//! providing sync, category selection, cache management and status commands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// News Feed Sync - keep an offline copy of a categorized news feed
#[derive(Parser, Debug)]
#[command(
    name = "newsfeed_sync",
    version,
    about = "Sync a categorized news feed into a local offline cache",
    long_about = "Fetches the category index, the articles of every followed category and their images,
and stores them on disk so they can be read without a network connection.
The cache is wiped automatically when the feed moves on to a new day."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache directory path
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the index and download followed categories
    Sync(SyncArgs),

    /// List or choose followed categories
    Categories(CategoriesArgs),

    /// Cache management
    Cache(CacheArgs),

    /// Show last sync time, freshness and followed categories
    Status,
}

/// Arguments for the sync command
#[derive(Args, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Do not ask for confirmation before syncing
    #[arg(short, long)]
    pub yes: bool,

    /// Skip image downloads
    #[arg(long)]
    pub no_images: bool,
}

/// Arguments for category management
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Category management actions
#[derive(Subcommand, Debug)]
pub enum CategoriesAction {
    /// List categories from the cached index
    List,

    /// Follow the given category files, replacing the current selection
    Follow {
        /// Category files, as listed by `categories list`
        #[arg(value_name = "FILE", required_unless_present = "all", conflicts_with = "all")]
        files: Vec<String>,

        /// Follow every category
        #[arg(long)]
        all: bool,
    },
}

/// Arguments for cache management
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache management actions
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache statistics and information
    Info,

    /// Remove cached index, articles and images (followed categories are kept)
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.global.log_level()
    }
}

impl GlobalArgs {
    /// Logging level selected by the verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.very_verbose {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Log level directive: a verbosity flag wins over the configured level
    pub fn log_directive(&self, configured: &str) -> String {
        if self.quiet || self.verbose || self.very_verbose {
            self.log_level().to_string().to_lowercase()
        } else {
            configured.to_string()
        }
    }
}
