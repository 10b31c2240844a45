//! Command-line interface components
//!
//! This module contains CLI-specific code for the News Feed Sync application,
//! including argument parsing, progress display, and user interaction.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    CacheAction, CacheArgs, CategoriesAction, CategoriesArgs, Cli, Commands, GlobalArgs, SyncArgs,
};
pub use commands::{handle_cache, handle_categories, handle_status, handle_sync};
pub use progress::{ProgressConfig, ProgressDisplay};
