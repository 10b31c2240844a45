//! News Feed Sync CLI application
//!
//! Command-line interface for keeping an offline copy of a categorized news
//! feed: sync, category selection, cache management and status.

use std::process;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use newsfeed_sync::cli::{
    Cli, Commands, handle_cache, handle_categories, handle_status, handle_sync,
};
use newsfeed_sync::config::AppConfig;
use newsfeed_sync::constants::logging::DEFAULT_LOG_LEVEL;
use newsfeed_sync::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    // Commands report a broken config file themselves
    let configured_level = AppConfig::load(cli.global.config.clone())
        .await
        .map(|config| config.logging.level)
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    init_logging(&cli, &configured_level);

    info!("News Feed Sync v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sync(args) => {
            info!("Executing sync command");
            handle_sync(&cli.global, args).await
        }
        Commands::Categories(args) => {
            info!("Executing categories command");
            handle_categories(&cli.global, args).await
        }
        Commands::Cache(args) => {
            info!("Executing cache command");
            handle_cache(&cli.global, args).await
        }
        Commands::Status => handle_status(&cli.global).await,
    }
}

/// Initialize logging from the CLI verbosity flags or the configured level
fn init_logging(cli: &Cli, configured_level: &str) {
    let log_level = cli.global.log_directive(configured_level);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("newsfeed_sync={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
