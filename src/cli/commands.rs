//! Command handlers for the News Feed Sync CLI
//!
//! This module implements the command handlers that connect CLI arguments to
//! the cache, settings and sync orchestrator.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::{
    CacheManager, CancelFlag, FeedClient, FollowedSet, Freshness, Namespace, SettingsStore,
    SignalHandler, SyncOrchestrator,
};
use crate::cli::progress::format_timestamp;
use crate::cli::{
    CacheAction, CacheArgs, CategoriesAction, CategoriesArgs, GlobalArgs, ProgressConfig,
    ProgressDisplay, SyncArgs,
};
use crate::config::AppConfig;
use crate::errors::Result;

/// Configuration and cache shared by every command
struct CommandContext {
    config: AppConfig,
    cache: Arc<CacheManager>,
}

impl CommandContext {
    /// Load configuration (file, environment, then CLI flags) and open the cache
    async fn load(global: &GlobalArgs) -> Result<Self> {
        if global.config.is_none() {
            if let Err(e) = AppConfig::initialize_first_run().await {
                warn!("Could not create default configuration file: {}", e);
            }
        }

        let mut config = AppConfig::load(global.config.clone()).await?;
        if let Some(cache_dir) = &global.cache_dir {
            debug!("--cache-dir overrides cache directory");
            config.cache.cache_root = Some(cache_dir.clone());
        }

        let (cache_config, _, _) = config.to_runtime_config();
        cache_config.validate()?;
        let cache = Arc::new(CacheManager::new(cache_config).await?);

        Ok(Self { config, cache })
    }

    fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.cache.clone())
    }
}

/// Handle the sync command
///
/// Runs a full sync with a progress display. CTRL-C stops the run at the next
/// category or image; everything stored up to that point is kept.
pub async fn handle_sync(global: &GlobalArgs, args: SyncArgs) -> Result<()> {
    let context = CommandContext::load(global).await?;
    let (_, client_config, coordinator_config) = context.config.to_runtime_config();
    let coordinator_config = if args.no_images {
        coordinator_config.with_images(false)
    } else {
        coordinator_config
    };

    info!(
        "Starting sync from {} (images: {})",
        context.config.feed.base_url, coordinator_config.download_images
    );

    let client = FeedClient::with_config(&context.config.feed.base_url, client_config)?;
    let orchestrator = SyncOrchestrator::new(coordinator_config, context.cache.clone(), client);

    let cancel = CancelFlag::new();
    let signal_task = SignalHandler::new(cancel.clone()).setup();

    let mut display = ProgressDisplay::new(
        ProgressConfig {
            assume_yes: args.yes,
            quiet: global.quiet,
            ..Default::default()
        },
        cancel,
    );

    let result = orchestrator.run_sync(&mut display).await;
    signal_task.abort();

    let report = result?;
    debug!("Sync report: {:?}", report);
    if report.is_clean() {
        info!("Sync finished: {}", report);
    } else if !report.cancelled {
        warn!(
            "Sync finished with failures: {} ({:.0}% of categories synced)",
            report, report.success_rate()
        );
    }
    Ok(())
}

/// Handle category management commands
pub async fn handle_categories(global: &GlobalArgs, args: CategoriesArgs) -> Result<()> {
    let context = CommandContext::load(global).await?;
    let settings = context.settings();

    match args.action {
        CategoriesAction::List => list_categories(&context.cache, &settings).await,
        CategoriesAction::Follow { files, all } => {
            let selection = if all { None } else { Some(files) };
            follow_categories(&context.cache, &settings, selection).await
        }
    }
}

async fn list_categories(cache: &CacheManager, settings: &SettingsStore) -> Result<()> {
    let Some(index) = cache.load_index().await else {
        println!("No category index cached yet. Run `sync` first.");
        return Ok(());
    };

    let followed = settings.get_followed_categories().await;

    println!("📰 Categories ({})", format_timestamp(Some(index.timestamp)));
    println!("======================");
    for category in &index.categories {
        let marker = if followed.includes(&category.file) {
            "x"
        } else {
            " "
        };
        println!("[{}] {:<32} {}", marker, category.file, category.name);
    }

    if followed.is_all() {
        println!();
        println!("Following all categories.");
    }
    Ok(())
}

async fn follow_categories(
    cache: &CacheManager,
    settings: &SettingsStore,
    selection: Option<Vec<String>>,
) -> Result<()> {
    if let (Some(files), Some(index)) = (&selection, cache.load_index().await) {
        let known: HashSet<&str> = index.categories.iter().map(|c| c.file.as_str()).collect();
        for file in files.iter().filter(|f| !known.contains(f.as_str())) {
            warn!("{} is not in the cached index", file);
            println!("⚠️  {} is not in the cached index; it will be skipped until it appears.", file);
        }
    }

    match settings.save_followed_categories(selection).await? {
        FollowedSet::All => println!("✅ Following all categories."),
        FollowedSet::Only(files) => {
            println!("✅ Following {} categories:", files.len());
            for file in files {
                println!("   {}", file);
            }
        }
    }
    Ok(())
}

/// Handle cache management commands
pub async fn handle_cache(global: &GlobalArgs, args: CacheArgs) -> Result<()> {
    let context = CommandContext::load(global).await?;

    match args.action {
        CacheAction::Info => handle_cache_info(&context.cache).await,
        CacheAction::Clear => handle_cache_clear(&context.cache).await,
    }
}

/// Handle cache info display
async fn handle_cache_info(cache: &CacheManager) -> Result<()> {
    let stats = cache.get_cache_stats().await;

    println!("💾 Cache Information");
    println!("===================");
    println!("Location: {}", stats.cache_root.display());
    for namespace in Namespace::ALL {
        let usage = stats.namespace(namespace);
        println!(
            "{:<10} {:>6} entries  {:>10}",
            format!("{}:", namespace),
            usage.entries,
            crate::app::cache::format_bytes(usage.bytes)
        );
    }
    println!(
        "Total:     {:>6} entries  {:>10}",
        stats.total_entries(),
        stats.format_cache_size()
    );
    println!("Last sync: {}", format_timestamp(stats.last_sync_timestamp));

    Ok(())
}

/// Handle cache clearing
async fn handle_cache_clear(cache: &CacheManager) -> Result<()> {
    println!("🧹 Clearing cache at {}", cache.cache_root().display());

    let summary = cache.clear_cache().await?;
    println!(
        "✅ Removed {} files and {} directories ({} preserved).",
        summary.files_removed, summary.dirs_removed, summary.preserved
    );
    Ok(())
}

/// Handle the status command
pub async fn handle_status(global: &GlobalArgs) -> Result<()> {
    let context = CommandContext::load(global).await?;
    let last_sync = context.cache.last_sync_timestamp().await;
    let followed = context.settings().get_followed_categories().await;

    println!("📡 Sync Status");
    println!("==============");
    println!("Feed: {}", context.config.feed.base_url);
    println!("Cache: {}", context.cache.cache_root().display());
    println!("Last sync: {}", format_timestamp(last_sync));

    let freshness = match last_sync {
        None => "no data",
        Some(_) => match Freshness::as_of_now(last_sync) {
            Freshness::Fresh => "fresh (same day)",
            Freshness::Stale => "stale (a new day has started, next sync clears the cache)",
        },
    };
    println!("Freshness: {}", freshness);

    match followed {
        FollowedSet::All => println!("Following: all categories"),
        FollowedSet::Only(files) => println!("Following: {}", files.join(", ")),
    }
    Ok(())
}
