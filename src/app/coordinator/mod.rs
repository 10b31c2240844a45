//! Sync orchestration
//!
//! A sync run is a single sequential task that moves through these phases:
//!
//! ```text
//! FetchingIndex ─┬─> first run: persist index, stop
//!                └─> Confirm ─> RefreshingIndex ─> InvalidationCheck
//!                      ─> per category: FetchingArticles ─> DownloadingImages
//!                      ─> Completed | Cancelled
//! ```
//!
//! Only the two index fetches (and a failed wipe on a new day) end a run with an
//! error. A category or image that fails is logged, counted and skipped.
//!
//! - [`config`] - Configuration for a run
//! - [`progress`] - Observer port: progress snapshots and continue/cancel decisions
//! - [`stats`] - The report returned by a run
//! - [`signals`] - CTRL-C / SIGTERM to cancellation flag
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use newsfeed_sync::app::{
//!     CacheConfig, CacheManager, CoordinatorConfig, FeedClient, SyncDecision, SyncOrchestrator,
//!     SyncProgress,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(CacheManager::new(CacheConfig::default()).await?);
//! let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache, FeedClient::new()?);
//!
//! let report = orchestrator
//!     .run_sync(&mut |progress: &SyncProgress| {
//!         println!("{:?} {}", progress.phase, progress.category_label());
//!         SyncDecision::Continue
//!     })
//!     .await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod progress;
pub mod signals;
pub mod stats;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::app::cache::CacheManager;
use crate::app::client::FeedSource;
use crate::app::invalidation::should_invalidate;
use crate::app::models::{Category, CategoryArticles};
use crate::app::settings::SettingsStore;
use crate::errors::{SyncError, SyncResult};

pub use config::CoordinatorConfig;
pub use progress::{SyncDecision, SyncObserver, SyncPhase, SyncProgress};
pub use signals::{CancelFlag, SignalHandler};
pub use stats::SyncReport;

/// Drives a full synchronization run against a [`FeedSource`]
///
/// At most one run should be active per cache root; the orchestrator does not
/// lock the cache.
pub struct SyncOrchestrator<S: FeedSource> {
    config: CoordinatorConfig,
    cache: Arc<CacheManager>,
    settings: SettingsStore,
    source: S,
}

impl<S: FeedSource> SyncOrchestrator<S> {
    /// Create an orchestrator over a shared cache
    pub fn new(config: CoordinatorConfig, cache: Arc<CacheManager>, source: S) -> Self {
        let settings = SettingsStore::new(cache.clone());
        Self {
            config,
            cache,
            settings,
            source,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run a full sync
    ///
    /// # Errors
    ///
    /// Returns `SyncError::IndexFetch` if the category index cannot be fetched,
    /// and `SyncError::Cache` if the cache cannot be wiped for a new day or the
    /// first-run index cannot be stored. Everything else is counted in the
    /// returned report.
    pub async fn run_sync<O>(&self, observer: &mut O) -> SyncResult<SyncReport>
    where
        O: SyncObserver + ?Sized,
    {
        let started = Instant::now();
        let mut report = SyncReport::default();

        let result = self.run_phases(observer, &mut report).await;
        report.duration = started.elapsed();

        match result {
            Ok(()) => {
                if report.cancelled {
                    info!("Sync cancelled after {:?}: {}", report.duration, report);
                } else {
                    info!("Sync completed in {:?}: {}", report.duration, report);
                }
                observer.on_complete(&report);
                Ok(report)
            }
            Err(e) => {
                error!("Sync failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_phases<O>(&self, observer: &mut O, report: &mut SyncReport) -> SyncResult<()>
    where
        O: SyncObserver + ?Sized,
    {
        let Some(cached_index) = self.cache.load_index().await else {
            info!("No cached category index, fetching it for the first time");
            let index = self
                .source
                .fetch_index()
                .await
                .map_err(SyncError::IndexFetch)?;
            self.cache.save_index(&index).await?;

            report.first_run = true;
            report.index_timestamp = Some(index.timestamp);
            info!("Stored index with {} categories", index.categories.len());
            return Ok(());
        };

        let confirm = SyncProgress::confirm(
            cached_index.timestamp,
            cached_index.categories.len(),
            report,
        );
        if observer.on_progress(&confirm).is_cancel() {
            info!("Sync declined before refreshing the index");
            report.cancelled = true;
            return Ok(());
        }

        let index = self
            .source
            .fetch_index()
            .await
            .map_err(SyncError::IndexFetch)?;
        report.index_timestamp = Some(index.timestamp);

        if should_invalidate(Some(cached_index.timestamp), index.timestamp) {
            info!(
                "Index timestamp {} starts a new day (previous {}), clearing cache",
                index.timestamp, cached_index.timestamp
            );
            self.cache.clear_cache().await?;
            report.invalidated = true;
        }

        if let Err(e) = self.cache.save_index(&index).await {
            warn!("Failed to store refreshed index: {}", e);
        }

        let working_set = self.settings.working_set(&index).await;
        let total = working_set.len();
        debug!("Working set has {} categories", total);

        for (offset, file) in working_set.iter().enumerate() {
            let Some(category) = index.find(file) else {
                debug!("Skipping followed category {} missing from index", file);
                report.skipped += 1;
                continue;
            };

            tokio::task::yield_now().await;
            let progress = SyncProgress::category(category, offset + 1, total, report);
            if observer.on_progress(&progress).is_cancel() {
                info!("Sync cancelled before {}", category.file);
                report.cancelled = true;
                break;
            }

            let Some(articles) = self.sync_category(category, report).await else {
                continue;
            };

            if self.config.download_images
                && self
                    .sync_images(&progress, &articles, observer, report)
                    .await
                    .is_cancel()
            {
                info!("Sync cancelled while downloading images for {}", category.file);
                report.cancelled = true;
                break;
            }
        }

        Ok(())
    }

    /// Fetch and persist one category; `None` if it failed
    async fn sync_category(
        &self,
        category: &Category,
        report: &mut SyncReport,
    ) -> Option<CategoryArticles> {
        report.attempted += 1;
        if self.config.verbose_logging {
            info!("Fetching {} ({})", category.name, category.file);
        } else {
            debug!("Fetching {} ({})", category.name, category.file);
        }

        let articles = match self.source.fetch_articles(&category.file).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Failed to fetch {}: {}", category.file, e);
                report.failed += 1;
                return None;
            }
        };

        if let Err(e) = self.cache.save_articles(&category.file, &articles).await {
            warn!("Failed to store articles for {}: {}", category.file, e);
            report.failed += 1;
            return None;
        }

        report.succeeded += 1;
        Some(articles)
    }

    /// Download every image of a category that is not cached yet
    async fn sync_images<O>(
        &self,
        category_progress: &SyncProgress,
        articles: &CategoryArticles,
        observer: &mut O,
        report: &mut SyncReport,
    ) -> SyncDecision
    where
        O: SyncObserver + ?Sized,
    {
        let urls = articles.image_urls();
        let image_total = urls.len();

        for (offset, url) in urls.iter().enumerate() {
            if self.cache.has_image(url).await {
                report.images_cached += 1;
                continue;
            }

            tokio::task::yield_now().await;
            let progress =
                SyncProgress::image(category_progress, url, offset + 1, image_total, report);
            if observer.on_progress(&progress).is_cancel() {
                return SyncDecision::Cancel;
            }

            let bytes = match self.source.fetch_image(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Failed to fetch image {}: {}", url, e);
                    report.images_failed += 1;
                    continue;
                }
            };

            match self.cache.save_image(url, &bytes).await {
                Ok(()) => report.images_downloaded += 1,
                Err(e) => {
                    warn!("Failed to store image {}: {}", url, e);
                    report.images_failed += 1;
                }
            }
        }

        SyncDecision::Continue
    }
}
