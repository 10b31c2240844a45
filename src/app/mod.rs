//! Core application logic for the news feed sync engine
//!
//! This module contains the feed client, data models, the on-disk cache,
//! followed-category settings and the sync orchestration logic.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use newsfeed_sync::app::{CacheConfig, CacheManager, FeedClient, FeedSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = Arc::new(CacheManager::new(CacheConfig::default()).await?);
//! let client = FeedClient::new()?;
//!
//! let index = client.fetch_index().await?;
//! for category in &index.categories {
//!     if let Some(articles) = cache.load_articles(&category.file).await {
//!         println!("{}: {} cached stories", category.name, articles.clusters.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod coordinator;
pub mod followed;
pub mod hash;
pub mod invalidation;
pub mod models;
pub mod settings;

// Re-export main public API
pub use cache::{CacheConfig, CacheManager, CacheStats, ClearSummary, Namespace};
pub use client::{ClientConfig, FeedClient, FeedSource};
pub use coordinator::{
    CancelFlag, CoordinatorConfig, SignalHandler, SyncDecision, SyncObserver, SyncOrchestrator,
    SyncPhase, SyncProgress, SyncReport,
};
pub use followed::FollowedSet;
pub use hash::{Md5Hash, image_key};
pub use invalidation::{Freshness, should_invalidate};
pub use models::{ArticleCluster, Category, CategoryArticles, CategoryIndex, ClusterImage};
pub use settings::{Settings, SettingsStore};
