//! File-backed, namespaced cache store
//!
//! The cache is split into three namespaces (`meta`, `articles`, `images`),
//! each a directory under the cache root. Entries are whole files replaced
//! atomically with the temp-file + rename pattern.
//!
//! # Module Organization
//!
//! - [`config`] - Configuration types and defaults
//! - [`path`] - Namespaces, key validation and entry paths
//! - [`manager`] - Generic read/write/clear operations
//! - [`documents`] - Typed access to the index, articles and images
//! - [`stats`] - Per-namespace usage statistics
//!
//! # Examples
//!
//! ```rust,no_run
//! use newsfeed_sync::app::cache::{CacheConfig, CacheManager};
//! use newsfeed_sync::app::models::{Category, CategoryIndex};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = CacheManager::new(CacheConfig::default()).await?;
//!
//! let index = CategoryIndex {
//!     timestamp: 1_714_557_600,
//!     categories: vec![Category::new("world.json", "World")],
//! };
//! cache.save_index(&index).await?;
//!
//! if let Some(articles) = cache.load_articles("world.json").await {
//!     println!("{} stories cached", articles.clusters.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod documents;
pub mod manager;
pub mod path;
pub mod stats;

// Re-export main public API
pub use config::CacheConfig;
pub use manager::{CacheManager, ClearSummary};
pub use path::{Namespace, PathGenerator};
pub use stats::{format_bytes, CacheStats, NamespaceStats};
