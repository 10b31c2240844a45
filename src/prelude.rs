//! Prelude module for the News Feed Sync Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use newsfeed_sync::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use newsfeed_sync::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let cache = Arc::new(CacheManager::new(CacheConfig::default()).await?);
//!     let orchestrator =
//!         SyncOrchestrator::new(CoordinatorConfig::default(), cache, FeedClient::new()?);
//!
//!     let report = orchestrator
//!         .run_sync(&mut |_: &SyncProgress| SyncDecision::Continue)
//!         .await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Cache
    CacheConfig,
    CacheManager,
    CacheStats,
    // Data types
    Category,
    CategoryArticles,
    CategoryIndex,
    // Feed access
    ClientConfig,
    FeedClient,
    FeedSource,
    // Core orchestration
    CancelFlag,
    CoordinatorConfig,
    SyncDecision,
    SyncObserver,
    SyncOrchestrator,
    SyncPhase,
    SyncProgress,
    SyncReport,
    // Settings
    FollowedSet,
    SettingsStore,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_BASE_URL, DEFAULT_RATE_LIMIT_RPS, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;
