//! Application constants for newsfeed_sync
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Overrides the feed base URL
    pub const BASE_URL: &str = "NEWSFEED_BASE_URL";

    /// Overrides the cache root directory
    pub const CACHE_DIR: &str = "NEWSFEED_CACHE_DIR";
}

/// Remote feed endpoints
pub mod feed {
    /// Default base URL of the news feed API
    pub const BASE_URL: &str = "https://kite.kagi.com";

    /// Path of the category index, relative to the base URL
    pub const INDEX_PATH: &str = "index.json";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "newsfeed-sync/0.1.0 (offline news reader)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting configuration
pub mod limits {
    /// Default request pacing (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

    /// Upper bound of the jitter added before each request (milliseconds)
    pub const RATE_LIMIT_JITTER_MS: u64 = 50;
}

/// Cache layout: namespace directories and entry naming
pub mod cache {
    /// Application directory name under the OS cache/config directories
    pub const APP_DIR_NAME: &str = "newsfeed-sync";

    /// Namespace directory for the category index and user settings
    pub const META_DIR: &str = "meta";

    /// Namespace directory for per-category article responses
    pub const ARTICLES_DIR: &str = "articles";

    /// Namespace directory for downloaded images
    pub const IMAGES_DIR: &str = "images";

    /// Key of the cached category index in the meta namespace
    pub const INDEX_KEY: &str = "categories.json";

    /// Key of the persisted user settings in the meta namespace
    pub const SETTINGS_KEY: &str = "settings.json";

    /// Prefix of per-category article keys
    pub const ARTICLES_PREFIX: &str = "articles_";

    /// Prefix of derived image keys
    pub const IMAGE_PREFIX: &str = "img_";

    /// Suffix of derived image keys (content type marker)
    pub const IMAGE_SUFFIX: &str = ".jpg";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "newsfeed-sync.toml";

    /// Configuration file name inside the user config directory
    pub const USER_CONFIG_FILE: &str = "config.toml";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants for convenience
pub use feed::BASE_URL as DEFAULT_BASE_URL;
pub use files::TEMP_FILE_SUFFIX;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::DEFAULT_RATE_LIMIT_RPS;
