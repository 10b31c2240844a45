//! Configuration management for the news feed sync engine
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, multi-source loading, and zero-config defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{CacheConfig, ClientConfig, CoordinatorConfig};
use crate::constants::{cache, config as config_files, env, feed, http, limits, logging};
use crate::errors::{AppError, ConfigError, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Remote feed settings
    pub feed: FeedConfigToml,
    /// Cache management settings
    pub cache: CacheConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Sync run settings
    pub sync: SyncConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly feed configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfigToml {
    /// Base URL the index and category documents are served from
    pub base_url: String,
}

impl Default for FeedConfigToml {
    fn default() -> Self {
        Self {
            base_url: feed::BASE_URL.to_string(),
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CacheConfigToml {
    /// Cache directory path
    pub cache_root: Option<PathBuf>,
    /// Write cached JSON documents indented
    pub pretty_json: bool,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive_secs: Some(30),
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfigToml {
    /// Download cluster images after each category
    pub download_images: bool,
    /// Log every category at info level
    pub verbose_logging: bool,
}

impl Default for SyncConfigToml {
    fn default() -> Self {
        Self {
            download_images: true,
            verbose_logging: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (CacheConfig, ClientConfig, CoordinatorConfig) {
        (
            self.cache.to_runtime_config(),
            self.client.to_runtime_config(),
            self.sync.to_runtime_config(),
        )
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    ///
    /// CLI flags are applied by the caller on top of the result.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = if let Some(ref path) = config_file_override {
            Some(path.clone())
        } else {
            Self::find_config_file()
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(env::BASE_URL).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides feed base URL", env::BASE_URL);
            self.feed.base_url = base_url;
        }

        if let Some(cache_dir) = lookup(env::CACHE_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides cache directory", env::CACHE_DIR);
            self.cache.cache_root = Some(PathBuf::from(cache_dir));
        }
    }

    /// Validate every section that has runtime constraints
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "feed.base_url".to_string(),
                value: self.feed.base_url.clone(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: "must be one of error, warn, info, debug, trace".to_string(),
            }
            .into());
        }

        let (cache_config, client_config, _) = self.to_runtime_config();
        cache_config.validate()?;
        client_config.validate()?;
        Ok(())
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<Option<PathBuf>> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(Some(config_path));
        }

        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let config_content = Self::generate_default_config_content();

        tokio::fs::write(&config_path, config_content)
            .await
            .map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(Some(config_path))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(config_files::LOCAL_CONFIG_FILE)];
        if let Ok(user_path) = Self::get_default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir
            .join(cache::APP_DIR_NAME)
            .join(config_files::USER_CONFIG_FILE))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::from)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        let default_cache_path = dirs::cache_dir()
            .map(|dir| dir.join(cache::APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("./cache"));

        format!(
            r#"# News Feed Sync Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[feed]
# Where index.json and the category documents are served from
base_url = "{}"

[cache]
# Cache directory (leave commented to use the system default: {})
# cache_root = "/path/to/custom/cache"

# Indent cached JSON documents
pretty_json = false

[client]
# HTTP client settings
tcp_keepalive_secs = 30
pool_idle_timeout_secs = {}
pool_max_per_host = {}
request_timeout_secs = {}
connect_timeout_secs = {}
rate_limit_rps = {}

[sync]
# Download cluster images after each category
download_images = true
verbose_logging = false

[logging]
level = "{}"  # error, warn, info, debug, trace
"#,
            feed::BASE_URL,
            default_cache_path.display(),
            http::POOL_IDLE_TIMEOUT.as_secs(),
            http::POOL_MAX_PER_HOST,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            limits::DEFAULT_RATE_LIMIT_RPS,
            logging::DEFAULT_LOG_LEVEL,
        )
    }
}

impl CacheConfigToml {
    /// Convert to runtime CacheConfig
    pub fn to_runtime_config(&self) -> CacheConfig {
        CacheConfig {
            cache_root: self.cache_root.clone(),
            pretty_json: self.pretty_json,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
            ..ClientConfig::default()
        }
    }
}

impl SyncConfigToml {
    /// Convert to runtime CoordinatorConfig
    pub fn to_runtime_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::default()
            .with_images(self.download_images)
            .with_verbose_logging(self.verbose_logging)
    }
}
