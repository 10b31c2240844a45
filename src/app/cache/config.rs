//! Cache configuration types and defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the cache store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Root directory for cache storage (OS-specific if None)
    pub cache_root: Option<PathBuf>,
    /// Pretty-print JSON entries (easier to inspect, slightly larger on disk)
    pub pretty_json: bool,
}

impl CacheConfig {
    /// Create a new cache configuration with custom cache root
    pub fn with_cache_root(cache_root: PathBuf) -> Self {
        Self {
            cache_root: Some(cache_root),
            ..Default::default()
        }
    }

    /// Enable or disable pretty-printed JSON entries
    pub fn with_pretty_json(mut self, enabled: bool) -> Self {
        self.pretty_json = enabled;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(root) = &self.cache_root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "cache.cache_root".to_string(),
                    value: String::new(),
                    reason: "Cache root must not be an empty path".to_string(),
                });
            }
        }
        Ok(())
    }
}
