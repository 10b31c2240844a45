//! Configuration for the sync orchestrator

use serde::{Deserialize, Serialize};

/// Configuration for a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Download cluster images after each category's articles
    pub download_images: bool,
    /// Log every category and image at info level instead of debug
    pub verbose_logging: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            download_images: true,
            verbose_logging: false,
        }
    }
}

impl CoordinatorConfig {
    /// Enable or disable image downloads
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.download_images = enabled;
        self
    }

    /// Enable or disable verbose logging
    pub fn with_verbose_logging(mut self, enabled: bool) -> Self {
        self.verbose_logging = enabled;
        self
    }
}
