//! Typed access to the feed documents held in the cache
//!
//! Layout:
//! - `meta/categories.json` - the category index
//! - `meta/settings.json` - user settings (survives [`CacheManager::clear_cache`])
//! - `articles/articles_<category file>` - one category's articles
//! - `images/img_<md5 hex>.jpg` - image bytes

use std::path::PathBuf;

use crate::app::hash::image_key;
use crate::app::models::{CategoryArticles, CategoryIndex};
use crate::constants::cache::{INDEX_KEY, SETTINGS_KEY};
use crate::errors::CacheResult;

use super::manager::{CacheManager, ClearSummary};
use super::path::{Namespace, PathGenerator};

impl CacheManager {
    /// Whether an entry is present and usable as a cache hit
    pub async fn is_cache_valid(&self, namespace: Namespace, key: &str) -> bool {
        self.exists(namespace, key).await
    }

    /// Cached category index
    pub async fn load_index(&self) -> Option<CategoryIndex> {
        self.read_json(Namespace::Meta, INDEX_KEY).await
    }

    /// Replace the cached category index
    pub async fn save_index(&self, index: &CategoryIndex) -> CacheResult<()> {
        self.write_json(Namespace::Meta, INDEX_KEY, index).await
    }

    /// Timestamp of the last index that was persisted
    pub async fn last_sync_timestamp(&self) -> Option<i64> {
        self.load_index().await.map(|index| index.timestamp)
    }

    /// Cached articles for a category
    pub async fn load_articles(&self, category_file: &str) -> Option<CategoryArticles> {
        self.read_json(Namespace::Articles, &PathGenerator::article_key(category_file))
            .await
    }

    /// Replace the cached articles for a category
    pub async fn save_articles(
        &self,
        category_file: &str,
        articles: &CategoryArticles,
    ) -> CacheResult<()> {
        self.write_json(
            Namespace::Articles,
            &PathGenerator::article_key(category_file),
            articles,
        )
        .await
    }

    /// Local path where the image for `url` is (or would be) stored
    pub fn image_path(&self, url: &str) -> PathBuf {
        self.cache_dir(Namespace::Images).join(image_key(url))
    }

    /// Whether the image for `url` has already been downloaded
    pub async fn has_image(&self, url: &str) -> bool {
        self.exists(Namespace::Images, &image_key(url)).await
    }

    /// Store downloaded image bytes for `url`
    pub async fn save_image(&self, url: &str, bytes: &[u8]) -> CacheResult<()> {
        self.write_bytes(Namespace::Images, &image_key(url), bytes).await
    }

    /// Wipe the index, articles and images, keeping user settings
    pub async fn clear_cache(&self) -> CacheResult<ClearSummary> {
        self.clear(&[(Namespace::Meta, SETTINGS_KEY)]).await
    }
}
