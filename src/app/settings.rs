//! Persisted user settings
//!
//! Settings live in `meta/settings.json` and are the only entry that survives
//! a cache clear.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::cache::{CacheManager, Namespace};
use crate::app::followed::{normalize_for_save, FollowedSet};
use crate::app::models::CategoryIndex;
use crate::constants::cache::SETTINGS_KEY;
use crate::errors::CacheResult;

/// Contents of `meta/settings.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub followed_categories: FollowedSet,
}

/// Read/write access to user settings through the cache store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    cache: Arc<CacheManager>,
}

impl SettingsStore {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Current settings; defaults when absent or unreadable
    pub async fn load(&self) -> Settings {
        self.cache
            .read_json(Namespace::Meta, SETTINGS_KEY)
            .await
            .unwrap_or_default()
    }

    /// The saved subscription (`All` when nothing was ever saved)
    pub async fn get_followed_categories(&self) -> FollowedSet {
        self.load().await.followed_categories
    }

    /// Persist a subscription and return what was stored
    ///
    /// `None`, an empty list, or a list covering every category in the cached
    /// index are all stored as [`FollowedSet::All`].
    pub async fn save_followed_categories(
        &self,
        selected: Option<Vec<String>>,
    ) -> CacheResult<FollowedSet> {
        let followed = match selected {
            None => FollowedSet::All,
            Some(selected) => {
                let known = self
                    .cache
                    .load_index()
                    .await
                    .map(|index| index.files())
                    .unwrap_or_default();
                normalize_for_save(&selected, &known)
            }
        };

        let mut settings = self.load().await;
        settings.followed_categories = followed.clone();
        self.cache
            .write_json(Namespace::Meta, SETTINGS_KEY, &settings)
            .await?;

        match &followed {
            FollowedSet::All => info!("Following all categories"),
            FollowedSet::Only(files) => info!("Following {} categories", files.len()),
        }
        Ok(followed)
    }

    /// Category files to sync for an index, in working order
    pub async fn working_set(&self, index: &CategoryIndex) -> Vec<String> {
        self.get_followed_categories().await.resolve(&index.files())
    }
}
