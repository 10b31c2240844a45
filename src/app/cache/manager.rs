//! Core cache manager with atomic operations
//!
//! Generic namespaced key/value storage backed by plain files. Writes go to a
//! sibling temp file that is renamed into place, so a concurrent reader sees
//! either the previous entry or the new one, never a partial write. Reads never
//! fail: missing, unreadable and corrupt entries are all cache misses.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::constants::cache::APP_DIR_NAME;
use crate::errors::{CacheError, CacheResult};

use super::config::CacheConfig;
use super::path::{Namespace, PathGenerator};
use super::stats::{CacheStats, DirectoryScanner};

/// Main cache management system
#[derive(Debug)]
pub struct CacheManager {
    /// Configuration
    config: CacheConfig,
    /// Cache root directory
    cache_root: PathBuf,
}

/// Outcome of a successful [`CacheManager::clear`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearSummary {
    /// Entry files deleted
    pub files_removed: usize,
    /// Directories deleted after being emptied
    pub dirs_removed: usize,
    /// Entries kept because they were in the preserve set
    pub preserved: usize,
}

impl CacheManager {
    /// Create a new cache manager
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if cache directory cannot be created or accessed
    pub async fn new(config: CacheConfig) -> CacheResult<Self> {
        let cache_root = match &config.cache_root {
            Some(path) => path.clone(),
            None => Self::get_default_cache_dir()?,
        };

        Self::ensure_directory_exists(&cache_root).await?;

        info!(
            "Initialized cache manager with root: {}",
            cache_root.display()
        );

        Ok(Self { config, cache_root })
    }

    /// Get the cache root directory
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Get the cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the default cache directory for the current OS
    ///
    /// - macOS: ~/Library/Caches/newsfeed-sync
    /// - Linux: ~/.cache/newsfeed-sync
    /// - Windows: %LOCALAPPDATA%/newsfeed-sync
    pub fn get_default_cache_dir() -> CacheResult<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| CacheError::DirectoryNotAccessible {
                path: PathBuf::from("system cache directory"),
            })?
            .join(APP_DIR_NAME);

        Ok(cache_dir)
    }

    async fn ensure_directory_exists(path: &Path) -> CacheResult<()> {
        fs::create_dir_all(path).await.map_err(|e| {
            error!("Failed to create cache directory {}: {}", path.display(), e);
            CacheError::DirectoryNotAccessible {
                path: path.to_path_buf(),
            }
        })
    }

    /// Directory holding a namespace's entries (may not exist yet)
    pub fn cache_dir(&self, namespace: Namespace) -> PathBuf {
        PathGenerator::namespace_dir(&self.cache_root, namespace)
    }

    /// Full path of an entry
    pub fn entry_path(&self, namespace: Namespace, key: &str) -> CacheResult<PathBuf> {
        PathGenerator::entry_path(&self.cache_root, namespace, key)
    }

    /// Whether an entry is present
    ///
    /// Invalid keys are never present.
    pub async fn exists(&self, namespace: Namespace, key: &str) -> bool {
        let Ok(path) = self.entry_path(namespace, key) else {
            return false;
        };
        fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Read an entry's raw bytes
    pub async fn read_bytes(&self, namespace: Namespace, key: &str) -> Option<Vec<u8>> {
        let path = match self.entry_path(namespace, key) {
            Ok(path) => path,
            Err(e) => {
                warn!("Refusing to read cache entry: {}", e);
                return None;
            }
        };

        match fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: {}/{}", namespace, key);
                None
            }
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Read and decode a JSON entry
    ///
    /// An entry that exists but does not decode as `T` is logged and reported
    /// as a miss.
    pub async fn read_json<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Option<T> {
        let bytes = self.read_bytes(namespace, key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "Corrupt cache entry {}/{} treated as a miss: {}",
                    namespace, key, e
                );
                None
            }
        }
    }

    /// Replace an entry with new bytes atomically
    ///
    /// The namespace directory is created on first write.
    pub async fn write_bytes(&self, namespace: Namespace, key: &str, content: &[u8]) -> CacheResult<()> {
        let final_path = self.entry_path(namespace, key)?;
        Self::ensure_directory_exists(&self.cache_dir(namespace)).await?;

        let temp_path = PathGenerator::temp_path(&final_path);

        fs::write(&temp_path, content).await.map_err(|e| {
            error!("Failed to write temporary file {}: {}", temp_path.display(), e);
            CacheError::io(&temp_path, e)
        })?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            error!("Failed to rename temporary file: {}", e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::io(&final_path, e));
        }

        debug!(
            "Wrote cache entry {}/{} ({} bytes)",
            namespace,
            key,
            content.len()
        );
        Ok(())
    }

    /// Serialize a value as JSON and replace the entry atomically
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        namespace: Namespace,
        key: &str,
        value: &T,
    ) -> CacheResult<()> {
        let encoded = if self.config.pretty_json {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(|source| CacheError::Serialization {
            key: key.to_string(),
            source,
        })?;

        self.write_bytes(namespace, key, &encoded).await
    }

    /// Remove every entry in every namespace except the preserved ones
    ///
    /// Files are deleted before their parent directories and directories left
    /// empty are removed. Deletion failures do not stop the walk; they are
    /// collected and returned together as [`CacheError::ClearFailed`].
    pub async fn clear(&self, preserve: &[(Namespace, &str)]) -> CacheResult<ClearSummary> {
        let preserve: Vec<(Namespace, String)> = preserve
            .iter()
            .map(|(ns, key)| (*ns, key.to_string()))
            .collect();
        let cache_root = self.cache_root.clone();

        let (summary, failures) = tokio::task::spawn_blocking(move || {
            let mut walker = ClearWalker::new(&preserve);
            for namespace in Namespace::ALL {
                walker.clear_namespace(
                    namespace,
                    &PathGenerator::namespace_dir(&cache_root, namespace),
                );
            }
            (walker.summary, walker.failures)
        })
        .await
        .map_err(|e| CacheError::ClearFailed {
            failures: vec![(self.cache_root.clone(), e.to_string())],
        })?;

        if !failures.is_empty() {
            error!("Cache clear left {} path(s) behind", failures.len());
            return Err(CacheError::ClearFailed { failures });
        }

        info!(
            "Cleared cache: {} file(s), {} director(ies) removed, {} preserved",
            summary.files_removed, summary.dirs_removed, summary.preserved
        );
        Ok(summary)
    }

    /// Get cache statistics
    pub async fn get_cache_stats(&self) -> CacheStats {
        let mut stats = CacheStats::new(self.cache_root.clone());
        for namespace in Namespace::ALL {
            let (entries, bytes) = DirectoryScanner::scan_directory(&self.cache_dir(namespace)).await;
            stats.add_namespace(namespace, entries, bytes);
        }
        stats.last_sync_timestamp = self.last_sync_timestamp().await;
        stats
    }
}

/// Blocking tree walk used by [`CacheManager::clear`]
struct ClearWalker<'a> {
    preserve: &'a [(Namespace, String)],
    summary: ClearSummary,
    failures: Vec<(PathBuf, String)>,
}

impl<'a> ClearWalker<'a> {
    fn new(preserve: &'a [(Namespace, String)]) -> Self {
        Self {
            preserve,
            summary: ClearSummary::default(),
            failures: Vec::new(),
        }
    }

    fn is_preserved(&self, namespace: Namespace, name: &str) -> bool {
        self.preserve
            .iter()
            .any(|(ns, key)| *ns == namespace && key == name)
    }

    fn clear_namespace(&mut self, namespace: Namespace, dir: &Path) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return,
            Err(e) => {
                self.failures.push((dir.to_path_buf(), e.to_string()));
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);

            if is_dir {
                self.remove_tree(&path);
                continue;
            }

            let name = entry.file_name();
            if self.is_preserved(namespace, &name.to_string_lossy()) {
                debug!("Preserving {}", path.display());
                self.summary.preserved += 1;
                continue;
            }

            self.remove_file(&path);
        }

        self.remove_dir_if_empty(dir);
    }

    fn remove_tree(&mut self, dir: &Path) {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                        self.remove_tree(&path);
                    } else {
                        self.remove_file(&path);
                    }
                }
            }
            Err(e) => self.failures.push((dir.to_path_buf(), e.to_string())),
        }
        self.remove_dir_if_empty(dir);
    }

    fn remove_file(&mut self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => self.summary.files_removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                self.failures.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    fn remove_dir_if_empty(&mut self, dir: &Path) {
        let is_empty = std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty {
            return;
        }

        match std::fs::remove_dir(dir) {
            Ok(()) => self.summary.dirs_removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => self.failures.push((dir.to_path_buf(), e.to_string())),
        }
    }
}
