//! Cache namespaces and entry path generation
//!
//! Every entry lives at `{cache_root}/{namespace}/{key}`. Keys are plain file
//! names; anything that could escape the namespace directory is rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::cache::{ARTICLES_DIR, ARTICLES_PREFIX, IMAGES_DIR, META_DIR};
use crate::constants::files::TEMP_FILE_SUFFIX;
use crate::errors::{CacheError, CacheResult};

/// Partition of the cache key space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Category index and user settings
    Meta,
    /// Per-category article documents
    Articles,
    /// Downloaded image bytes
    Images,
}

impl Namespace {
    /// Every namespace, in layout order
    pub const ALL: [Namespace; 3] = [Namespace::Meta, Namespace::Articles, Namespace::Images];

    /// Directory name under the cache root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Namespace::Meta => META_DIR,
            Namespace::Articles => ARTICLES_DIR,
            Namespace::Images => IMAGES_DIR,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Path generation utility for cache entries
pub struct PathGenerator;

impl PathGenerator {
    /// Directory holding a namespace's entries
    pub fn namespace_dir(cache_root: &Path, namespace: Namespace) -> PathBuf {
        cache_root.join(namespace.dir_name())
    }

    /// Full path of an entry, after validating its key
    pub fn entry_path(cache_root: &Path, namespace: Namespace, key: &str) -> CacheResult<PathBuf> {
        Self::validate_key(key)?;
        Ok(Self::namespace_dir(cache_root, namespace).join(key))
    }

    /// Reject keys that are not a single plain file name
    pub fn validate_key(key: &str) -> CacheResult<()> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
            || key.ends_with(TEMP_FILE_SUFFIX);

        if invalid {
            return Err(CacheError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Articles-namespace key for a category file
    ///
    /// Category files may be relative paths. `%`, path separators and NUL are
    /// percent-encoded, as is the dot of a trailing `.tmp`, so distinct files
    /// always map to distinct valid keys.
    pub fn article_key(category_file: &str) -> String {
        let mut key = String::with_capacity(ARTICLES_PREFIX.len() + category_file.len());
        key.push_str(ARTICLES_PREFIX);
        for c in category_file.chars() {
            match c {
                '%' => key.push_str("%25"),
                '/' => key.push_str("%2F"),
                '\\' => key.push_str("%5C"),
                '\0' => key.push_str("%00"),
                c => key.push(c),
            }
        }
        if key.ends_with(TEMP_FILE_SUFFIX) {
            let dot = key.len() - TEMP_FILE_SUFFIX.len();
            key.replace_range(dot..dot + 1, "%2E");
        }
        key
    }

    /// Sibling temporary path used while an entry is being written
    pub fn temp_path(final_path: &Path) -> PathBuf {
        let mut name = final_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(TEMP_FILE_SUFFIX);
        final_path.with_file_name(name)
    }

    /// Whether a path is a leftover temporary file
    pub fn is_temp_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(TEMP_FILE_SUFFIX))
            .unwrap_or(false)
    }
}
