//! Cache statistics and disk usage monitoring
//!
//! Counts entries and bytes per namespace. Temporary files from in-flight or
//! interrupted writes are not entries and are excluded.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::path::{Namespace, PathGenerator};

/// Usage of a single namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceStats {
    pub namespace: Namespace,
    pub entries: usize,
    pub bytes: u64,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Cache root directory
    pub cache_root: PathBuf,
    /// Per-namespace usage, in layout order
    pub namespaces: Vec<NamespaceStats>,
    /// Timestamp of the cached category index, if any
    pub last_sync_timestamp: Option<i64>,
}

impl CacheStats {
    /// Create empty statistics for a cache root
    pub fn new(cache_root: PathBuf) -> Self {
        Self {
            cache_root,
            namespaces: Vec::new(),
            last_sync_timestamp: None,
        }
    }

    /// Record usage for a namespace
    pub fn add_namespace(&mut self, namespace: Namespace, entries: usize, bytes: u64) {
        self.namespaces.push(NamespaceStats {
            namespace,
            entries,
            bytes,
        });
    }

    /// Usage of one namespace (zeroed if it was never scanned)
    pub fn namespace(&self, namespace: Namespace) -> NamespaceStats {
        self.namespaces
            .iter()
            .find(|s| s.namespace == namespace)
            .cloned()
            .unwrap_or(NamespaceStats {
                namespace,
                entries: 0,
                bytes: 0,
            })
    }

    /// Total entries across namespaces
    pub fn total_entries(&self) -> usize {
        self.namespaces.iter().map(|s| s.entries).sum()
    }

    /// Total size across namespaces in bytes
    pub fn total_bytes(&self) -> u64 {
        self.namespaces.iter().map(|s| s.bytes).sum()
    }

    /// Format cache size in human-readable format
    pub fn format_cache_size(&self) -> String {
        format_bytes(self.total_bytes())
    }
}

/// Directory scanner for cache statistics
pub struct DirectoryScanner;

impl DirectoryScanner {
    /// Count entries and bytes under a directory
    pub async fn scan_directory(dir: &Path) -> (usize, u64) {
        let dir = dir.to_path_buf();

        tokio::task::spawn_blocking(move || Self::scan_directory_recursive(&dir))
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to scan cache directory: {}", e);
                (0, 0)
            })
    }

    fn scan_directory_recursive(dir: &Path) -> (usize, u64) {
        let mut file_count = 0;
        let mut total_size = 0u64;

        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();

                if path.is_dir() {
                    let (sub_count, sub_size) = Self::scan_directory_recursive(&path);
                    file_count += sub_count;
                    total_size += sub_size;
                } else if path.is_file() && !PathGenerator::is_temp_file(&path) {
                    file_count += 1;
                    if let Ok(metadata) = entry.metadata() {
                        total_size += metadata.len();
                    }
                }
            }
        }

        (file_count, total_size)
    }
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: u64 = 1024;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD as f64 && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD as f64;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
