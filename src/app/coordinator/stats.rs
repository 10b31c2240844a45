//! Sync run statistics

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of a sync run that did not end in a fatal error
///
/// A cancelled run has the same shape; whatever was persisted before the
/// cancellation stays in the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// The observer cancelled the run
    pub cancelled: bool,
    /// No index was cached; only the index was fetched
    pub first_run: bool,
    /// The cache was wiped for a new news day
    pub invalidated: bool,
    /// Timestamp of the index fetched during this run
    pub index_timestamp: Option<i64>,
    /// Categories whose articles were requested
    pub attempted: usize,
    /// Categories whose articles were fetched and persisted
    pub succeeded: usize,
    /// Categories that failed to fetch or persist
    pub failed: usize,
    /// Followed categories missing from the fresh index
    pub skipped: usize,
    /// Images fetched and persisted
    pub images_downloaded: usize,
    /// Images already present in the cache
    pub images_cached: usize,
    /// Images that failed to fetch or persist
    pub images_failed: usize,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SyncReport {
    /// Run finished and nothing failed
    pub fn is_clean(&self) -> bool {
        !self.cancelled && self.failed == 0 && self.images_failed == 0
    }

    /// Fraction of attempted categories that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.attempted as f64) * 100.0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first_run {
            return write!(f, "fetched category index (first run)");
        }

        write!(
            f,
            "{}/{} categories synced, {} images downloaded",
            self.succeeded, self.attempted, self.images_downloaded
        )?;
        if self.images_cached > 0 {
            write!(f, " ({} already cached)", self.images_cached)?;
        }
        if self.failed > 0 || self.images_failed > 0 {
            write!(
                f,
                ", {} category and {} image failures",
                self.failed, self.images_failed
            )?;
        }
        if self.cancelled {
            write!(f, " [cancelled]")?;
        }
        Ok(())
    }
}
