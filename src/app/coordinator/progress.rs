//! Progress reporting and cancellation port
//!
//! The orchestrator stops at well-defined decision points and hands a
//! [`SyncProgress`] snapshot to a [`SyncObserver`], which answers with a
//! [`SyncDecision`]. Decision points are:
//!
//! - once before any network traffic when a cached index exists (`Confirm`)
//! - before each category's articles are fetched (`FetchingArticles`)
//! - before each image that is not already cached is fetched (`DownloadingImage`)

use crate::app::models::Category;

use super::stats::SyncReport;

/// Where the run is when the observer is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// A cached index exists; about to refresh it and sync articles
    Confirm,
    /// About to fetch a category's articles
    FetchingArticles,
    /// About to fetch one image of the current category
    DownloadingImage,
}

/// Observer's answer at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Continue,
    Cancel,
}

impl SyncDecision {
    pub fn is_cancel(&self) -> bool {
        matches!(self, SyncDecision::Cancel)
    }
}

/// Snapshot handed to the observer at each decision point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncProgress {
    pub phase: SyncPhase,
    /// Timestamp of the index the run is working from (the cached one during `Confirm`)
    pub index_timestamp: Option<i64>,
    /// Category being processed
    pub category: Option<Category>,
    /// 1-based position of the category in the working set
    pub position: usize,
    /// Size of the working set
    pub total: usize,
    /// Image about to be fetched
    pub image_url: Option<String>,
    /// 1-based position of the image among the category's images
    pub image_position: usize,
    /// Images referenced by the category
    pub image_total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub images_downloaded: usize,
}

impl SyncProgress {
    fn base(phase: SyncPhase, report: &SyncReport) -> Self {
        Self {
            phase,
            index_timestamp: report.index_timestamp,
            category: None,
            position: 0,
            total: 0,
            image_url: None,
            image_position: 0,
            image_total: 0,
            attempted: report.attempted,
            succeeded: report.succeeded,
            images_downloaded: report.images_downloaded,
        }
    }

    pub(crate) fn confirm(cached_timestamp: i64, category_count: usize, report: &SyncReport) -> Self {
        Self {
            index_timestamp: Some(cached_timestamp),
            total: category_count,
            ..Self::base(SyncPhase::Confirm, report)
        }
    }

    pub(crate) fn category(
        category: &Category,
        position: usize,
        total: usize,
        report: &SyncReport,
    ) -> Self {
        Self {
            category: Some(category.clone()),
            position,
            total,
            ..Self::base(SyncPhase::FetchingArticles, report)
        }
    }

    pub(crate) fn image(
        category_progress: &SyncProgress,
        url: &str,
        image_position: usize,
        image_total: usize,
        report: &SyncReport,
    ) -> Self {
        Self {
            category: category_progress.category.clone(),
            position: category_progress.position,
            total: category_progress.total,
            image_url: Some(url.to_string()),
            image_position,
            image_total,
            ..Self::base(SyncPhase::DownloadingImage, report)
        }
    }

    /// Display label of the current category, falling back to its file
    pub fn category_label(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| if c.name.is_empty() { c.file.as_str() } else { c.name.as_str() })
            .unwrap_or("")
    }
}

/// Receives progress and decides whether the run continues
pub trait SyncObserver {
    fn on_progress(&mut self, progress: &SyncProgress) -> SyncDecision;

    /// Called once when a run ends without a fatal error
    fn on_complete(&mut self, _report: &SyncReport) {}
}

impl<F> SyncObserver for F
where
    F: FnMut(&SyncProgress) -> SyncDecision,
{
    fn on_progress(&mut self, progress: &SyncProgress) -> SyncDecision {
        self(progress)
    }
}
