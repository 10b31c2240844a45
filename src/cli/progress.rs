//! Progress display for sync runs
//!
//! [`ProgressDisplay`] is the CLI's [`SyncObserver`]: it asks for confirmation
//! before a run touches the network, draws an indicatif bar over the working
//! set and turns a pending CTRL-C into a cancel decision.
//!
//! # Examples
//!
//! ```rust,no_run
//! use newsfeed_sync::app::CancelFlag;
//! use newsfeed_sync::cli::{ProgressConfig, ProgressDisplay};
//!
//! let flag = CancelFlag::new();
//! let mut display = ProgressDisplay::new(
//!     ProgressConfig {
//!         assume_yes: true,
//!         ..Default::default()
//!     },
//!     flag,
//! );
//! // orchestrator.run_sync(&mut display).await?;
//! ```

use std::io::{self, BufRead, IsTerminal, Write};

use chrono::{Local, TimeZone};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, warn};

use crate::app::{CancelFlag, SyncDecision, SyncObserver, SyncPhase, SyncProgress, SyncReport};

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Enable the visual progress bar
    pub enable_progress_bars: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Suppress the summary
    pub quiet: bool,
    /// Maximum width for category labels in the bar message
    pub max_label_width: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_progress_bars: true,
            assume_yes: false,
            quiet: false,
            max_label_width: 32,
        }
    }
}

/// Terminal observer for a sync run
pub struct ProgressDisplay {
    config: ProgressConfig,
    cancel: CancelFlag,
    bar: Option<ProgressBar>,
    is_terminal: bool,
}

impl ProgressDisplay {
    /// Create a display that cancels once `cancel` is set
    pub fn new(config: ProgressConfig, cancel: CancelFlag) -> Self {
        let is_terminal = io::stderr().is_terminal();
        Self {
            config,
            cancel,
            bar: None,
            is_terminal,
        }
    }

    fn confirm(&mut self, progress: &SyncProgress) -> SyncDecision {
        if self.config.assume_yes {
            return SyncDecision::Continue;
        }

        let question = format!(
            "Cached index from {} lists {} categories. Refresh and sync now?",
            format_timestamp(progress.index_timestamp),
            progress.total
        );

        if !io::stdin().is_terminal() {
            warn!("No terminal to confirm on; pass --yes to sync non-interactively");
            return SyncDecision::Cancel;
        }

        let answer = read_blocking(|| prompt_yes_no(&question));
        confirmation_decision(answer, &self.cancel)
    }

    fn bar_for(&mut self, total: usize) -> Option<&ProgressBar> {
        if !self.config.enable_progress_bars || !self.is_terminal {
            return None;
        }

        if self.bar.is_none() {
            let bar = ProgressBar::new(total as u64);
            match ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                Ok(style) => bar.set_style(style.progress_chars("##-")),
                Err(e) => debug!("Progress bar template error: {}", e),
            }
            self.bar = Some(bar);
        }
        self.bar.as_ref()
    }

    fn truncate(&self, label: &str) -> String {
        truncate_label(label, self.config.max_label_width)
    }
}

impl SyncObserver for ProgressDisplay {
    fn on_progress(&mut self, progress: &SyncProgress) -> SyncDecision {
        if self.cancel.is_cancelled() {
            return SyncDecision::Cancel;
        }

        match progress.phase {
            SyncPhase::Confirm => self.confirm(progress),
            SyncPhase::FetchingArticles => {
                let label = self.truncate(progress.category_label());
                let position = progress.position.saturating_sub(1) as u64;
                let quiet = self.config.quiet;
                match self.bar_for(progress.total) {
                    Some(bar) => {
                        bar.set_position(position);
                        bar.set_message(label);
                    }
                    None if !quiet => {
                        eprintln!("[{}/{}] {}", progress.position, progress.total, label);
                    }
                    None => {}
                }
                SyncDecision::Continue
            }
            SyncPhase::DownloadingImage => {
                let message = format!(
                    "{} (image {}/{})",
                    self.truncate(progress.category_label()),
                    progress.image_position,
                    progress.image_total
                );
                if let Some(bar) = self.bar_for(progress.total) {
                    bar.set_message(message);
                }
                SyncDecision::Continue
            }
        }
    }

    fn on_complete(&mut self, report: &SyncReport) {
        if let Some(bar) = self.bar.take() {
            if report.cancelled {
                bar.abandon_with_message("cancelled");
            } else {
                bar.set_position(bar.length().unwrap_or(0));
                bar.finish_with_message("done");
            }
        }

        if self.config.quiet {
            return;
        }

        if report.first_run {
            eprintln!("✅ Fetched the category index for the first time.");
            eprintln!("   Choose categories with `categories follow`, then run `sync` again.");
            return;
        }

        eprintln!("\n✅ Sync Summary:");
        eprintln!("   Categories: {}/{} synced", report.succeeded, report.attempted);
        if report.skipped > 0 {
            eprintln!("   Skipped: {} followed categories no longer in the feed", report.skipped);
        }
        eprintln!(
            "   Images: {} downloaded, {} already cached",
            report.images_downloaded, report.images_cached
        );
        if report.invalidated {
            eprintln!("   Cache was cleared for a new day");
        }
        eprintln!("   Duration: {:?}", report.duration);

        if report.failed > 0 || report.images_failed > 0 {
            eprintln!(
                "⚠️  {} categories and {} images failed. Check logs for details.",
                report.failed, report.images_failed
            );
        }
        if report.cancelled {
            eprintln!("⚠️  Sync was cancelled; what was already stored is kept.");
        }
    }
}

/// Ask a yes/no question on stderr, defaulting to yes
fn prompt_yes_no(question: &str) -> io::Result<bool> {
    eprint!("{} [Y/n] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_answer(&answer))
}

/// Run a blocking stdin read without stalling other tasks on the runtime
fn read_blocking<T>(read: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

/// Turn a prompt answer into a decision
///
/// A CTRL-C while the prompt was waiting wins over the answer.
fn confirmation_decision(answer: io::Result<bool>, cancel: &CancelFlag) -> SyncDecision {
    if cancel.is_cancelled() {
        debug!("Cancelled while waiting for confirmation");
        return SyncDecision::Cancel;
    }

    match answer {
        Ok(true) => SyncDecision::Continue,
        Ok(false) => SyncDecision::Cancel,
        Err(e) => {
            warn!("Failed to read confirmation: {}", e);
            SyncDecision::Cancel
        }
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

fn truncate_label(label: &str, max_width: usize) -> String {
    let count = label.chars().count();
    if count <= max_width || max_width < 4 {
        return label.to_string();
    }
    let tail: String = label.chars().skip(count - (max_width - 3)).collect();
    format!("...{}", tail)
}

/// Render an index timestamp in local time
pub fn format_timestamp(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| Local.timestamp_opt(ts, 0).earliest())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}
