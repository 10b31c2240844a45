//! Unit tests for the sync orchestrator
//!
//! The orchestrator runs against an in-memory feed so every phase, failure and
//! cancellation point can be driven deterministically. End-to-end tests through
//! the public API live in the top-level tests directory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, TimeZone};
use tempfile::TempDir;

use crate::app::cache::{CacheConfig, CacheManager, Namespace};
use crate::app::client::FeedSource;
use crate::app::followed::FollowedSet;
use crate::app::models::{
    ArticleCluster, Category, CategoryArticles, CategoryIndex, ClusterImage,
};
use crate::errors::{FetchError, FetchResult, SyncError};

use super::*;

/// In-memory feed that records every request it serves
pub struct MockFeed {
    index: Mutex<FetchResult<CategoryIndex>>,
    articles: Mutex<HashMap<String, FetchResult<CategoryArticles>>>,
    images: Mutex<HashMap<String, FetchResult<Vec<u8>>>>,
    requests: Mutex<Vec<String>>,
}

impl MockFeed {
    pub fn new(index: CategoryIndex) -> Self {
        Self {
            index: Mutex::new(Ok(index)),
            articles: Mutex::new(HashMap::new()),
            images: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_index(&self, index: CategoryIndex) {
        *self.index.lock().unwrap() = Ok(index);
    }

    pub fn fail_index(&self) {
        *self.index.lock().unwrap() = Err(FetchError::transport("connection refused"));
    }

    pub fn with_articles(self, articles: CategoryArticles) -> Self {
        self.articles
            .lock()
            .unwrap()
            .insert(articles.category.clone(), Ok(articles));
        self
    }

    pub fn with_failing_articles(self, file: &str) -> Self {
        self.articles
            .lock()
            .unwrap()
            .insert(file.to_string(), Err(FetchError::transport("HTTP 500")));
        self
    }

    pub fn with_image(self, url: &str, result: FetchResult<Vec<u8>>) -> Self {
        self.images.lock().unwrap().insert(url.to_string(), result);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

impl FeedSource for MockFeed {
    async fn fetch_index(&self) -> FetchResult<CategoryIndex> {
        self.record("index".to_string());
        self.index.lock().unwrap().clone()
    }

    async fn fetch_articles(&self, category_file: &str) -> FetchResult<CategoryArticles> {
        self.record(format!("articles:{}", category_file));
        self.articles
            .lock()
            .unwrap()
            .get(category_file)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::transport("HTTP 404")))
    }

    async fn fetch_image(&self, url: &str) -> FetchResult<Vec<u8>> {
        self.record(format!("image:{}", url));
        self.images
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::transport("HTTP 404")))
    }
}

/// Epoch seconds for a local wall-clock time
pub fn local_timestamp(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    Local
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .earliest()
        .unwrap()
        .timestamp()
}

/// Create an index whose categories are named after their files
pub fn create_test_index(timestamp: i64, files: &[&str]) -> CategoryIndex {
    CategoryIndex {
        timestamp,
        categories: files
            .iter()
            .map(|f| Category::new(*f, f.trim_end_matches(".json")))
            .collect(),
    }
}

/// Create a category document with one cluster per image URL
///
/// The `category` field carries the file name so [`MockFeed::with_articles`]
/// can key on it.
pub fn create_test_articles(file: &str, image_urls: &[&str]) -> CategoryArticles {
    let mut clusters: Vec<ArticleCluster> = image_urls
        .iter()
        .map(|url| {
            let mut cluster: ArticleCluster = serde_json::from_str("{}").unwrap();
            cluster.title = format!("Story with {}", url);
            cluster.primary_image = Some(ClusterImage {
                url: url.to_string(),
                caption: String::new(),
            });
            cluster
        })
        .collect();
    if clusters.is_empty() {
        let mut cluster: ArticleCluster = serde_json::from_str("{}").unwrap();
        cluster.title = format!("Story in {}", file);
        clusters.push(cluster);
    }

    CategoryArticles {
        category: file.to_string(),
        timestamp: 0,
        clusters,
    }
}

/// Create a cache rooted in a fresh temporary directory
pub async fn create_test_cache() -> (TempDir, Arc<CacheManager>) {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheManager::new(CacheConfig::with_cache_root(temp_dir.path().to_path_buf()))
        .await
        .unwrap();
    (temp_dir, Arc::new(cache))
}

fn continue_all() -> impl FnMut(&SyncProgress) -> SyncDecision {
    |_: &SyncProgress| SyncDecision::Continue
}

/// Test first-run behavior
///
/// With no cached index the run fetches and stores the index, then stops
/// without touching any category and without consulting the observer.
#[tokio::test]
async fn test_first_run_only_fetches_index() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json"]);
    let feed = MockFeed::new(index.clone()).with_articles(create_test_articles("world.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let mut consulted = 0;
    let report = orchestrator
        .run_sync(&mut |_: &SyncProgress| {
            consulted += 1;
            SyncDecision::Continue
        })
        .await
        .unwrap();

    assert!(report.first_run);
    assert!(!report.cancelled);
    assert_eq!(report.attempted, 0);
    assert_eq!(report.index_timestamp, Some(index.timestamp));
    assert_eq!(consulted, 0);
    assert_eq!(cache.load_index().await, Some(index));
    assert_eq!(orchestrator.source().requests(), vec!["index"]);
}

/// Test that a failed first index fetch is fatal and stores nothing
#[tokio::test]
async fn test_first_run_index_failure_is_fatal() {
    let (_temp_dir, cache) = create_test_cache().await;
    let feed = MockFeed::new(create_test_index(0, &[]));
    feed.fail_index();
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let result = orchestrator.run_sync(&mut continue_all()).await;

    assert!(matches!(
        result,
        Err(SyncError::IndexFetch(FetchError::Transport { .. }))
    ));
    assert!(cache.load_index().await.is_none());
}

/// Test declining at the confirm prompt
///
/// Cancelling at `Confirm` happens before any network request.
#[tokio::test]
async fn test_cancel_at_confirm_makes_no_requests() {
    let (_temp_dir, cache) = create_test_cache().await;
    let cached = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json", "tech.json"]);
    cache.save_index(&cached).await.unwrap();

    let feed = MockFeed::new(cached.clone());
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let mut phases = Vec::new();
    let report = orchestrator
        .run_sync(&mut |p: &SyncProgress| {
            phases.push((p.phase, p.total, p.index_timestamp));
            SyncDecision::Cancel
        })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.attempted, 0);
    assert_eq!(phases, vec![(SyncPhase::Confirm, 2, Some(cached.timestamp))]);
    assert!(orchestrator.source().requests().is_empty());
}

/// Test that a failed index refresh is fatal and leaves the cache as it was
#[tokio::test]
async fn test_refresh_failure_is_fatal() {
    let (_temp_dir, cache) = create_test_cache().await;
    let cached = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json"]);
    cache.save_index(&cached).await.unwrap();
    cache
        .save_articles("world.json", &create_test_articles("world.json", &[]))
        .await
        .unwrap();

    let feed = MockFeed::new(cached.clone());
    feed.fail_index();
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let result = orchestrator.run_sync(&mut continue_all()).await;

    assert!(matches!(result, Err(SyncError::IndexFetch(_))));
    assert_eq!(cache.load_index().await, Some(cached));
    assert!(cache.load_articles("world.json").await.is_some());
    assert_eq!(orchestrator.source().requests(), vec!["index"]);
}

/// Test partial-failure resilience
///
/// The second of three categories fails; the other two are still synced.
#[tokio::test]
async fn test_partial_failure_continues() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(
        local_timestamp(2024, 5, 1, 10),
        &["one.json", "two.json", "three.json"],
    );
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles("one.json", &[]))
        .with_failing_articles("two.json")
        .with_articles(create_test_articles("three.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let report = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.attempted, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert!(cache.load_articles("one.json").await.is_some());
    assert!(cache.load_articles("two.json").await.is_none());
    assert!(cache.load_articles("three.json").await.is_some());
}

/// Test that a failed write is a per-category failure
///
/// A plain file where the articles directory belongs makes every article
/// write fail; the run still visits every category and finishes.
#[tokio::test]
async fn test_write_failure_continues() {
    let (temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["one.json", "two.json"]);
    cache.save_index(&index).await.unwrap();
    std::fs::write(temp_dir.path().join("articles"), b"not a directory").unwrap();

    let feed = MockFeed::new(index.clone())
        .with_articles(create_test_articles("one.json", &[]))
        .with_articles(create_test_articles("two.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let report = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 2);
    assert_eq!(cache.load_index().await, Some(index));
    assert_eq!(
        orchestrator.source().requests(),
        vec!["index", "articles:one.json", "articles:two.json"]
    );
}

/// Test cancellation safety
///
/// Cancelling before the second category keeps the first and writes nothing
/// for the second.
#[tokio::test]
async fn test_cancel_before_second_category() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(
        local_timestamp(2024, 5, 1, 10),
        &["one.json", "two.json", "three.json"],
    );
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles("one.json", &[]))
        .with_articles(create_test_articles("two.json", &[]))
        .with_articles(create_test_articles("three.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let report = orchestrator
        .run_sync(&mut |p: &SyncProgress| {
            if p.phase == SyncPhase::FetchingArticles && p.position == 2 {
                SyncDecision::Cancel
            } else {
                SyncDecision::Continue
            }
        })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.attempted, 1);
    assert!(cache.load_articles("one.json").await.is_some());
    assert!(!cache
        .is_cache_valid(Namespace::Articles, "articles_two.json")
        .await);
    assert!(!orchestrator
        .source()
        .requests()
        .contains(&"articles:two.json".to_string()));
}

/// Test invalidation idempotence
///
/// Two refreshes on the same day never wipe; the first refresh on the next day
/// wipes exactly once.
#[tokio::test]
async fn test_invalidation_idempotence() {
    let (_temp_dir, cache) = create_test_cache().await;
    let files = ["world.json"];
    cache
        .save_index(&create_test_index(local_timestamp(2024, 5, 1, 10), &files))
        .await
        .unwrap();
    cache
        .save_articles("retired.json", &create_test_articles("retired.json", &[]))
        .await
        .unwrap();

    let feed = MockFeed::new(create_test_index(local_timestamp(2024, 5, 1, 12), &files))
        .with_articles(create_test_articles("world.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let first = orchestrator.run_sync(&mut continue_all()).await.unwrap();
    orchestrator
        .source()
        .set_index(create_test_index(local_timestamp(2024, 5, 1, 18), &files));
    let second = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert!(!first.invalidated);
    assert!(!second.invalidated);
    assert!(cache.load_articles("retired.json").await.is_some());

    orchestrator
        .source()
        .set_index(create_test_index(local_timestamp(2024, 5, 2, 9), &files));
    let next_day = orchestrator.run_sync(&mut continue_all()).await.unwrap();
    orchestrator
        .source()
        .set_index(create_test_index(local_timestamp(2024, 5, 2, 11), &files));
    let next_day_again = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert!(next_day.invalidated);
    assert!(!next_day_again.invalidated);
    assert!(cache.load_articles("retired.json").await.is_none());
    assert!(cache.load_articles("world.json").await.is_some());
    assert_eq!(
        cache.last_sync_timestamp().await,
        Some(local_timestamp(2024, 5, 2, 11))
    );
}

/// Test that invalidation keeps the followed categories
#[tokio::test]
async fn test_invalidation_preserves_settings() {
    let (_temp_dir, cache) = create_test_cache().await;
    let files = ["world.json", "tech.json", "science.json"];
    cache
        .save_index(&create_test_index(local_timestamp(2024, 5, 1, 10), &files))
        .await
        .unwrap();

    let feed = MockFeed::new(create_test_index(local_timestamp(2024, 5, 2, 10), &files))
        .with_articles(create_test_articles("world.json", &[]))
        .with_articles(create_test_articles("tech.json", &[]))
        .with_articles(create_test_articles("science.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);
    orchestrator
        .settings()
        .save_followed_categories(Some(vec!["tech.json".to_string()]))
        .await
        .unwrap();

    let report = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert!(report.invalidated);
    assert_eq!(report.attempted, 1);
    assert_eq!(
        orchestrator.settings().get_followed_categories().await,
        FollowedSet::Only(vec!["tech.json".to_string()])
    );
    assert!(cache.load_articles("tech.json").await.is_some());
    assert!(cache.load_articles("world.json").await.is_none());
}

/// Test that followed categories missing from the index are skipped, not attempted
#[tokio::test]
async fn test_unknown_followed_category_is_skipped() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json", "tech.json"]);
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index).with_articles(create_test_articles("world.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);
    orchestrator
        .settings()
        .save_followed_categories(Some(vec![
            "retired.json".to_string(),
            "world.json".to_string(),
        ]))
        .await
        .unwrap();

    let report = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(orchestrator.source().requests(), vec!["index", "articles:world.json"]);
}

/// Test image downloads
///
/// Cached images are not fetched again, failed images are counted, and the
/// run carries on.
#[tokio::test]
async fn test_images_downloaded_once() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json"]);
    cache.save_index(&index).await.unwrap();
    cache
        .save_image("https://img.example/cached.jpg", b"old")
        .await
        .unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles(
            "world.json",
            &[
                "https://img.example/cached.jpg",
                "https://img.example/new.jpg",
                "https://img.example/broken.jpg",
            ],
        ))
        .with_image("https://img.example/new.jpg", Ok(b"jpeg".to_vec()))
        .with_image(
            "https://img.example/broken.jpg",
            Err(FetchError::decode("empty body")),
        );
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let mut image_prompts = Vec::new();
    let report = orchestrator
        .run_sync(&mut |p: &SyncProgress| {
            if p.phase == SyncPhase::DownloadingImage {
                image_prompts.push((p.image_position, p.image_total));
            }
            SyncDecision::Continue
        })
        .await
        .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.images_cached, 1);
    assert_eq!(report.images_downloaded, 1);
    assert_eq!(report.images_failed, 1);
    assert_eq!(image_prompts, vec![(2, 3), (3, 3)]);
    assert!(cache.has_image("https://img.example/new.jpg").await);
    assert!(!cache.has_image("https://img.example/broken.jpg").await);
    assert!(!orchestrator
        .source()
        .requests()
        .contains(&"image:https://img.example/cached.jpg".to_string()));
}

/// Test that images are skipped entirely when disabled
#[tokio::test]
async fn test_images_disabled() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json"]);
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles("world.json", &["https://img.example/a.jpg"]))
        .with_image("https://img.example/a.jpg", Ok(b"jpeg".to_vec()));
    let orchestrator = SyncOrchestrator::new(
        CoordinatorConfig::default().with_images(false),
        cache.clone(),
        feed,
    );

    let report = orchestrator.run_sync(&mut continue_all()).await.unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.images_downloaded, 0);
    assert!(!cache.has_image("https://img.example/a.jpg").await);
}

/// Test cancelling between images
#[tokio::test]
async fn test_cancel_during_images() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["one.json", "two.json"]);
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles(
            "one.json",
            &["https://img.example/1.jpg", "https://img.example/2.jpg"],
        ))
        .with_articles(create_test_articles("two.json", &[]))
        .with_image("https://img.example/1.jpg", Ok(b"1".to_vec()))
        .with_image("https://img.example/2.jpg", Ok(b"2".to_vec()));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache.clone(), feed);

    let report = orchestrator
        .run_sync(&mut |p: &SyncProgress| {
            if p.phase == SyncPhase::DownloadingImage && p.image_position == 2 {
                SyncDecision::Cancel
            } else {
                SyncDecision::Continue
            }
        })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.images_downloaded, 1);
    assert!(cache.has_image("https://img.example/1.jpg").await);
    assert!(!cache.has_image("https://img.example/2.jpg").await);
    assert!(cache.load_articles("two.json").await.is_none());
}

/// Observer that records completion
#[derive(Default)]
struct RecordingObserver {
    progress_calls: usize,
    completed: Option<SyncReport>,
}

impl SyncObserver for RecordingObserver {
    fn on_progress(&mut self, _progress: &SyncProgress) -> SyncDecision {
        self.progress_calls += 1;
        SyncDecision::Continue
    }

    fn on_complete(&mut self, report: &SyncReport) {
        self.completed = Some(report.clone());
    }
}

/// Test that observers are told when a run completes
#[tokio::test]
async fn test_observer_completion_callback() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["world.json"]);
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index).with_articles(create_test_articles("world.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache, feed);

    let mut observer = RecordingObserver::default();
    let report = orchestrator.run_sync(&mut observer).await.unwrap();

    // confirm + one category
    assert_eq!(observer.progress_calls, 2);
    assert_eq!(observer.completed, Some(report));
}

/// Test that a cancel flag set mid-run stops at the next decision point
#[tokio::test]
async fn test_cancel_flag_observer() {
    let (_temp_dir, cache) = create_test_cache().await;
    let index = create_test_index(local_timestamp(2024, 5, 1, 10), &["one.json", "two.json"]);
    cache.save_index(&index).await.unwrap();

    let feed = MockFeed::new(index)
        .with_articles(create_test_articles("one.json", &[]))
        .with_articles(create_test_articles("two.json", &[]));
    let orchestrator = SyncOrchestrator::new(CoordinatorConfig::default(), cache, feed);

    let flag = CancelFlag::new();
    let report = orchestrator
        .run_sync(&mut |p: &SyncProgress| {
            if flag.is_cancelled() {
                return SyncDecision::Cancel;
            }
            if p.phase == SyncPhase::FetchingArticles {
                // simulates CTRL-C arriving while the first category is fetched
                flag.cancel();
            }
            SyncDecision::Continue
        })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.succeeded, 1);
}
