//! Remote feed access
//!
//! The sync orchestrator talks to the feed only through the [`FeedSource`]
//! trait. [`FeedClient`] is the HTTP implementation used by the CLI:
//!
//! - `config`: HTTP client configuration and building
//! - `http`: rate-limited GET with status and body checks

use std::future::Future;

use tracing::info;
use url::Url;

use crate::app::models::{CategoryArticles, CategoryIndex};
use crate::constants::feed;
use crate::errors::{ConfigError, FetchError, FetchResult, Result};

pub mod config;
pub mod http;


pub use config::ClientConfig;

use http::HttpHandler;

/// Read-only access to the remote news feed
///
/// Every call either returns decoded data or a [`FetchError`]; implementations
/// enforce their own time bounds.
pub trait FeedSource: Send + Sync {
    /// `GET {base}/index.json`
    fn fetch_index(&self) -> impl Future<Output = FetchResult<CategoryIndex>> + Send;

    /// `GET {base}/{category_file}`
    fn fetch_articles(
        &self,
        category_file: &str,
    ) -> impl Future<Output = FetchResult<CategoryArticles>> + Send;

    /// `GET {url}` for an absolute image URL
    fn fetch_image(&self, url: &str) -> impl Future<Output = FetchResult<Vec<u8>>> + Send;
}

/// HTTP client for the news feed API
#[derive(Debug)]
pub struct FeedClient {
    http_handler: HttpHandler,
    base_url: Url,
}

impl FeedClient {
    /// Creates a client for the default feed endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(feed::BASE_URL, ClientConfig::default())
    }

    /// Creates a client for `base_url` with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unusable base URL or client settings, and
    /// `FetchError` if the HTTP client cannot be built
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = Self::parse_base_url(base_url)?;
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;

        info!("Created feed client for {}", base_url);

        Ok(Self {
            http_handler,
            base_url,
        })
    }

    /// Parse a base URL, normalizing it to end with `/` so joins append
    fn parse_base_url(raw: &str) -> std::result::Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: "feed.base_url".to_string(),
            value: raw.to_string(),
            reason,
        };

        let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("Only http and https are supported".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Get the base URL of the feed
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the category index
    pub fn index_url(&self) -> FetchResult<Url> {
        self.join(feed::INDEX_PATH)
    }

    /// URL of a category's article document
    pub fn category_url(&self, category_file: &str) -> FetchResult<Url> {
        self.join(category_file.trim_start_matches('/'))
    }

    fn join(&self, path: &str) -> FetchResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::transport(format!("Cannot build URL for {}: {}", path, e)))
    }
}

impl FeedSource for FeedClient {
    async fn fetch_index(&self) -> FetchResult<CategoryIndex> {
        let url = self.index_url()?;
        self.http_handler.get_json(&url).await
    }

    async fn fetch_articles(&self, category_file: &str) -> FetchResult<CategoryArticles> {
        let url = self.category_url(category_file)?;
        self.http_handler.get_json(&url).await
    }

    async fn fetch_image(&self, url: &str) -> FetchResult<Vec<u8>> {
        let url = Url::parse(url)
            .map_err(|e| FetchError::transport(format!("Invalid image URL {}: {}", url, e)))?;
        self.http_handler.get_bytes(&url).await
    }
}
