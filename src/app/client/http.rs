//! Core HTTP operations with rate limiting
//!
//! Requests are paced by a governor rate limiter and are never retried here;
//! a failed fetch is reported to the caller, which decides whether it matters.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::constants::limits;
use crate::errors::{ConfigError, ConfigResult, FetchError, FetchResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the rate limit is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> ConfigResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> ConfigResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "client.rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Fetch a response body as bytes
    ///
    /// A non-success status is a transport error; an empty body is a decode
    /// error.
    pub async fn get_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(
                limits::RATE_LIMIT_JITTER_MS,
            )))
            .await;

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            FetchError::transport(format!("GET {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(FetchError::transport(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }

        let body = response.bytes().await.map_err(FetchError::from)?;
        if body.is_empty() {
            return Err(FetchError::decode(format!("Empty response body from {}", url)));
        }

        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }

    /// Fetch and decode a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> FetchResult<T> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body)
            .map_err(|e| FetchError::decode(format!("Invalid JSON from {}: {}", url, e)))
    }
}
