//! Cached fetcher for USGS feed payloads
//!
//! Resolves a feed identifier through the catalog, serves the response body
//! from the cache while it is fresh, and otherwise fetches it from the
//! provider and rewrites the cache entry.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::FeedCatalog;
use crate::cache::{cache_key, is_fresh, CacheStore, FileStore};

/// Maximum age of a cache entry before it is refetched
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Upper bound on a single provider request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache directory, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Errors returned by the cached fetcher
///
/// The `Display` strings are the messages handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The feed identifier is not in the catalog
    #[error("Invalid feed type: {0}")]
    InvalidFeed(String),

    /// The provider request failed (timeout, connection, status or body)
    #[error("Failed to fetch earthquake data: {0}")]
    Request(String),
}

impl FetchError {
    /// Renders the error as `{"error": "<message>"}`
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A fresh entry that parsed as JSON
    Valid(Value),
    /// Missing, stale, unreadable or unparseable
    Invalid,
}

/// Settings for a file-backed fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Directory holding one file per feed URL
    pub cache_dir: PathBuf,
    /// How long an entry stays fresh
    pub ttl: Duration,
    /// Upper bound on a provider request
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches feed payloads through a cache
///
/// Each call runs to completion before returning. There is no in-memory
/// layer and no de-duplication of concurrent fetches for the same feed.
#[derive(Debug)]
pub struct CachedFetcher<S = FileStore> {
    catalog: FeedCatalog,
    store: S,
    http_client: Client,
    ttl: Duration,
    timeout: Duration,
}

impl CachedFetcher<FileStore> {
    /// Creates a fetcher that caches to `config.cache_dir`
    pub fn new(catalog: FeedCatalog, config: FetcherConfig) -> Self {
        Self::with_store(catalog, FileStore::new(config.cache_dir), config.ttl)
            .with_timeout(config.timeout)
    }
}

impl<S: CacheStore> CachedFetcher<S> {
    /// Creates a fetcher over an arbitrary store
    pub fn with_store(catalog: FeedCatalog, store: S, ttl: Duration) -> Self {
        Self {
            catalog,
            store,
            http_client: Client::new(),
            ttl,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for a feed, from cache if fresh, else from the provider
    ///
    /// # Behavior
    /// - Unknown identifiers fail with `InvalidFeed` before touching the
    ///   store or the network
    /// - A fresh entry that parses is returned without a request
    /// - A missing, stale or corrupt entry triggers a fetch; the body is
    ///   written to the store verbatim and the parsed value returned
    /// - Timeouts, connection failures, non-success statuses and non-JSON
    ///   bodies all fail with `Request`
    pub async fn get_data(&self, feed_id: &str) -> Result<Value, FetchError> {
        let url = self
            .catalog
            .resolve(feed_id)
            .ok_or_else(|| FetchError::InvalidFeed(feed_id.to_string()))?;
        let key = cache_key(&url);

        if let Err(e) = self.store.ensure_ready() {
            warn!(error = %e, "Cache storage unavailable");
        }

        match self.lookup(&key) {
            CacheLookup::Valid(data) => {
                debug!(feed = feed_id, key = %key, "Cache hit");
                return Ok(data);
            }
            CacheLookup::Invalid => {
                debug!(feed = feed_id, key = %key, "Cache miss");
            }
        }

        self.fetch_and_store(feed_id, &url, &key).await
    }

    /// Checks the store for a fresh, parseable entry
    pub fn lookup(&self, key: &str) -> CacheLookup {
        let Some(age) = self.store.age(key) else {
            return CacheLookup::Invalid;
        };
        if !is_fresh(age, self.ttl) {
            debug!(key, age_secs = age.as_secs(), "Cache entry expired");
            return CacheLookup::Invalid;
        }
        let Some(bytes) = self.store.get(key) else {
            debug!(key, "Cache entry unreadable");
            return CacheLookup::Invalid;
        };
        match serde_json::from_slice(&bytes) {
            Ok(data) => CacheLookup::Valid(data),
            Err(e) => {
                debug!(key, error = %e, "Cache entry corrupt");
                CacheLookup::Invalid
            }
        }
    }

    /// Fetches from the provider and rewrites the cache entry
    async fn fetch_and_store(&self, feed_id: &str, url: &str, key: &str) -> Result<Value, FetchError> {
        info!(feed = feed_id, url, "Fetching feed");

        let body = self
            .fetch_body(url)
            .await
            .inspect_err(|e| warn!(feed = feed_id, error = %e, "Feed fetch failed"))?;

        let data: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(feed = feed_id, error = %e, "Feed response is not JSON");
            FetchError::Request(format!("invalid JSON in response from {}: {}", url, e))
        })?;

        if let Err(e) = self.store.put(key, &body) {
            warn!(feed = feed_id, key, error = %e, "Failed to write cache entry");
        }

        info!(feed = feed_id, bytes = body.len(), "Feed fetched");
        Ok(data)
    }

    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
