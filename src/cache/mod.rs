//! Cache module for storing feed responses
//!
//! This module provides the key-value stores the cached fetcher writes raw
//! response bodies through, plus the cache key derivation and freshness rule.
//! Entries carry no explicit expiry; an entry is fresh while its age (taken
//! from the store, e.g. file modification time) is strictly below the TTL.

mod store;

pub use store::{CacheStore, FileStore, MemoryStore};

use std::time::Duration;

/// Derives the cache key for a feed URL
///
/// The key is an MD5 hex digest of the URL, which keeps it filesystem-safe
/// and stable across runs.
pub fn cache_key(url: &str) -> String {
    format!("earthquake_data_{:x}", md5::compute(url.as_bytes()))
}

/// Returns true if an entry of the given age is still fresh
pub fn is_fresh(age: Duration, ttl: Duration) -> bool {
    age < ttl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_deterministic() {
        let url = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";
        assert_eq!(cache_key(url), cache_key(url));
    }

    #[test]
    fn test_cache_key_format() {
        // md5("") is a well-known constant
        assert_eq!(cache_key(""), "earthquake_data_d41d8cd98f00b204e9800998ecf8427e");

        let key = cache_key("https://example.com/feed.geojson");
        let digest = key.strip_prefix("earthquake_data_").expect("prefix");
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_cache_key_differs_per_url() {
        assert_ne!(
            cache_key("https://example.com/all_day.geojson"),
            cache_key("https://example.com/all_week.geojson")
        );
    }

    #[test]
    fn test_is_fresh_below_ttl() {
        let ttl = Duration::from_secs(3600);
        assert!(is_fresh(Duration::ZERO, ttl));
        assert!(is_fresh(Duration::from_secs(10), ttl));
        assert!(is_fresh(Duration::from_millis(3_599_999), ttl));
    }

    #[test]
    fn test_is_fresh_expires_exactly_at_ttl() {
        let ttl = Duration::from_secs(3600);
        assert!(!is_fresh(ttl, ttl));
        assert!(!is_fresh(Duration::from_secs(3601), ttl));
    }
}
