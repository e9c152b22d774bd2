//! Operations exposed to the presentation layer
//!
//! Both operations always return a value: failures from the fetcher are
//! turned into `{"error": "<message>"}` objects rather than propagated.

use serde_json::Value;
use tracing::warn;

use crate::cache::CacheStore;
use crate::feeds::{all_feeds, CachedFetcher};

/// Feed shown when the caller does not choose one
pub const DEFAULT_FEED: &str = "all_day";

/// Returns the GeoJSON payload for `feed_type`, or an error object
pub async fn fetch_earthquake_data<S: CacheStore>(
    fetcher: &CachedFetcher<S>,
    feed_type: &str,
) -> Value {
    match fetcher.get_data(feed_type).await {
        Ok(data) => data,
        Err(e) => {
            warn!(feed = feed_type, error = %e, "Returning error result");
            e.to_json()
        }
    }
}

/// Returns the available feed identifiers in catalog order
pub fn get_available_feeds() -> Vec<String> {
    all_feeds().iter().map(|feed| feed.id.to_string()).collect()
}

/// Extracts the message from an error object returned by `fetch_earthquake_data`
pub fn error_message(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}
