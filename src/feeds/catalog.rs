//! Static catalog of USGS summary feeds
//!
//! Maps feed identifiers such as "2.5_week" to the provider's GeoJSON summary
//! URLs. The table is fixed; its order is the order handed to the UI.

use super::{Feed, Threshold, Window};

/// Host serving the USGS summary feeds
pub const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Path under the host where summary feeds live
const SUMMARY_PATH: &str = "/earthquakes/feed/v1.0/summary";

/// All available feeds, ordered by threshold then window
pub static FEEDS: [Feed; 20] = [
    Feed {
        id: "significant_hour",
        threshold: Threshold::Significant,
        window: Window::Hour,
    },
    Feed {
        id: "significant_day",
        threshold: Threshold::Significant,
        window: Window::Day,
    },
    Feed {
        id: "significant_week",
        threshold: Threshold::Significant,
        window: Window::Week,
    },
    Feed {
        id: "significant_month",
        threshold: Threshold::Significant,
        window: Window::Month,
    },
    Feed {
        id: "4.5_hour",
        threshold: Threshold::M4_5,
        window: Window::Hour,
    },
    Feed {
        id: "4.5_day",
        threshold: Threshold::M4_5,
        window: Window::Day,
    },
    Feed {
        id: "4.5_week",
        threshold: Threshold::M4_5,
        window: Window::Week,
    },
    Feed {
        id: "4.5_month",
        threshold: Threshold::M4_5,
        window: Window::Month,
    },
    Feed {
        id: "2.5_hour",
        threshold: Threshold::M2_5,
        window: Window::Hour,
    },
    Feed {
        id: "2.5_day",
        threshold: Threshold::M2_5,
        window: Window::Day,
    },
    Feed {
        id: "2.5_week",
        threshold: Threshold::M2_5,
        window: Window::Week,
    },
    Feed {
        id: "2.5_month",
        threshold: Threshold::M2_5,
        window: Window::Month,
    },
    Feed {
        id: "1.0_hour",
        threshold: Threshold::M1_0,
        window: Window::Hour,
    },
    Feed {
        id: "1.0_day",
        threshold: Threshold::M1_0,
        window: Window::Day,
    },
    Feed {
        id: "1.0_week",
        threshold: Threshold::M1_0,
        window: Window::Week,
    },
    Feed {
        id: "1.0_month",
        threshold: Threshold::M1_0,
        window: Window::Month,
    },
    Feed {
        id: "all_hour",
        threshold: Threshold::All,
        window: Window::Hour,
    },
    Feed {
        id: "all_day",
        threshold: Threshold::All,
        window: Window::Day,
    },
    Feed {
        id: "all_week",
        threshold: Threshold::All,
        window: Window::Week,
    },
    Feed {
        id: "all_month",
        threshold: Threshold::All,
        window: Window::Month,
    },
];

/// Returns all feeds in catalog order
pub fn all_feeds() -> &'static [Feed] {
    &FEEDS
}

/// Get a feed by its identifier
///
/// # Example
///
/// ```
/// use quakeview::feeds::get_feed_by_id;
///
/// if let Some(feed) = get_feed_by_id("4.5_week") {
///     println!("Found: {}", feed.description());
/// }
/// ```
pub fn get_feed_by_id(id: &str) -> Option<&'static Feed> {
    FEEDS.iter().find(|feed| feed.id == id)
}

/// Resolves feed identifiers to provider URLs
///
/// The host is configurable so tests can point the catalog at a local server;
/// the identifier table itself never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCatalog {
    base_url: String,
}

impl Default for FeedCatalog {
    fn default() -> Self {
        Self::usgs()
    }
}

impl FeedCatalog {
    /// Catalog pointing at the public USGS host
    pub fn usgs() -> Self {
        Self::with_base_url(USGS_BASE_URL)
    }

    /// Catalog pointing at a custom host (e.g. a mock server)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a feed identifier to its GeoJSON URL
    ///
    /// Returns `None` if the identifier is not in the catalog.
    pub fn resolve(&self, feed_id: &str) -> Option<String> {
        let feed = get_feed_by_id(feed_id)?;
        Some(format!("{}{}/{}.geojson", self.base_url, SUMMARY_PATH, feed.id))
    }

    /// Feed identifiers in catalog order
    pub fn list_feed_ids(&self) -> Vec<&'static str> {
        FEEDS.iter().map(|feed| feed.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_twenty_feeds() {
        assert_eq!(all_feeds().len(), 20);
    }

    #[test]
    fn test_feed_ids_are_unique() {
        let ids = FeedCatalog::usgs().list_feed_ids();
        for (i, a) in ids.iter().enumerate() {
            for b in ids.iter().skip(i + 1) {
                assert_ne!(a, b, "Duplicate feed id {}", a);
            }
        }
    }

    #[test]
    fn test_list_feed_ids_order() {
        let ids = FeedCatalog::usgs().list_feed_ids();
        assert_eq!(
            ids,
            vec![
                "significant_hour",
                "significant_day",
                "significant_week",
                "significant_month",
                "4.5_hour",
                "4.5_day",
                "4.5_week",
                "4.5_month",
                "2.5_hour",
                "2.5_day",
                "2.5_week",
                "2.5_month",
                "1.0_hour",
                "1.0_day",
                "1.0_week",
                "1.0_month",
                "all_hour",
                "all_day",
                "all_week",
                "all_month",
            ]
        );
    }

    #[test]
    fn test_resolve_known_feed() {
        let catalog = FeedCatalog::usgs();
        assert_eq!(
            catalog.resolve("4.5_day").as_deref(),
            Some("https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_day.geojson")
        );
    }

    #[test]
    fn test_every_feed_resolves_to_summary_url() {
        let catalog = FeedCatalog::usgs();
        for id in catalog.list_feed_ids() {
            let url = catalog.resolve(id).expect("listed feed should resolve");
            assert!(url.starts_with("https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/"));
            assert!(url.ends_with(&format!("/{}.geojson", id)));
        }
    }

    #[test]
    fn test_resolve_unknown_feed_returns_none() {
        let catalog = FeedCatalog::usgs();
        assert!(catalog.resolve("bogus_feed").is_none());
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("ALL_DAY").is_none());
        assert!(catalog.resolve("all_day.geojson").is_none());
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let catalog = FeedCatalog::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(catalog.base_url(), "http://127.0.0.1:9999");
        assert_eq!(
            catalog.resolve("all_hour").as_deref(),
            Some("http://127.0.0.1:9999/earthquakes/feed/v1.0/summary/all_hour.geojson")
        );
    }

    #[test]
    fn test_get_feed_by_id() {
        let feed = get_feed_by_id("2.5_week").expect("feed should exist");
        assert_eq!(feed.threshold, Threshold::M2_5);
        assert_eq!(feed.window, Window::Week);
        assert!(get_feed_by_id("3.0_week").is_none());
    }
}
