//! USGS earthquake feeds
//!
//! This module contains the static feed catalog, the cached fetcher that
//! serves feed payloads, and the typed earthquake view models used by the UI.

pub mod catalog;
pub mod fetcher;
pub mod quake;

pub use catalog::{all_feeds, get_feed_by_id, FeedCatalog, USGS_BASE_URL};
pub use fetcher::{
    CacheLookup, CachedFetcher, FetchError, FetcherConfig, DEFAULT_CACHE_DIR, DEFAULT_TIMEOUT,
    DEFAULT_TTL,
};
pub use quake::{Quake, QuakeCollection};

use serde::Serialize;

/// A USGS summary feed: a magnitude threshold over a time window
///
/// Uses `&'static str` for the identifier so the catalog can be a static
/// array, the same way the feed ids are handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feed {
    /// Feed identifier, e.g. "4.5_day"
    pub id: &'static str,
    /// Minimum magnitude (or significance) of events in the feed
    pub threshold: Threshold,
    /// Time window covered by the feed
    pub window: Window,
}

impl Feed {
    /// Human-readable description, e.g. "M4.5+ earthquakes, past day"
    pub fn description(&self) -> String {
        format!(
            "{} earthquakes, {}",
            self.threshold.label(),
            self.window.label()
        )
    }
}

/// Magnitude threshold of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Threshold {
    /// Events USGS flags as significant, regardless of magnitude
    Significant,
    M4_5,
    M2_5,
    M1_0,
    /// Every recorded event
    All,
}

impl Threshold {
    pub fn label(&self) -> &'static str {
        match self {
            Threshold::Significant => "Significant",
            Threshold::M4_5 => "M4.5+",
            Threshold::M2_5 => "M2.5+",
            Threshold::M1_0 => "M1.0+",
            Threshold::All => "All",
        }
    }
}

/// Time window of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Window {
    Hour,
    Day,
    Week,
    Month,
}

impl Window {
    pub fn label(&self) -> &'static str {
        match self {
            Window::Hour => "past hour",
            Window::Day => "past day",
            Window::Week => "past 7 days",
            Window::Month => "past 30 days",
        }
    }
}
