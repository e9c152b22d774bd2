//! Command-line interface parsing for Quakeview
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the configuration the fetcher and UI start with.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::DEFAULT_FEED;
use crate::feeds::{get_feed_by_id, FeedCatalog, FetcherConfig, DEFAULT_CACHE_DIR, USGS_BASE_URL};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified feed identifier is not in the catalog
    #[error("Invalid feed: '{0}'. Run with --list-feeds to see available feeds")]
    InvalidFeed(String),

    /// A duration argument was zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Quakeview - Browse recent earthquakes from the USGS feeds
#[derive(Parser, Debug)]
#[command(name = "quakeview")]
#[command(about = "Browse recent USGS earthquake feeds in the terminal")]
#[command(version)]
pub struct Cli {
    /// Feed to open first, e.g. all_day, 4.5_week, significant_month
    #[arg(long, env = "QUAKEVIEW_FEED", default_value = DEFAULT_FEED, value_name = "FEED")]
    pub feed: String,

    /// Directory holding cached feed responses
    #[arg(long, env = "QUAKEVIEW_CACHE_DIR", default_value = DEFAULT_CACHE_DIR, value_name = "PATH")]
    pub cache_dir: PathBuf,

    /// Seconds a cached response stays fresh
    #[arg(long, env = "QUAKEVIEW_TTL", default_value_t = 3600, value_name = "SECS")]
    pub ttl: u64,

    /// Seconds to wait for the provider before giving up
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Provider host serving the summary feeds
    #[arg(long, env = "QUAKEVIEW_BASE_URL", default_value = USGS_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Print the feed payload as JSON and exit instead of starting the UI
    #[arg(long, conflicts_with = "list_feeds")]
    pub json: bool,

    /// Print the available feed identifiers and exit
    #[arg(long)]
    pub list_feeds: bool,

    /// Log fetch and cache activity
    #[arg(short, long)]
    pub verbose: bool,

    /// Log everything, including cache hits and misses
    #[arg(long)]
    pub debug: bool,
}

/// What the process should do after parsing arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive terminal UI
    Browse,
    /// One-shot JSON dump of a feed
    Json,
    /// Print feed identifiers
    ListFeeds,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub mode: Mode,
    /// Feed requested on the command line (validated except in JSON mode)
    pub feed: String,
    pub catalog: FeedCatalog,
    pub fetcher: FetcherConfig,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Browse,
            feed: DEFAULT_FEED.to_string(),
            catalog: FeedCatalog::usgs(),
            fetcher: FetcherConfig::default(),
        }
    }
}

/// Checks a feed argument against the catalog
///
/// # Returns
/// * `Ok(&'static str)` with the catalog's identifier
/// * `Err(CliError::InvalidFeed)` if the identifier is unknown
pub fn parse_feed_arg(s: &str) -> Result<&'static str, CliError> {
    get_feed_by_id(s)
        .map(|feed| feed.id)
        .ok_or_else(|| CliError::InvalidFeed(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// JSON mode passes unknown feeds through so the caller sees the same
    /// `{"error": ...}` object the UI would.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mode = if cli.list_feeds {
            Mode::ListFeeds
        } else if cli.json {
            Mode::Json
        } else {
            Mode::Browse
        };

        if mode == Mode::Browse {
            parse_feed_arg(&cli.feed)?;
        }
        if cli.ttl == 0 {
            return Err(CliError::ZeroDuration("--ttl"));
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroDuration("--timeout"));
        }

        Ok(StartupConfig {
            mode,
            feed: cli.feed.clone(),
            catalog: FeedCatalog::with_base_url(cli.base_url.as_str()),
            fetcher: FetcherConfig {
                cache_dir: cli.cache_dir.clone(),
                ttl: Duration::from_secs(cli.ttl),
                timeout: Duration::from_secs(cli.timeout),
            },
        })
    }
}
