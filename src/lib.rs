//! Quakeview library
//!
//! Fetches USGS earthquake feeds through an on-disk cache and presents them
//! in a terminal UI. The library modules are exposed for integration tests.

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod feeds;
pub mod logging;
pub mod ui;
