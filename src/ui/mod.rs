//! UI rendering module for Quakeview
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod quake_detail;
pub mod quake_list;

pub use help_overlay::render as render_help_overlay;
pub use quake_detail::render as render_quake_detail;
pub use quake_list::render as render_quake_list;

use chrono::{DateTime, Utc};
use ratatui::style::Color;

/// Color for an earthquake magnitude (stronger = more red)
pub fn magnitude_color(magnitude: Option<f64>) -> Color {
    match magnitude {
        Some(m) if m >= 6.0 => Color::Red,
        Some(m) if m >= 4.5 => Color::LightRed,
        Some(m) if m >= 2.5 => Color::Yellow,
        Some(m) if m >= 1.0 => Color::Green,
        Some(_) => Color::Cyan,
        None => Color::Gray,
    }
}

/// Formats how long ago `time` was, relative to `now` (e.g. "5m ago", "3h ago")
pub fn format_age(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - time).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
