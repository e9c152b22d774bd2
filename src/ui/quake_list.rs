//! Browse screen rendering
//!
//! Renders the feed list next to the earthquake table for the active feed,
//! with a header summarising the feed and a footer with key hints.

use chrono::{Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::{format_age, magnitude_color};
use crate::app::{App, Focus};
use crate::feeds::{all_feeds, Quake};

/// Width of the feed list pane
const FEED_PANE_WIDTH: u16 = 24;

/// Renders the browse screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing feed data and selection
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(3),    // Panes
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FEED_PANE_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_feeds(frame, app, panes[0]);
    render_quakes(frame, app, panes[1]);
    render_help(frame, app, chunks[2]);
}

/// Border style for a pane, highlighted when focused
fn pane_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let time_str = Local::now().format("%a %b %d, %H:%M").to_string();
    let feed_str = app
        .active_feed()
        .map(|feed| feed.description())
        .unwrap_or_else(|| app.active_feed.to_string());

    let summary = match &app.collection {
        Some(collection) => {
            let max = collection
                .max_magnitude()
                .map(|m| format!(", max M{:.1}", m))
                .unwrap_or_default();
            let plural = if collection.len() == 1 { "" } else { "s" };
            format!("{} event{}{}", collection.len(), plural, max)
        }
        None => String::new(),
    };

    let separator = "─".repeat(area.width as usize);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "QUAKEVIEW",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(time_str, Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(feed_str, Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(summary, Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feeds(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = all_feeds()
        .iter()
        .map(|feed| {
            let is_active = feed.id == app.active_feed;
            let marker = if is_active { "● " } else { "  " };
            let style = if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(feed.id, style),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(" Feeds ")
        .borders(Borders::ALL)
        .border_style(pane_style(app.focus == Focus::Feeds));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶");

    let mut state = ListState::default().with_selected(Some(app.feed_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_quakes(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.active_feed))
        .borders(Borders::ALL)
        .border_style(pane_style(app.focus == Focus::Quakes));

    if let Some(message) = &app.last_error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let quakes = match &app.collection {
        Some(collection) if !collection.is_empty() => &collection.quakes,
        Some(_) => {
            let paragraph = Paragraph::new("No earthquakes in this feed").block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        None => {
            let paragraph = Paragraph::new("No data loaded").block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let header = Row::new(["Mag", "Place", "Time", "Depth"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let now = Utc::now();
    let rows: Vec<Row> = quakes.iter().map(|quake| quake_row(quake, now)).collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.quake_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn quake_row(quake: &Quake, now: chrono::DateTime<Utc>) -> Row<'static> {
    let time = quake
        .time
        .map(|t| format_age(t, now))
        .unwrap_or_else(|| "?".to_string());

    Row::new(vec![
        Cell::from(quake.magnitude_label())
            .style(Style::default().fg(magnitude_color(quake.magnitude))),
        Cell::from(quake.place.clone()),
        Cell::from(time),
        Cell::from(format!("{:.1} km", quake.depth_km)),
    ])
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(feed) = app.pending_feed {
        Span::styled(
            format!("Loading {}...", feed),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(loaded) = app.last_loaded {
        Span::styled(
            format!("Updated {}", loaded.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(
            "Tab: switch  ↑↓: move  Enter: open  r: reload  ?: help  q: quit  ",
            Style::default().fg(Color::DarkGray),
        ),
        status,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{CachedFetcher, FeedCatalog, FetcherConfig};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = FetcherConfig {
            cache_dir: temp_dir.path().to_path_buf(),
            ..FetcherConfig::default()
        };
        let fetcher = CachedFetcher::new(FeedCatalog::with_base_url("http://127.0.0.1:9"), config);
        let mut app = App::new(fetcher, "all_day");
        app.pending_feed = None;
        (app, temp_dir)
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_feed_list_and_quakes() {
        let (mut app, _temp_dir) = test_app();
        app.apply_response(
            "all_day",
            &json!({
                "type": "FeatureCollection",
                "features": [{
                    "id": "nc123",
                    "properties": { "mag": 3.4, "place": "5km N of Petrolia, CA", "time": 1_700_000_000_000_i64 },
                    "geometry": { "coordinates": [-124.3, 40.4, 21.0] }
                }]
            }),
        );

        let content = render_to_string(&app);

        assert!(content.contains("QUAKEVIEW"));
        assert!(content.contains("Feeds"));
        assert!(content.contains("significant_hour"));
        assert!(content.contains("Petrolia"));
        assert!(content.contains("3.4"));
        assert!(content.contains("1 event,"));
    }

    #[test]
    fn test_renders_error_message() {
        let (mut app, _temp_dir) = test_app();
        app.apply_response(
            "all_day",
            &json!({ "error": "Failed to fetch earthquake data: connection refused" }),
        );

        let content = render_to_string(&app);

        assert!(content.contains("Failed to fetch earthquake data"));
    }

    #[test]
    fn test_renders_empty_feed_message() {
        let (mut app, _temp_dir) = test_app();
        app.apply_response("all_hour", &json!({ "type": "FeatureCollection", "features": [] }));

        let content = render_to_string(&app);

        assert!(content.contains("No earthquakes in this feed"));
    }

    #[test]
    fn test_renders_loading_status() {
        let (mut app, _temp_dir) = test_app();
        app.apply_response("all_day", &json!({ "type": "FeatureCollection", "features": [] }));
        app.pending_feed = Some("4.5_week");

        let content = render_to_string(&app);

        assert!(content.contains("Loading 4.5_week"));
    }
}
