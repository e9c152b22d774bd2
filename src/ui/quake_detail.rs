//! Earthquake detail screen rendering

use chrono::{Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{format_age, magnitude_color};
use crate::app::App;
use crate::feeds::Quake;

/// Renders the detail view for the earthquake at `index`
pub fn render(frame: &mut Frame, app: &App, index: usize) {
    let area = frame.area();

    let Some(quake) = app.quake_at(index) else {
        render_no_data(frame, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" M{} - {} ", quake.magnitude_label(), quake.place),
            Style::default()
                .fg(magnitude_color(quake.magnitude))
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner_area);

    let paragraph = Paragraph::new(build_detail_lines(quake)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[0]);

    let position = format!("Event {}/{}  ", index + 1, app.quake_count());
    let help = Line::from(vec![
        Span::styled(position, Style::default().fg(Color::Gray)),
        Span::styled(
            "↑↓: prev/next  Esc: back  r: reload  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(help), chunks[1]);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

/// Builds the labelled lines describing one event
fn build_detail_lines(quake: &Quake) -> Vec<Line<'static>> {
    let magnitude = match &quake.magnitude_type {
        Some(kind) => format!("{} ({})", quake.magnitude_label(), kind),
        None => quake.magnitude_label(),
    };

    let time = match quake.time {
        Some(t) => format!(
            "{} ({})",
            t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z"),
            format_age(t, Utc::now())
        ),
        None => "Unknown".to_string(),
    };

    let tsunami = if quake.tsunami {
        Span::styled("Yes", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("No")
    };

    let alert_style = match quake.alert.as_deref() {
        Some("red") => Style::default().fg(Color::Red),
        Some("orange") => Style::default().fg(Color::LightRed),
        Some("yellow") => Style::default().fg(Color::Yellow),
        Some("green") => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Gray),
    };

    vec![
        Line::from(""),
        field("Magnitude", magnitude),
        field("Location", quake.place.clone()),
        field("Time", time),
        field(
            "Coordinates",
            format!("{:.3}, {:.3}", quake.latitude, quake.longitude),
        ),
        field("Depth", format!("{:.1} km", quake.depth_km)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Tsunami"), Style::default().fg(Color::Cyan)),
            tsunami,
        ]),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Alert"), Style::default().fg(Color::Cyan)),
            Span::styled(quake.alert.clone().unwrap_or_else(|| "None".to_string()), alert_style),
        ]),
        field(
            "Felt reports",
            quake.felt.map_or_else(|| "-".to_string(), |n| n.to_string()),
        ),
        field(
            "Significance",
            quake.significance.map_or_else(|| "-".to_string(), |n| n.to_string()),
        ),
        Line::from(""),
        field("Event id", quake.id.clone()),
        field("Details", quake.url.clone().unwrap_or_else(|| "-".to_string())),
    ]
}

/// Renders a placeholder when the event is no longer available
fn render_no_data(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Earthquake not found. Press Esc to go back.")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
