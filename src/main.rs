//! Quakeview - Browse recent earthquakes from the USGS feeds
//!
//! A terminal UI application that lists earthquakes from the USGS summary
//! feeds, caching each feed response on disk for an hour.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::signal;
use tracing::{info, warn};

use quakeview::api::{error_message, fetch_earthquake_data, get_available_feeds};
use quakeview::app::{App, AppState};
use quakeview::cli::{parse_feed_arg, Cli, Mode, StartupConfig};
use quakeview::feeds::CachedFetcher;
use quakeview::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Loading => render_loading(frame, app),
        AppState::Browsing => ui::render_quake_list(frame, app),
        AppState::QuakeDetail(index) => ui::render_quake_detail(frame, app, index),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while the first feed is fetched
fn render_loading(frame: &mut ratatui::Frame, app: &App) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(format!("Loading {} earthquakes...", app.active_feed))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Wait for an interrupt or terminate signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Prints one feed payload (or error object) as JSON
async fn run_json(config: StartupConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let fetcher = CachedFetcher::new(config.catalog, config.fetcher);

    let value = tokio::select! {
        value = fetch_earthquake_data(&fetcher, &config.feed) => value,
        _ = shutdown_signal() => {
            info!("Interrupted before the feed was fetched");
            return Ok(ExitCode::SUCCESS);
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);

    if error_message(&value).is_some() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Runs the interactive terminal UI until the user quits or a signal arrives
async fn run_browser(config: StartupConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let initial_feed = parse_feed_arg(&config.feed)?;
    let fetcher = CachedFetcher::new(config.catalog, config.fetcher);
    let mut app = App::new(fetcher, initial_feed);

    let terminated = Arc::new(AtomicBool::new(false));
    {
        let terminated = Arc::clone(&terminated);
        tokio::spawn(async move {
            shutdown_signal().await;
            terminated.store(true, Ordering::SeqCst);
        });
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(feed = initial_feed, "Session started");

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        // Fetches block the loop; the status line already shows the request
        if app.is_loading() {
            app.load_pending().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit || terminated.load(Ordering::SeqCst) {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("Session ended");
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    match config.mode {
        Mode::ListFeeds => {
            for feed in get_available_feeds() {
                println!("{}", feed);
            }
            Ok(ExitCode::SUCCESS)
        }
        Mode::Json => {
            logging::init_stderr_logging(cli.debug, cli.verbose);
            run_json(config).await
        }
        Mode::Browse => {
            let _guard = logging::init_file_logging(cli.debug, cli.verbose);
            run_browser(config).await
        }
    }
}
