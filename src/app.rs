//! Application state management for Quakeview
//!
//! This module contains the main application state, handling keyboard input,
//! feed loading, and state transitions between the browse and detail views.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::api::{error_message, fetch_earthquake_data};
use crate::feeds::{all_feeds, get_feed_by_id, CachedFetcher, Feed, Quake, QuakeCollection};

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while the first feed is fetched
    Loading,
    /// Feed list and earthquake table side by side
    Browsing,
    /// Detail view for the earthquake at this index
    QuakeDetail(usize),
}

/// Which pane of the browse view receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Feeds,
    Quakes,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Pane receiving navigation keys in the browse view
    pub focus: Focus,
    /// Cursor in the feed list
    pub feed_index: usize,
    /// Feed whose data is currently displayed
    pub active_feed: &'static str,
    /// Cursor in the earthquake table
    pub quake_index: usize,
    /// Decoded data for the active feed, if the last load succeeded
    pub collection: Option<QuakeCollection>,
    /// Error message from the last load, if it failed
    pub last_error: Option<String>,
    /// When the active feed was last loaded
    pub last_loaded: Option<DateTime<Local>>,
    /// Feed waiting to be loaded by the main loop
    pub pending_feed: Option<&'static str>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    fetcher: CachedFetcher,
}

impl App {
    /// Creates a new App that will load `initial_feed` first
    pub fn new(fetcher: CachedFetcher, initial_feed: &'static str) -> Self {
        let feed_index = all_feeds()
            .iter()
            .position(|feed| feed.id == initial_feed)
            .unwrap_or(0);

        Self {
            state: AppState::Loading,
            focus: Focus::Quakes,
            feed_index,
            active_feed: initial_feed,
            quake_index: 0,
            collection: None,
            last_error: None,
            last_loaded: None,
            pending_feed: Some(initial_feed),
            should_quit: false,
            show_help: false,
            fetcher,
        }
    }

    /// Returns the total number of feeds
    pub fn feed_count(&self) -> usize {
        all_feeds().len()
    }

    /// Returns the number of earthquakes in the active feed
    pub fn quake_count(&self) -> usize {
        self.collection.as_ref().map_or(0, QuakeCollection::len)
    }

    /// Returns the feed under the feed list cursor
    pub fn selected_feed(&self) -> Option<&'static Feed> {
        all_feeds().get(self.feed_index)
    }

    /// Returns the feed whose data is displayed
    pub fn active_feed(&self) -> Option<&'static Feed> {
        get_feed_by_id(self.active_feed)
    }

    /// Returns the earthquake under the table cursor
    pub fn selected_quake(&self) -> Option<&Quake> {
        self.quake_at(self.quake_index)
    }

    pub fn quake_at(&self, index: usize) -> Option<&Quake> {
        self.collection.as_ref()?.quakes.get(index)
    }

    /// Whether a feed load is waiting
    pub fn is_loading(&self) -> bool {
        self.pending_feed.is_some()
    }

    /// Loads the pending feed, if any
    ///
    /// Runs the fetch to completion; the UI is not redrawn until it returns.
    pub async fn load_pending(&mut self) {
        if let Some(feed) = self.pending_feed.take() {
            let value = fetch_earthquake_data(&self.fetcher, feed).await;
            self.apply_response(feed, &value);
        }
    }

    /// Applies a payload (or error object) returned for `feed`
    pub fn apply_response(&mut self, feed: &'static str, value: &Value) {
        self.active_feed = feed;
        self.quake_index = 0;
        self.last_loaded = Some(Local::now());

        if let Some(message) = error_message(value) {
            self.collection = None;
            self.last_error = Some(message.to_string());
        } else {
            match QuakeCollection::from_geojson(value) {
                Ok(collection) => {
                    self.collection = Some(collection);
                    self.last_error = None;
                }
                Err(e) => {
                    self.collection = None;
                    self.last_error = Some(format!("Unexpected feed format: {}", e));
                }
            }
        }

        if self.state != AppState::Browsing {
            self.state = AppState::Browsing;
        }
    }

    /// Handles keyboard input based on current state
    ///
    /// # Key Bindings
    /// - `q` or `Ctrl-C`: Quit the application
    /// - `Tab`, `h`/`Left`, `l`/`Right`: Switch between feed list and table
    /// - `Up`/`k`, `Down`/`j`: Move selection in the focused pane
    /// - `g`/`G`: Jump to top/bottom of the focused pane
    /// - `Enter`: Load the selected feed, or open the selected earthquake
    /// - `r`: Reload the active feed (served from cache while fresh)
    /// - `Esc`: Go back from detail view, quit from browse view
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Browsing => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab | KeyCode::BackTab => {
                    self.toggle_focus();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.focus = Focus::Feeds;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.focus = Focus::Quakes;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Char('g') => {
                    self.move_selection_to(0);
                }
                KeyCode::Char('G') => {
                    self.move_selection_to(usize::MAX);
                }
                KeyCode::Enter => match self.focus {
                    Focus::Feeds => {
                        if let Some(feed) = self.selected_feed() {
                            self.pending_feed = Some(feed.id);
                        }
                    }
                    Focus::Quakes => {
                        if self.selected_quake().is_some() {
                            self.state = AppState::QuakeDetail(self.quake_index);
                        }
                    }
                },
                KeyCode::Char('r') => {
                    self.pending_feed = Some(self.active_feed);
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::QuakeDetail(index) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    self.quake_index = index;
                    self.state = AppState::Browsing;
                }
                // Step through neighbouring events without leaving the view
                KeyCode::Down | KeyCode::Char('j') => {
                    if index + 1 < self.quake_count() {
                        self.quake_index = index + 1;
                        self.state = AppState::QuakeDetail(index + 1);
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if index > 0 {
                        self.quake_index = index - 1;
                        self.state = AppState::QuakeDetail(index - 1);
                    }
                }
                KeyCode::Char('r') => {
                    self.pending_feed = Some(self.active_feed);
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Feeds => Focus::Quakes,
            Focus::Quakes => Focus::Feeds,
        };
    }

    /// Cursor and length of the focused pane
    fn focused_cursor(&mut self) -> (&mut usize, usize) {
        match self.focus {
            Focus::Feeds => (&mut self.feed_index, all_feeds().len()),
            Focus::Quakes => {
                let count = self.quake_count();
                (&mut self.quake_index, count)
            }
        }
    }

    /// Moves the selection up, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let (cursor, count) = self.focused_cursor();
        if count == 0 {
            return;
        }
        *cursor = if *cursor == 0 { count - 1 } else { *cursor - 1 };
    }

    /// Moves the selection down, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let (cursor, count) = self.focused_cursor();
        if count == 0 {
            return;
        }
        *cursor = (*cursor + 1) % count;
    }

    /// Moves the selection to `index`, clamped to the last entry
    fn move_selection_to(&mut self, index: usize) {
        let (cursor, count) = self.focused_cursor();
        if count == 0 {
            return;
        }
        *cursor = index.min(count - 1);
    }
}
