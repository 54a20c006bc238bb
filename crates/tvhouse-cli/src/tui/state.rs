//! Browser state management.

use std::ops::Range;

use tvhouse_catalog::{CatalogSource, Channel, IconSource, LoadedCatalog};

use crate::nav::{Navigator, Route};

/// Status of the player shown on the player screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No session.
    Idle,
    /// Player process is running.
    Playing,
    /// Player process has exited.
    Exited,
    /// Playback could not be started.
    Failed(String),
}

/// Result of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserExit {
    /// Reload the catalog and resume.
    Reload,
    /// Leave the application.
    Quit,
}

/// State for the channel browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Channels in catalog order.
    pub channels: Vec<Channel>,
    /// Where the channels were loaded from.
    pub source: Option<CatalogSource>,
    /// Why the remote fetch failed, if it did.
    pub fetch_error: Option<String>,
    /// Index of the highlighted card.
    pub cursor: usize,
    /// Screen navigation.
    pub nav: Navigator,
    /// Player status for the player screen.
    pub player_status: PlayerStatus,
    /// Channel opened on the player screen.
    playing: Option<Channel>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates an empty state on the home screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            source: None,
            fetch_error: None,
            cursor: 0,
            nav: Navigator::default(),
            player_status: PlayerStatus::Idle,
            playing: None,
        }
    }

    /// Replaces the catalog, keeping the cursor in range.
    pub fn set_catalog(&mut self, loaded: LoadedCatalog) {
        self.channels = loaded.channels;
        self.source = Some(loaded.source);
        self.fetch_error = loaded.fetch_error.map(|e| e.to_string());
        self.cursor = self.cursor.min(self.channels.len().saturating_sub(1));
    }

    /// Moves the cursor one card left.
    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one card right.
    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.channels.len() {
            self.cursor += 1;
        }
    }

    /// Highlighted channel.
    #[must_use]
    pub fn selected_channel(&self) -> Option<&Channel> {
        self.channels.get(self.cursor)
    }

    /// Channel playing on the player screen.
    #[must_use]
    pub fn playing_channel(&self) -> Option<&Channel> {
        match self.nav.current() {
            Route::Player { url } => self.playing.as_ref().filter(|c| &c.url == url),
            Route::Home => None,
        }
    }

    /// Whether the player screen is shown.
    #[must_use]
    pub fn on_player(&self) -> bool {
        matches!(self.nav.current(), Route::Player { .. })
    }

    /// Opens the player screen for the highlighted channel.
    ///
    /// Returns the stream URL to play.
    pub fn open_selected(&mut self) -> Option<String> {
        let channel = self.selected_channel()?.clone();
        let url = channel.url.clone();
        self.nav.navigate(Route::Player { url: url.clone() });
        self.playing = Some(channel);
        self.player_status = PlayerStatus::Idle;
        Some(url)
    }

    /// Returns to the home screen.
    pub fn close_player(&mut self) {
        self.nav.back();
        self.playing = None;
        self.player_status = PlayerStatus::Idle;
    }

    /// Range of cards that fit in `capacity` slots, keeping the cursor visible.
    #[must_use]
    pub fn visible_window(&self, capacity: usize) -> Range<usize> {
        let len = self.channels.len();
        if capacity == 0 || len == 0 {
            return 0..0;
        }
        if len <= capacity {
            return 0..len;
        }
        let start = self
            .cursor
            .saturating_sub(capacity - 1)
            .min(len - capacity);
        start..start + capacity
    }

    /// Header line describing catalog provenance.
    #[must_use]
    pub fn provenance(&self) -> String {
        match (&self.source, &self.fetch_error) {
            (None, _) => String::from("loading..."),
            (Some(source), None) => format!("{} channels from {source}", self.channels.len()),
            (Some(source), Some(err)) => {
                format!("{} channels from {source} ({err})", self.channels.len())
            }
        }
    }
}

/// Short label for an icon source.
#[must_use]
pub fn icon_label(channel: &Channel) -> String {
    match channel.icon_source() {
        IconSource::Resource(name) => format!("[{name}]"),
        IconSource::Remote(url) => format!("[{}]", url.host_str().unwrap_or("remote")),
    }
}
