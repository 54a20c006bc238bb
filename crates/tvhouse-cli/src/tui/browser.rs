//! Channel browser TUI main loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tvhouse_catalog::{CatalogApi, CatalogLoader};
use tvhouse_player::{MediaPlayer, PlaybackSession, PlayerBackend, VideoSurface};

use super::state::{BrowserExit, BrowserState, PlayerStatus};
use super::ui;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Left,
    Right,
    Play,
    Back,
    Reload,
    Quit,
}

/// Runs the channel browser until the user quits.
///
/// The catalog is loaded on entry and again on every reload request.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<C, B>(
    loader: &CatalogLoader<C>,
    backend: &B,
    surface: &VideoSurface,
) -> Result<()>
where
    C: CatalogApi + Sync + 'static,
    B: PlayerBackend,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term).context("failed to create terminal")?;

    let mut state = BrowserState::new();

    let result = browse(&mut terminal, &mut state, loader, backend, surface).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Load, browse, reload until quit.
async fn browse<C, B>(
    terminal: &mut Term,
    state: &mut BrowserState,
    loader: &CatalogLoader<C>,
    backend: &B,
    surface: &VideoSurface,
) -> Result<()>
where
    C: CatalogApi + Sync + 'static,
    B: PlayerBackend,
{
    loop {
        terminal
            .draw(ui::draw_loading)
            .context("failed to draw TUI")?;
        state.set_catalog(loader.load().await);

        match run_event_loop(terminal, state, backend, surface)? {
            BrowserExit::Reload => info!("reloading catalog"),
            BrowserExit::Quit => return Ok(()),
        }
    }
}

/// Main event loop. Owns the playback session of the player screen.
fn run_event_loop<B: PlayerBackend>(
    terminal: &mut Term,
    state: &mut BrowserState,
    backend: &B,
    surface: &VideoSurface,
) -> Result<BrowserExit> {
    let mut session: Option<PlaybackSession<B::Player>> = None;

    loop {
        if let Some(active) = session.as_mut()
            && state.player_status == PlayerStatus::Playing
            && !active.is_playing()
        {
            info!(url = active.url(), "player exited");
            state.player_status = PlayerStatus::Exited;
        }

        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = if state.on_player() {
                player_action(key.code, key.modifiers)
            } else {
                home_action(key.code, key.modifiers)
            };
            match action {
                Some(Action::Left) => state.move_left(),
                Some(Action::Right) => state.move_right(),
                Some(Action::Play) => {
                    if let Some(url) = state.open_selected() {
                        session = start_session(state, backend, surface, &url);
                    }
                }
                Some(Action::Back) => {
                    end_session(&mut session);
                    state.close_player();
                }
                Some(Action::Reload) => return Ok(BrowserExit::Reload),
                Some(Action::Quit) => {
                    end_session(&mut session);
                    return Ok(BrowserExit::Quit);
                }
                None => {}
            }
        }
    }
}

fn start_session<B: PlayerBackend>(
    state: &mut BrowserState,
    backend: &B,
    surface: &VideoSurface,
    url: &str,
) -> Option<PlaybackSession<B::Player>> {
    match PlaybackSession::start(backend, surface, url) {
        Ok(session) => {
            state.player_status = PlayerStatus::Playing;
            Some(session)
        }
        Err(e) => {
            warn!(url, error = %e, "failed to start playback");
            state.player_status = PlayerStatus::Failed(e.to_string());
            None
        }
    }
}

fn end_session<P: MediaPlayer>(session: &mut Option<PlaybackSession<P>>) {
    if let Some(active) = session.take()
        && let Err(e) = active.stop()
    {
        warn!(error = %e, "failed to stop player");
    }
}

/// Key bindings on the home screen.
fn home_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Right),
        KeyCode::Enter => Some(Action::Play),
        KeyCode::Char('r') => Some(Action::Reload),
        _ => None,
    }
}

/// Key bindings on the player screen.
fn player_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        _ => None,
    }
}
