//! TUI rendering logic for the channel browser.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::state::{BrowserState, PlayerStatus, icon_label};

/// Width of one channel card, borders included.
const CARD_WIDTH: u16 = 22;

/// Draws the current screen.
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    if state.on_player() {
        draw_player(frame, state);
    } else {
        draw_home(frame, state);
    }
}

/// Splits the frame into header, main content and footer.
#[allow(clippy::indexing_slicing)]
fn frame_chunks(frame: &Frame) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());
    (chunks[0], chunks[1], chunks[2])
}

/// Draws the home screen.
fn draw_home(frame: &mut Frame, state: &BrowserState) {
    let (header, main, footer) = frame_chunks(frame);

    let title = Paragraph::new(state.provenance()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Live channels "),
    );
    frame.render_widget(title, header);

    draw_cards(frame, main, state);

    draw_footer(
        frame,
        footer,
        "\u{2190}\u{2192}/h/l: move  Enter: play  r: reload  q: quit",
    );
}

/// Draws the horizontal row of channel cards.
fn draw_cards(frame: &mut Frame, area: Rect, state: &BrowserState) {
    if state.channels.is_empty() {
        let empty = Paragraph::new("No channels available")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let capacity = usize::from((area.width / CARD_WIDTH).max(1));
    let window = state.visible_window(capacity);
    let count = u16::try_from(window.len()).unwrap_or(1);
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(CARD_WIDTH); usize::from(count)])
        .split(area);

    for (slot, idx) in slots.iter().zip(window) {
        let Some(channel) = state.channels.get(idx) else {
            continue;
        };
        let is_cursor = idx == state.cursor;
        let border_style = if is_cursor {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let name_style = if is_cursor {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(channel.name.clone(), name_style)),
            Line::from(Span::styled(
                icon_label(channel),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(card, *slot);
    }
}

/// Draws the player screen.
fn draw_player(frame: &mut Frame, state: &BrowserState) {
    let (header, main, footer) = frame_chunks(frame);

    let name = state
        .playing_channel()
        .map_or_else(|| String::from("Player"), |c| c.name.clone());
    let title = Paragraph::new(state.nav.current().to_string())
        .block(Block::default().borders(Borders::ALL).title(format!(" {name} ")));
    frame.render_widget(title, header);

    let url = state
        .playing_channel()
        .map_or_else(String::new, |c| c.url.clone());
    let (status, style) = match &state.player_status {
        PlayerStatus::Idle => (String::from("starting"), Style::default()),
        PlayerStatus::Playing => (String::from("playing"), Style::default().fg(Color::Green)),
        PlayerStatus::Exited => (String::from("exited"), Style::default().fg(Color::Yellow)),
        PlayerStatus::Failed(err) => (format!("failed: {err}"), Style::default().fg(Color::Red)),
    };
    let body = Paragraph::new(vec![
        Line::from(vec![Span::raw("Stream: "), Span::raw(url)]),
        Line::from(""),
        Line::from(vec![Span::raw("Status: "), Span::styled(status, style)]),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, main);

    draw_footer(frame, footer, "Esc/Backspace/q: back  Ctrl-C: quit");
}

/// Draws a "loading" frame while the catalog is fetched.
pub fn draw_loading(frame: &mut Frame) {
    let (header, main, footer) = frame_chunks(frame);

    let title = Paragraph::new("loading...").block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Live channels "),
    );
    frame.render_widget(title, header);

    let body = Paragraph::new("Fetching channel catalog...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, main);

    draw_footer(frame, footer, "please wait");
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, hints: &str) {
    let footer = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
