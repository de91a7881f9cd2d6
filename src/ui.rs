//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::UiSettings;
use crate::library::PermissionStatus;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("0", "restart"),
    ("R", "refresh"),
    ("q", "quit"),
];

/// Render the controls help text.
fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format milliseconds as `MM:SS`.
fn format_mmss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Status line: permission, playback state, now-playing title and elapsed time.
fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(match app.permission {
        PermissionStatus::Granted => format!(" LIBRARY: {} tracks", app.snapshot.len()),
        PermissionStatus::Denied => " LIBRARY: access denied".to_string(),
        PermissionStatus::NotDetermined => " LIBRARY: waiting for access".to_string(),
    });

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }

    if let Some(msg) = &app.message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Transport bar: the now-playing label over previous / play-pause / restart / next.
fn transport_text(app: &App) -> String {
    let label = match app.session.active_track() {
        Some(track) => {
            let elapsed = app.position_ms.map(format_mmss).unwrap_or_default();
            format!("{}  {}", track.filename(), elapsed)
        }
        None => "Nothing playing".to_string(),
    };

    let toggle = if app.is_playing() { "⏸ pause" } else { "▶ play" };

    format!("{label}\n⏮ prev   {toggle}   ⟲ restart   next ⏭")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Main list
    {
        let tracks = app.snapshot.tracks();
        let playing = app.now_playing_index();

        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let item = ListItem::new(track.filename());
                if playing == Some(start + offset) {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let transport = Paragraph::new(transport_text(app))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" now playing "));
    frame.render_widget(transport, chunks[3]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
