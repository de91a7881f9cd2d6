use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Intent, Shell};
use crate::audio::AudioBackend;
use crate::config;
use crate::library::{Direction, MediaStore};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains playback notifications, draws, and turns
/// key presses into intents. Returns `Ok(())` when shutdown is requested.
pub fn run<S: MediaStore, B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    shell: &mut Shell<S, B>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Auto-advance and position updates happen here, without user input.
        shell.tick();

        terminal.draw(|f| ui::draw(f, &shell.app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, shell, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Map a key press to view changes or an intent. Returns `true` to quit.
fn handle_key_event<S: MediaStore, B: AudioBackend>(
    key: KeyEvent,
    shell: &mut Shell<S, B>,
    state: &mut EventLoopState,
) -> bool {
    let intent = match key.code {
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                shell.app.follow_playback_off();
                shell.app.select_first();
            } else {
                state.pending_gg = true;
            }
            return false;
        }
        KeyCode::Char('G') | KeyCode::End => {
            shell.app.follow_playback_off();
            shell.app.select_last();
            None
        }
        KeyCode::Home => {
            shell.app.follow_playback_off();
            shell.app.select_first();
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            shell.app.follow_playback_off();
            shell.app.next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            shell.app.follow_playback_off();
            shell.app.prev();
            None
        }
        KeyCode::Enter => shell.app.selected_track().cloned().map(|track| {
            shell.app.follow_playback_on();
            Intent::Select(track)
        }),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Intent::TogglePlayPause),
        KeyCode::Char('l') | KeyCode::Right => {
            shell.app.follow_playback_on();
            Some(Intent::Advance(Direction::Next))
        }
        KeyCode::Char('h') | KeyCode::Left => {
            shell.app.follow_playback_on();
            Some(Intent::Advance(Direction::Previous))
        }
        KeyCode::Char('0') => Some(Intent::Restart),
        KeyCode::Char('R') | KeyCode::F(5) => Some(Intent::Refresh),
        KeyCode::Char('q') => Some(Intent::Quit),
        _ => None,
    };

    // g pending should clear on any other key
    state.pending_gg = false;

    match intent {
        Some(intent) => shell.dispatch(intent),
        None => false,
    }
}
