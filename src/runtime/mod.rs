use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::Shell;
use crate::audio::RodioBackend;
use crate::library::{Catalog, FsMediaStore};
use crate::player::Controller;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init_logging(&settings.logging);

    // CLI argument wins over `library.root`; the working directory is the last resort.
    let dir: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.library.root.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));
    info!("browsing {}", dir.display());

    let store = FsMediaStore::new(&dir, settings.library.clone());
    let catalog = Catalog::new(store, &settings.library);
    let backend = RodioBackend::open_default(&settings.audio)?;
    let controller = Controller::new(backend, &settings.playback);

    let mut shell = Shell::new(catalog, controller);
    shell.app.follow_playback = settings.ui.follow_playback;
    shell.app.set_current_dir(dir.display().to_string());
    shell.start();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut shell, &mut state)
    })();

    shell.controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
