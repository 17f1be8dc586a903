use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::{App, Controller};
use crate::audio::AudioPlayer;
use crate::catalog::CatalogClient;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod search;
mod settings;
mod startup;

pub use search::{SearchOutcome, spawn_search};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    // Print log path to stderr so it can be tailed before the UI takes over.
    if let Some(path) = logging::init(&settings.logging) {
        eprintln!("encore log: {}", path.display());
    }
    info!(version = env!("CARGO_PKG_VERSION"), "encore starting");

    let cli_paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let catalog = CatalogClient::new(settings.search.clone()).inspect_err(|e| {
        error!("failed to build catalog client: {e}");
    })?;

    let audio_player = AudioPlayer::new(settings.audio.clone(), settings.playback.volume);
    let controller = Controller::new(audio_player, &settings);
    let mut app = App::new(controller, settings.library.clone());

    let (search_tx, search_rx) = mpsc::channel::<SearchOutcome>();
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    if let Some(term) = startup::prepare(&mut app, &settings, &cli_paths) {
        spawn_search(&catalog, term, search_tx.clone());
    }
    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let services = event_loop::Services {
            catalog: &catalog,
            search_tx: &search_tx,
            search_rx: &search_rx,
            control_rx: &control_rx,
            mpris: &mpris,
        };
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(&mut terminal, &settings, &mut app, &services, &mut state)
    })();

    app.controller
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!("event loop failed: {e}");
    }
    info!("encore exiting");
    run_result
}

#[cfg(test)]
mod tests;
