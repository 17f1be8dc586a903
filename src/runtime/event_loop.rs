use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::{App, CardButton, Focus, PlaybackState, Section};
use crate::audio::MediaElement;
use crate::catalog::CatalogClient;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::search::{SearchOutcome, spawn_search};
use crate::ui::{self, Areas};

/// What the loop should do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Issue a catalog search for this term.
    Search(String),
}

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known playing index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
    /// Screen regions from the last draw, for mouse hit-testing.
    pub areas: Areas,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new<M: MediaElement>(app: &App<M>) -> Self {
        Self {
            pending_gg: false,
            last_mpris_index: app.controller.current(),
            last_mpris_playback: app.controller.playback_state(),
            areas: Areas::compute(Rect::default()),
        }
    }
}

/// Channels and services the loop talks to.
pub struct Services<'a> {
    pub catalog: &'a CatalogClient,
    pub search_tx: &'a mpsc::Sender<SearchOutcome>,
    pub search_rx: &'a mpsc::Receiver<SearchOutcome>,
    pub control_rx: &'a mpsc::Receiver<ControlCmd>,
    pub mpris: &'a MprisHandle,
}

/// Main terminal event loop: drains media events, search results and media
/// keys, draws, then waits briefly for input. Returns when quit is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<M>,
    services: &Services<'_>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.pump_media();

        while let Ok(outcome) = services.search_rx.try_recv() {
            app.apply_search_outcome(&outcome.term, outcome.result);
        }

        while let Ok(cmd) = services.control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let index = app.controller.current();
        let playback = app.controller.playback_state();
        if index != state.last_mpris_index || playback != state.last_mpris_playback {
            update_mpris(services.mpris, app);
            state.last_mpris_index = index;
            state.last_mpris_playback = playback;
        }

        let frame = terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;
        state.areas = Areas::compute(frame.area);

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(key, settings, app, state) {
                        Flow::Continue => {}
                        Flow::Quit => return Ok(()),
                        Flow::Search(term) => {
                            spawn_search(services.catalog, term, services.search_tx.clone());
                        }
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &state.areas),
                _ => {}
            }
        }
    }
}

/// Route a media-key command. Returns true when the app should quit.
pub fn handle_control_cmd<M: MediaElement>(cmd: ControlCmd, app: &mut App<M>) -> bool {
    let c = &mut app.controller;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => c.play(),
        ControlCmd::Pause => c.pause(),
        ControlCmd::PlayPause => c.toggle_play(),
        ControlCmd::Stop => c.stop(),
        ControlCmd::Next => c.next_track(false),
        ControlCmd::Prev => c.prev_track(),
    }
    false
}

/// Seek bar dragging: press or drag previews, release commits.
pub fn handle_mouse_event<M: MediaElement>(mouse: MouseEvent, app: &mut App<M>, areas: &Areas) {
    let c = &mut app.controller;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(pct) = areas.seek_percent(mouse.column, mouse.row) {
                c.seek_input(pct);
            }
        }
        MouseEventKind::Up(MouseButton::Left) if c.seeking() => {
            let pct = areas
                .seek_percent(mouse.column, mouse.row)
                .unwrap_or_else(|| c.seek_value());
            c.seek_commit(pct);
        }
        _ => {}
    }
}

fn handle_prompt_key<M: MediaElement>(key: KeyEvent, app: &mut App<M>) -> Flow {
    match key.code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Enter => match app.focus {
            Focus::Search => {
                if let Some(term) = app.submit_search() {
                    return Flow::Search(term);
                }
            }
            Focus::Path => {
                app.submit_path();
            }
            Focus::Cards => {}
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if !c.is_control() {
                app.push_char(c);
            }
        }
        _ => {}
    }
    Flow::Continue
}

pub fn handle_key_event<M: MediaElement>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<M>,
    state: &mut EventLoopState,
) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    if app.focus != Focus::Cards {
        // Shortcuts are off while a prompt has focus.
        state.pending_gg = false;
        return handle_prompt_key(key, app);
    }

    let was_pending_gg = std::mem::take(&mut state.pending_gg);
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(' ') => app.controller.toggle_play(),
        KeyCode::Right => app.controller.skip_forward(),
        KeyCode::Left => app.controller.skip_back(),
        // Transport letters work with or without shift.
        KeyCode::Char('n' | 'N') => app.controller.next_track(false),
        KeyCode::Char('p' | 'P') => app.controller.prev_track(),
        KeyCode::Char('r' | 'R') => app.controller.toggle_repeat(),
        KeyCode::Char('s' | 'S') => app.controller.toggle_shuffle(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.controller.nudge_volume(step),
        KeyCode::Char('-') => app.controller.nudge_volume(-step),
        KeyCode::Char('/') => app.open_prompt(Focus::Search),
        KeyCode::Char('o') => app.open_prompt(Focus::Path),
        KeyCode::Char('1') => app.show_section(Section::Search),
        KeyCode::Char('2') => app.show_section(Section::Library),
        KeyCode::Char('3') => app.show_section(Section::Queue),
        KeyCode::Tab => app.cycle_section(),
        KeyCode::Char('j') | KeyCode::Down => app.active_view_mut().select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.active_view_mut().select_prev(),
        KeyCode::Char('g') => {
            if was_pending_gg {
                app.active_view_mut().select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.active_view_mut().select_last(),
        KeyCode::Enter => app.press(CardButton::Play),
        KeyCode::Char('a') => app.press(CardButton::Queue),
        _ => {}
    }

    Flow::Continue
}
