use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::Rect;

use super::event_loop::{EventLoopState, Flow, handle_control_cmd, handle_key_event, handle_mouse_event};
use super::*;
use crate::app::{App, Controller, Focus, PlaybackState, Section};
use crate::audio::MediaElement;
use crate::audio::fake::FakeMedia;
use crate::catalog::SearchError;
use crate::config::{LibrarySettings, LoggingSettings, SearchSettings, SectionSetting, Settings};
use crate::library::{MediaSource, Origin, Track};
use crate::ui::Areas;

fn t(title: &str) -> Track {
    Track {
        src: MediaSource::Url(format!("https://audio.example/{title}.m4a")),
        title: title.into(),
        artist: "Artist".into(),
        cover: None,
        origin: Origin::Itunes,
    }
}

fn app_with(n: usize) -> App<FakeMedia> {
    let c = Controller::with_rng(
        FakeMedia::new(),
        &Settings::default(),
        StdRng::seed_from_u64(3),
    );
    let mut app = App::new(c, LibrarySettings::default());
    for i in 0..n {
        app.add_to_queue(t(&format!("track{i}")), false);
    }
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App<FakeMedia>, state: &mut EventLoopState, code: KeyCode) -> Flow {
    handle_key_event(key(code), &Settings::default(), app, state)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn space_starts_the_queue_and_toggles() {
    let mut app = app_with(2);
    let mut state = EventLoopState::new(&app);

    assert_eq!(press(&mut app, &mut state, KeyCode::Char(' ')), Flow::Continue);
    assert_eq!(app.controller.current(), Some(0));
    assert_eq!(app.controller.playback_state(), PlaybackState::Playing);

    press(&mut app, &mut state, KeyCode::Char(' '));
    assert_eq!(app.controller.playback_state(), PlaybackState::Paused);
}

#[test]
fn q_and_ctrl_c_quit() {
    let mut app = app_with(0);
    let mut state = EventLoopState::new(&app);
    assert_eq!(press(&mut app, &mut state, KeyCode::Char('q')), Flow::Quit);

    app.open_prompt(Focus::Search);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(
        handle_key_event(ctrl_c, &Settings::default(), &mut app, &mut state),
        Flow::Quit
    );
}

#[test]
fn search_prompt_swallows_shortcuts_and_submits() {
    let mut app = app_with(1);
    let mut state = EventLoopState::new(&app);

    press(&mut app, &mut state, KeyCode::Char('/'));
    assert_eq!(app.focus, Focus::Search);

    for c in "queen".chars() {
        assert_eq!(press(&mut app, &mut state, KeyCode::Char(c)), Flow::Continue);
    }
    // 'q' and 'n' went into the prompt instead of quitting or skipping.
    assert_eq!(app.search_input, "queen");
    assert_eq!(app.controller.current(), None);

    press(&mut app, &mut state, KeyCode::Backspace);
    press(&mut app, &mut state, KeyCode::Char('n'));
    assert_eq!(
        press(&mut app, &mut state, KeyCode::Enter),
        Flow::Search("queen".into())
    );
    assert_eq!(app.focus, Focus::Cards);
    assert_eq!(app.section, Section::Search);
}

#[test]
fn empty_search_is_not_submitted() {
    let mut app = app_with(0);
    let mut state = EventLoopState::new(&app);

    press(&mut app, &mut state, KeyCode::Char('/'));
    press(&mut app, &mut state, KeyCode::Char(' '));
    assert_eq!(press(&mut app, &mut state, KeyCode::Enter), Flow::Continue);

    press(&mut app, &mut state, KeyCode::Esc);
    assert_eq!(app.focus, Focus::Cards);
}

#[test]
fn gg_and_shift_g_move_the_cursor() {
    let mut app = app_with(4);
    let mut state = EventLoopState::new(&app);
    press(&mut app, &mut state, KeyCode::Char('3'));
    assert_eq!(app.section, Section::Queue);

    press(&mut app, &mut state, KeyCode::Char('G'));
    assert_eq!(app.active_view().cursor(), 3);

    press(&mut app, &mut state, KeyCode::Char('g'));
    assert!(state.pending_gg);
    assert_eq!(app.active_view().cursor(), 3);

    press(&mut app, &mut state, KeyCode::Char('g'));
    assert!(!state.pending_gg);
    assert_eq!(app.active_view().cursor(), 0);
}

#[test]
fn a_lone_g_is_forgotten_after_another_key() {
    let mut app = app_with(4);
    let mut state = EventLoopState::new(&app);
    press(&mut app, &mut state, KeyCode::Char('3'));
    press(&mut app, &mut state, KeyCode::Char('G'));

    press(&mut app, &mut state, KeyCode::Char('g'));
    press(&mut app, &mut state, KeyCode::Char('k'));
    press(&mut app, &mut state, KeyCode::Char('g'));
    assert_eq!(app.active_view().cursor(), 2);
}

#[test]
fn enter_on_a_queue_card_plays_it() {
    let mut app = app_with(3);
    let mut state = EventLoopState::new(&app);
    press(&mut app, &mut state, KeyCode::Char('3'));
    press(&mut app, &mut state, KeyCode::Char('j'));
    press(&mut app, &mut state, KeyCode::Enter);

    assert_eq!(app.controller.current(), Some(1));
    assert_eq!(app.controller.queue().len(), 3);
}

#[test]
fn volume_keys_step_and_clamp() {
    let mut app = app_with(0);
    let mut state = EventLoopState::new(&app);
    app.controller.set_volume(0.5);

    press(&mut app, &mut state, KeyCode::Char('+'));
    assert_eq!(app.controller.volume(), 0.55);
    press(&mut app, &mut state, KeyCode::Char('-'));
    press(&mut app, &mut state, KeyCode::Char('-'));
    assert_eq!(app.controller.volume(), 0.45);

    app.controller.set_volume(1.0);
    press(&mut app, &mut state, KeyCode::Char('='));
    assert_eq!(app.controller.volume(), 1.0);
}

#[test]
fn arrow_keys_skip_within_the_track() {
    let mut app = app_with(1);
    let mut state = EventLoopState::new(&app);
    app.controller.play_at(0);

    press(&mut app, &mut state, KeyCode::Right);
    assert_eq!(app.controller.media().current_time(), 10.0);
    press(&mut app, &mut state, KeyCode::Right);
    press(&mut app, &mut state, KeyCode::Right);
    assert_eq!(app.controller.media().current_time(), 30.0);
    press(&mut app, &mut state, KeyCode::Left);
    assert_eq!(app.controller.media().current_time(), 20.0);
}

#[test]
fn repeat_and_shuffle_keys_toggle() {
    let mut app = app_with(0);
    let mut state = EventLoopState::new(&app);
    press(&mut app, &mut state, KeyCode::Char('r'));
    press(&mut app, &mut state, KeyCode::Char('s'));
    assert!(app.controller.repeat());
    assert!(app.controller.shuffle());

    press(&mut app, &mut state, KeyCode::Char('r'));
    assert!(!app.controller.repeat());
}

#[test]
fn shifted_transport_letters_act_like_lowercase() {
    let mut app = app_with(3);
    let mut state = EventLoopState::new(&app);
    let settings = Settings::default();
    let shifted = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT);

    handle_key_event(shifted('N'), &settings, &mut app, &mut state);
    assert_eq!(app.controller.current(), Some(0));
    handle_key_event(shifted('N'), &settings, &mut app, &mut state);
    assert_eq!(app.controller.current(), Some(1));
    handle_key_event(shifted('P'), &settings, &mut app, &mut state);
    assert_eq!(app.controller.current(), Some(0));

    handle_key_event(shifted('R'), &settings, &mut app, &mut state);
    handle_key_event(shifted('S'), &settings, &mut app, &mut state);
    assert!(app.controller.repeat());
    assert!(app.controller.shuffle());
}

#[test]
fn shifted_letters_are_typed_into_the_prompt() {
    let mut app = app_with(2);
    let mut state = EventLoopState::new(&app);
    app.open_prompt(Focus::Search);

    let key = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
    handle_key_event(key, &Settings::default(), &mut app, &mut state);
    assert_eq!(app.search_input, "N");
    assert_eq!(app.controller.current(), None);
}

#[test]
fn dragging_the_seek_bar_previews_then_commits() {
    let mut app = app_with(1);
    app.controller.play_at(0);
    let areas = Areas::compute(Rect::new(0, 0, 100, 30));
    let bar = areas.seek_bar;
    let row = bar.y;
    let last = bar.x + bar.width - 1;

    handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), bar.x, row), &mut app, &areas);
    assert!(app.controller.seeking());
    assert_eq!(app.controller.seek_value(), 0.0);

    handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), last, row), &mut app, &areas);
    assert_eq!(app.controller.seek_value(), 100.0);
    // The element is untouched until the button is released.
    assert_eq!(app.controller.media().current_time(), 0.0);

    handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), last, row), &mut app, &areas);
    assert!(!app.controller.seeking());
    assert_eq!(app.controller.media().current_time(), 30.0);
}

#[test]
fn releasing_off_the_bar_commits_the_last_preview() {
    let mut app = app_with(1);
    app.controller.play_at(0);
    let areas = Areas::compute(Rect::new(0, 0, 100, 30));
    let bar = areas.seek_bar;

    handle_mouse_event(
        mouse(MouseEventKind::Drag(MouseButton::Left), bar.x + bar.width - 1, bar.y),
        &mut app,
        &areas,
    );
    handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), &mut app, &areas);

    assert!(!app.controller.seeking());
    assert_eq!(app.controller.media().current_time(), 30.0);
}

#[test]
fn clicks_outside_the_bar_are_ignored() {
    let mut app = app_with(1);
    app.controller.play_at(0);
    let areas = Areas::compute(Rect::new(0, 0, 100, 30));

    handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 1), &mut app, &areas);
    handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 1), &mut app, &areas);
    assert!(!app.controller.seeking());
    assert!(app.controller.media().seeks.is_empty());
}

#[test]
fn media_key_commands_drive_the_controller() {
    let mut app = app_with(2);

    assert!(!handle_control_cmd(ControlCmd::PlayPause, &mut app));
    assert_eq!(app.controller.current(), Some(0));

    app.controller.skip_forward();
    assert!(!handle_control_cmd(ControlCmd::Stop, &mut app));
    assert_eq!(app.controller.playback_state(), PlaybackState::Paused);
    assert_eq!(app.controller.media().current_time(), 0.0);

    handle_control_cmd(ControlCmd::Next, &mut app);
    assert_eq!(app.controller.current(), Some(1));
    handle_control_cmd(ControlCmd::Prev, &mut app);
    assert_eq!(app.controller.current(), Some(0));

    assert!(handle_control_cmd(ControlCmd::Quit, &mut app));
}

#[test]
fn search_worker_reports_network_failures() {
    let client = crate::catalog::CatalogClient::new(SearchSettings {
        endpoint: "http://127.0.0.1:1/search".into(),
        ..SearchSettings::default()
    })
    .unwrap();
    let (tx, rx) = mpsc::channel();

    spawn_search(&client, "queen".into(), tx).join().unwrap();
    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(outcome.term, "queen");
    assert!(matches!(outcome.result, Err(SearchError::Network(_))));
}

#[test]
fn startup_prefills_the_boot_search() {
    let mut app = app_with(0);
    let mut settings = Settings::default();
    settings.search.initial_term = "  arijit  ".into();
    settings.ui.start_section = SectionSetting::Library;

    let term = startup::prepare(&mut app, &settings, &[]);
    assert_eq!(term.as_deref(), Some("arijit"));
    assert_eq!(app.search_input, "arijit");
    assert_eq!(app.section, Section::Library);
}

#[test]
fn startup_without_a_term_skips_the_search_but_ingests_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("song.mp3"), b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let mut app = app_with(0);
    let mut settings = Settings::default();
    settings.search.initial_term = String::new();

    let paths: Vec<PathBuf> = vec![dir.path().to_path_buf()];
    assert_eq!(startup::prepare(&mut app, &settings, &paths), None);
    assert_eq!(app.library.len(), 1);
    assert_eq!(app.controller.current(), Some(0));
    assert_eq!(app.controller.queue()[0].title, "song");
}

#[test]
fn rust_log_overrides_the_configured_filter() {
    let settings = LoggingSettings {
        filter: "encore=debug".into(),
        ..LoggingSettings::default()
    };
    assert_eq!(logging::filter_directives(None, &settings), "encore=debug");
    assert_eq!(logging::filter_directives(Some("  ".into()), &settings), "encore=debug");
    assert_eq!(logging::filter_directives(Some("trace".into()), &settings), "trace");
}
