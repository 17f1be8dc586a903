//! Application model: sections, input focus, and the `App` that routes card
//! actions to the controller.

use std::path::PathBuf;

use tracing::{error, info};

use crate::audio::MediaElement;
use crate::catalog::SearchError;
use crate::config::{LibrarySettings, SectionSetting};
use crate::library::{Track, collect_audio_files};

use super::controller::Controller;
use super::views::{CardAction, CardButton, CardList};

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";

/// The sidebar sections; exactly one is visible.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Search,
    Library,
    Queue,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Search, Section::Library, Section::Queue];

    pub fn title(self) -> &'static str {
        match self {
            Section::Search => "Search",
            Section::Library => "Library",
            Section::Queue => "Queue",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::Search => Section::Library,
            Section::Library => Section::Queue,
            Section::Queue => Section::Search,
        }
    }
}

impl From<SectionSetting> for Section {
    fn from(s: SectionSetting) -> Self {
        match s {
            SectionSetting::Search => Section::Search,
            SectionSetting::Library => Section::Library,
            SectionSetting::Queue => Section::Queue,
        }
    }
}

/// Where key presses go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Cards,
    /// Editing the search term.
    Search,
    /// Editing a path to add files from.
    Path,
}

/// The whole application state behind the UI.
pub struct App<M: MediaElement> {
    pub controller: Controller<M>,
    /// Files picked from disk, in pick order. Independent of the queue.
    pub library: Vec<Track>,

    pub results: CardList,
    pub library_view: CardList,
    pub queue_view: CardList,

    pub section: Section,
    pub focus: Focus,
    pub search_input: String,
    pub path_input: String,
    pub status: Option<String>,

    library_settings: LibrarySettings,
}

impl<M: MediaElement> App<M> {
    pub fn new(controller: Controller<M>, library_settings: LibrarySettings) -> Self {
        Self {
            controller,
            library: Vec::new(),
            results: CardList::new(),
            library_view: CardList::new(),
            queue_view: CardList::new(),
            section: Section::Search,
            focus: Focus::Cards,
            search_input: String::new(),
            path_input: String::new(),
            status: None,
            library_settings,
        }
    }

    pub fn view(&self, section: Section) -> &CardList {
        match section {
            Section::Search => &self.results,
            Section::Library => &self.library_view,
            Section::Queue => &self.queue_view,
        }
    }

    pub fn active_view(&self) -> &CardList {
        self.view(self.section)
    }

    pub fn active_view_mut(&mut self) -> &mut CardList {
        match self.section {
            Section::Search => &mut self.results,
            Section::Library => &mut self.library_view,
            Section::Queue => &mut self.queue_view,
        }
    }

    pub fn show_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn cycle_section(&mut self) {
        self.section = self.section.next();
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    fn refresh_queue_view(&mut self) {
        self.queue_view.render(self.controller.queue());
    }

    pub fn add_to_queue(&mut self, track: Track, play_now: bool) {
        self.controller.add_to_queue(track, play_now);
        self.refresh_queue_view();
    }

    pub fn play_at(&mut self, index: usize) {
        self.controller.play_at(index);
    }

    /// Press `button` on the card under the cursor of the visible section.
    pub fn press(&mut self, button: CardButton) {
        if let Some(action) = self.active_view().action(button) {
            self.route(self.section, action);
        }
    }

    /// Dispatch a card action according to the section it came from.
    pub fn route(&mut self, section: Section, action: CardAction) {
        match (section, action.button) {
            (Section::Search | Section::Library, CardButton::Play) => {
                self.add_to_queue(action.track, true)
            }
            (Section::Search | Section::Library, CardButton::Queue) => {
                self.add_to_queue(action.track, false)
            }
            (Section::Queue, CardButton::Play) => self.play_at(action.index),
            (Section::Queue, CardButton::Queue) => {}
        }
    }

    /// Add every audio file found under `paths`.
    ///
    /// Each file is queued (the first one plays if the queue was empty) and
    /// added to the library. Returns the number of files added.
    pub fn ingest_paths(&mut self, paths: &[PathBuf]) -> usize {
        let files = collect_audio_files(paths, &self.library_settings);
        for file in &files {
            let track = Track::local(file);
            let play_now = self.controller.queue().is_empty();
            self.controller.add_to_queue(track.clone(), play_now);
            self.library.push(track);
        }
        self.library_view.render(&self.library);
        self.refresh_queue_view();

        if files.is_empty() {
            self.set_status("No audio files found");
        } else {
            info!(count = files.len(), "added local files");
            self.set_status(format!("Added {} file(s)", files.len()));
        }
        files.len()
    }

    pub fn open_prompt(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Search {
            self.section = Section::Search;
        }
    }

    pub fn close_prompt(&mut self) {
        self.focus = Focus::Cards;
    }

    fn prompt_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Cards => None,
            Focus::Search => Some(&mut self.search_input),
            Focus::Path => Some(&mut self.path_input),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buf) = self.prompt_buffer() {
            buf.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buf) = self.prompt_buffer() {
            buf.pop();
        }
    }

    /// Submit the search prompt. Returns the term to search for, if any.
    pub fn submit_search(&mut self) -> Option<String> {
        let term = self.search_input.trim().to_string();
        if term.is_empty() {
            return None;
        }
        self.focus = Focus::Cards;
        self.section = Section::Search;
        self.set_status(format!("Searching for \"{term}\"..."));
        Some(term)
    }

    /// Submit the path prompt and ingest what it names.
    pub fn submit_path(&mut self) -> usize {
        let raw = self.path_input.trim().to_string();
        self.focus = Focus::Cards;
        if raw.is_empty() {
            return 0;
        }
        self.path_input.clear();
        let added = self.ingest_paths(&[expand_home(&raw)]);
        if added > 0 {
            self.section = Section::Library;
        }
        added
    }

    /// Show the outcome of a search in the results view.
    pub fn apply_search_outcome(&mut self, term: &str, result: Result<Vec<Track>, SearchError>) {
        match result {
            Ok(tracks) => {
                self.results.render(&tracks);
                self.set_status(format!("{} result(s) for \"{term}\"", tracks.len()));
            }
            Err(e) => {
                error!(term, "search failed: {e}");
                self.results.show_error(SEARCH_FAILED);
                self.status = None;
            }
        }
    }

    /// Drain media events into the controller; surface errors in the status line.
    pub fn pump_media(&mut self) {
        if let Some(msg) = self.controller.pump_events() {
            self.set_status(format!("Playback error: {msg}"));
        }
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}
