use std::path::PathBuf;

use tracing::info;

use crate::app::{App, Section};
use crate::audio::MediaElement;
use crate::config;

/// Apply startup settings and command-line paths to a fresh `App`.
///
/// Returns the search term to issue once at boot, if any.
pub fn prepare<M: MediaElement>(
    app: &mut App<M>,
    settings: &config::Settings,
    cli_paths: &[PathBuf],
) -> Option<String> {
    app.show_section(Section::from(settings.ui.start_section));

    if !cli_paths.is_empty() {
        let added = app.ingest_paths(cli_paths);
        info!(paths = cli_paths.len(), added, "ingested command-line paths");
    }

    let term = settings.search.initial_term.trim();
    if term.is_empty() {
        return None;
    }
    app.search_input = term.to_string();
    app.set_status(format!("Searching for \"{term}\"..."));
    Some(term.to_string())
}
