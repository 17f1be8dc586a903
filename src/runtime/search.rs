use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::catalog::{CatalogClient, SearchError};
use crate::library::Track;

/// A finished catalog search, delivered to the event loop.
#[derive(Debug)]
pub struct SearchOutcome {
    pub term: String,
    pub result: Result<Vec<Track>, SearchError>,
}

/// Run one search on a worker thread and send the outcome to `tx`.
///
/// Searches are neither cancelled nor de-duplicated; whichever finishes last
/// is what the results view ends up showing.
pub fn spawn_search(
    client: &CatalogClient,
    term: String,
    tx: Sender<SearchOutcome>,
) -> JoinHandle<()> {
    let client = client.clone();
    thread::spawn(move || {
        let result = client.search(&term);
        if tx.send(SearchOutcome { term, result }).is_err() {
            debug!("search finished after the event loop exited");
        }
    })
}
