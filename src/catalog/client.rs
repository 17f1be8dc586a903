//! Blocking HTTP client for the catalog search endpoint.
//!
//! Searches are fire-and-forget from the caller's point of view: one request,
//! no retries. Callers run it off the UI thread.

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::SearchSettings;
use crate::library::Track;

use super::dto::SearchResponse;
use super::filter::refine;

const USER_AGENT: &str = concat!("encore/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while searching the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search term is empty")]
    EmptyTerm,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog search client.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    settings: SearchSettings,
}

impl CatalogClient {
    /// Requests carry no timeout: a search waits for the catalog however long
    /// it takes.
    pub fn new(settings: SearchSettings) -> Result<Self, SearchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None)
            .build()?;
        Ok(Self { http, settings })
    }

    /// Search the catalog for `term` and return playable tracks.
    pub fn search(&self, term: &str) -> Result<Vec<Track>, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        let limit = self.settings.limit.to_string();
        debug!(term, endpoint = %self.settings.endpoint, "searching catalog");

        let response = self
            .http
            .get(&self.settings.endpoint)
            .query(&[
                ("term", term),
                ("entity", self.settings.entity.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text()?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        let reported = parsed.result_count;
        let raw_count = parsed.results.len();
        let tracks = refine(parsed.results, &self.settings);

        info!(term, ?reported, raw = raw_count, kept = tracks.len(), "search finished");
        Ok(tracks)
    }
}
