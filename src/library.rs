//! Track model and local file ingestion.
//!
//! Tracks come from two places: catalog search results and files picked by
//! the user. Both end up as the same `Track` value, held by value in lists.

mod model;
mod scan;

pub use model::*;
pub use scan::collect_audio_files;

#[cfg(test)]
mod tests;
