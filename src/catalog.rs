//! Remote song catalog search.
//!
//! One HTTP request per search. The raw response is mapped to `Track`
//! values through a fixed pipeline: denylist filter, normalization, cover
//! de-duplication and the result clamp.

mod client;
mod dto;
mod filter;

pub use client::{CatalogClient, SearchError};
pub use dto::{RawSong, SearchResponse};
pub use filter::{clamp_results, dedupe_covers, drop_denied, is_denied, refine, to_track};
