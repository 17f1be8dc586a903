//! Catalog search response shapes.
//!
//! Only the fields the player uses are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

/// Top-level search response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: Option<u32>,
    #[serde(default)]
    pub results: Vec<RawSong>,
}

/// One song record as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSong {
    /// 30-second preview clip.
    pub preview_url: Option<String>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    /// Thumbnail at the catalog's base resolution.
    #[serde(rename = "artworkUrl100")]
    pub artwork_url_100: Option<String>,
}
