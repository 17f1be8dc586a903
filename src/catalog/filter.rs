use std::collections::HashSet;

use crate::config::SearchSettings;
use crate::library::{MediaSource, Origin, Track};

use super::dto::RawSong;

/// Return true if `title` contains any denylisted fragment, ignoring case.
///
/// A missing title never matches.
pub fn is_denied(title: Option<&str>, denylist: &[String]) -> bool {
    let Some(title) = title else {
        return false;
    };
    let title = title.to_lowercase();
    denylist
        .iter()
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .any(|d| title.contains(&d))
}

/// Remove every record whose title is denylisted.
pub fn drop_denied(raw: Vec<RawSong>, denylist: &[String]) -> Vec<RawSong> {
    raw.into_iter()
        .filter(|r| !is_denied(r.track_name.as_deref(), denylist))
        .collect()
}

/// Normalize one catalog record.
///
/// Records without a preview clip cannot be played and map to `None`.
pub fn to_track(raw: RawSong, artwork_base: &str, artwork_size: &str) -> Option<Track> {
    let src = raw.preview_url.filter(|u| !u.trim().is_empty())?;
    let cover = raw
        .artwork_url_100
        .filter(|u| !u.is_empty())
        .map(|u| u.replacen(artwork_base, artwork_size, 1));

    Some(Track {
        src: MediaSource::Url(src),
        title: raw.track_name.unwrap_or_default(),
        artist: raw.artist_name.unwrap_or_default(),
        cover,
        origin: Origin::Itunes,
    })
}

/// Drop tracks whose cover URL was already seen. The first occurrence wins
/// and tracks without a cover are always kept.
pub fn dedupe_covers(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen: HashSet<String> = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| match &t.cover {
            None => true,
            Some(c) => seen.insert(c.clone()),
        })
        .collect()
}

/// Keep the first `max(min, len)` tracks.
///
/// This never truncates and never pads: the list is returned whole. It only
/// exists to make the lower bound explicit where results are assembled.
pub fn clamp_results(mut tracks: Vec<Track>, min: usize) -> Vec<Track> {
    let keep = min.max(tracks.len());
    tracks.truncate(keep);
    tracks
}

/// Run the full response pipeline.
pub fn refine(raw: Vec<RawSong>, settings: &SearchSettings) -> Vec<Track> {
    let tracks: Vec<Track> = drop_denied(raw, &settings.denylist)
        .into_iter()
        .filter_map(|r| to_track(r, &settings.artwork_base, &settings.artwork_size))
        .collect();

    clamp_results(dedupe_covers(tracks), settings.min_results)
}
