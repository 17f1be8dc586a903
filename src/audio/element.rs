use super::types::{MediaError, MediaEvent};
use crate::library::MediaSource;

/// A playback primitive in the spirit of an HTML media element.
///
/// State is read live from the element; the caller keeps no shadow copy.
/// Writes are commands. Progress and state changes are reported as events,
/// drained with `next_event`.
pub trait MediaElement {
    /// Replace the current source. Playback does not start until `play`.
    fn load(&mut self, src: &MediaSource);

    /// True once a source has been loaded.
    fn has_source(&self) -> bool;

    /// Start or resume playback. Restarts from zero if the track had ended.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn paused(&self) -> bool;

    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Seek to `secs`, clamped at zero.
    fn set_current_time(&mut self, secs: f64);

    /// Track length in seconds, if known.
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f32;

    /// Set output volume; clamped to `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    /// Pop the next pending event, if any.
    fn next_event(&mut self) -> Option<MediaEvent>;
}
