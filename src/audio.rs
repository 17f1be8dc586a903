//! Audio playback: the media element abstraction and its rodio backend.
//!
//! The controller only ever talks to a `MediaElement`. The production
//! implementation, `AudioPlayer`, drives rodio from a dedicated thread and
//! reports progress back as `MediaEvent`s.

mod element;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub mod fake;

pub use element::MediaElement;
pub use player::AudioPlayer;
pub use types::*;
