//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread, the events it
//! reports back, and the shared playback snapshot read by the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::MediaSource;

/// Notifications emitted by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback started or resumed.
    Play,
    /// Playback paused, including the implicit pause at the end of a track.
    Pause,
    /// The playback position moved.
    TimeUpdate,
    /// The track played through to its end.
    Ended,
    /// Loading or decoding failed.
    Error(String),
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source; leaves playback paused.
    Load(MediaSource),
    Play,
    Pause,
    /// Seek to an absolute position.
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Lifecycle of the loaded source.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    pub src: Option<MediaSource>,
    pub state: TransportState,
    pub paused: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            src: None,
            state: TransportState::Idle,
            paused: true,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Errors raised while loading or starting playback.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("no source loaded")]
    NoSource,

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("audio thread is not running")]
    Disconnected,
}
