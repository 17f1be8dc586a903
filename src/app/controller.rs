//! Queue and transport control on top of a `MediaElement`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::audio::{MediaElement, MediaEvent};
use crate::config::Settings;
use crate::library::Track;

/// The playback state reported to the UI and MPRIS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Owns the play queue and drives a media element.
///
/// Playback position, duration, volume and the paused flag are always read
/// from the element. The controller only keeps what the element can't know:
/// the queue, the current index, the repeat/shuffle flags and the seek bar.
pub struct Controller<M: MediaElement> {
    media: M,
    queue: Vec<Track>,
    current: Option<usize>,
    repeat: bool,
    shuffle: bool,

    // Seek bar: while the user drags, live updates leave `seek_value` alone.
    seeking: bool,
    seek_value: f64,

    // Mirrors the element's play/pause events; set eagerly by `play_at`.
    playing_icon: bool,

    rng: StdRng,
    skip_secs: f64,
    restart_threshold: f64,
    fallback_duration: f64,
}

impl<M: MediaElement> Controller<M> {
    pub fn new(media: M, settings: &Settings) -> Self {
        Self::with_rng(media, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(mut media: M, settings: &Settings, rng: StdRng) -> Self {
        media.set_volume(settings.playback.volume);
        Self {
            media,
            queue: Vec::new(),
            current: None,
            repeat: settings.playback.repeat,
            shuffle: settings.playback.shuffle,
            seeking: false,
            seek_value: 0.0,
            playing_icon: false,
            rng,
            skip_secs: settings.controls.skip_seconds as f64,
            restart_threshold: settings.playback.restart_threshold_secs,
            fallback_duration: settings.playback.fallback_duration_secs,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The queue entry that is loaded in the element, if any.
    pub fn now_playing(&self) -> Option<&Track> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn seeking(&self) -> bool {
        self.seeking
    }

    /// Seek bar position, `0.0..=100.0`.
    pub fn seek_value(&self) -> f64 {
        self.seek_value
    }

    pub fn playing_icon(&self) -> bool {
        self.playing_icon
    }

    /// Position shown next to the seek bar. While dragging this previews the
    /// drag target instead of the live position.
    pub fn displayed_time(&self) -> f64 {
        if self.seeking {
            self.seek_value / 100.0 * self.media.duration().unwrap_or(0.0)
        } else {
            self.media.current_time()
        }
    }

    pub fn duration(&self) -> Option<f64> {
        self.media.duration()
    }

    pub fn volume(&self) -> f32 {
        self.media.volume()
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.current.is_none() {
            PlaybackState::Stopped
        } else if self.media.paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }

    fn start(&mut self) {
        // Refused starts are not surfaced; the element's events keep the icon honest.
        if let Err(e) = self.media.play() {
            debug!("play failed: {e}");
        }
    }

    /// Load and start the queue entry at `index`. Out of range is a no-op.
    pub fn play_at(&mut self, index: usize) -> bool {
        let Some(track) = self.queue.get(index) else {
            return false;
        };
        self.current = Some(index);
        self.media.load(&track.src);
        self.start();
        if !self.seeking {
            self.seek_value = 0.0;
        }
        self.playing_icon = true;
        true
    }

    /// Append `track`; with `play_now`, play the new entry right away.
    pub fn add_to_queue(&mut self, track: Track, play_now: bool) {
        self.queue.push(track);
        if play_now {
            self.play_at(self.queue.len() - 1);
        }
    }

    /// Advance the queue. `auto` marks a call caused by the track ending.
    ///
    /// Repeat only applies to natural ends and wins over shuffle. Shuffle may
    /// pick the current track again. Plain advance stops at the last entry.
    pub fn next_track(&mut self, auto: bool) {
        if self.repeat && auto {
            self.media.set_current_time(0.0);
            self.start();
            return;
        }
        if self.shuffle {
            if self.queue.is_empty() {
                return;
            }
            let next = self.rng.random_range(0..self.queue.len());
            self.play_at(next);
            return;
        }
        let next = self.current.map_or(0, |c| c + 1);
        if next < self.queue.len() {
            self.play_at(next);
        }
    }

    /// Restart the current track past the threshold, otherwise step back.
    pub fn prev_track(&mut self) {
        if self.media.current_time() > self.restart_threshold {
            self.media.set_current_time(0.0);
            return;
        }
        if let Some(c) = self.current.filter(|&c| c > 0) {
            self.play_at(c - 1);
        }
    }

    pub fn skip_forward(&mut self) {
        let end = self.media.duration().unwrap_or(self.fallback_duration);
        let to = (self.media.current_time() + self.skip_secs).min(end);
        self.media.set_current_time(to);
    }

    pub fn skip_back(&mut self) {
        let to = (self.media.current_time() - self.skip_secs).max(0.0);
        self.media.set_current_time(to);
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    /// Play/pause button: start the queue if nothing is loaded yet.
    pub fn toggle_play(&mut self) {
        if !self.media.has_source() && !self.queue.is_empty() {
            self.play_at(0);
        } else if self.media.paused() {
            self.start();
        } else {
            self.media.pause();
        }
    }

    pub fn play(&mut self) {
        if self.media.has_source() {
            if self.media.paused() {
                self.start();
            }
        } else if !self.queue.is_empty() {
            self.play_at(0);
        }
    }

    pub fn pause(&mut self) {
        if !self.media.paused() {
            self.media.pause();
        }
    }

    /// Pause and rewind the current track.
    pub fn stop(&mut self) {
        self.pause();
        if self.media.has_source() {
            self.media.set_current_time(0.0);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.media.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        let v = self.media.volume() + delta;
        // Round to hundredths so repeated steps land on clean values.
        self.set_volume((v * 100.0).round() / 100.0);
    }

    /// The seek bar is being dragged to `percent`.
    pub fn seek_input(&mut self, percent: f64) {
        self.seeking = true;
        self.seek_value = percent.clamp(0.0, 100.0);
    }

    /// The drag finished at `percent`: seek the element there.
    pub fn seek_commit(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        let duration = self.media.duration().unwrap_or(0.0);
        self.media.set_current_time(duration * percent / 100.0);
        self.seek_value = percent;
        self.seeking = false;
    }

    fn sync_seek_bar(&mut self) {
        if self.seeking {
            return;
        }
        if let Some(d) = self.media.duration().filter(|d| d.is_finite() && *d > 0.0) {
            self.seek_value = (self.media.current_time() / d * 100.0).clamp(0.0, 100.0);
        }
    }

    /// React to one element event. Returns the message of an error event.
    pub fn handle_event(&mut self, event: MediaEvent) -> Option<String> {
        match event {
            MediaEvent::TimeUpdate => self.sync_seek_bar(),
            MediaEvent::Ended => self.next_track(true),
            MediaEvent::Play => self.playing_icon = true,
            MediaEvent::Pause => self.playing_icon = false,
            MediaEvent::Error(msg) => {
                warn!("media error: {msg}");
                return Some(msg);
            }
        }
        None
    }

    /// Drain pending element events. Returns the last error message seen.
    pub fn pump_events(&mut self) -> Option<String> {
        let mut last_error = None;
        while let Some(event) = self.media.next_event() {
            if let Some(msg) = self.handle_event(event) {
                last_error = Some(msg);
            }
        }
        last_error
    }
}
