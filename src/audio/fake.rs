//! In-memory media element for tests.

use std::collections::VecDeque;

use crate::library::MediaSource;

use super::element::MediaElement;
use super::types::{MediaError, MediaEvent};

/// Synchronous stand-in for `AudioPlayer`: every command takes effect at once
/// and queues the events a real element would emit.
#[derive(Debug)]
pub struct FakeMedia {
    pub src: Option<MediaSource>,
    pub paused: bool,
    pub time: f64,
    pub duration: Option<f64>,
    pub volume: f32,
    pub ended: bool,
    /// Duration assigned to every newly loaded source.
    pub load_duration: Option<f64>,
    /// When set, `play` fails with this error kind.
    pub fail_play: bool,
    pub loads: Vec<MediaSource>,
    pub plays: usize,
    pub seeks: Vec<f64>,
    events: VecDeque<MediaEvent>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            src: None,
            paused: true,
            time: 0.0,
            duration: None,
            volume: 1.0,
            ended: false,
            load_duration: Some(30.0),
            fail_play: false,
            loads: Vec::new(),
            plays: 0,
            seeks: Vec::new(),
            events: VecDeque::new(),
        }
    }
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play through to the end, emitting what the real element emits.
    pub fn finish(&mut self) {
        if let Some(d) = self.duration {
            self.time = d;
        }
        self.paused = true;
        self.ended = true;
        self.events.push_back(MediaEvent::TimeUpdate);
        self.events.push_back(MediaEvent::Pause);
        self.events.push_back(MediaEvent::Ended);
    }

    pub fn push_event(&mut self, event: MediaEvent) {
        self.events.push_back(event);
    }

    pub fn drain_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }

    pub fn last_loaded(&self) -> Option<&MediaSource> {
        self.loads.last()
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, src: &MediaSource) {
        self.src = Some(src.clone());
        self.loads.push(src.clone());
        self.paused = true;
        self.ended = false;
        self.time = 0.0;
        self.duration = self.load_duration;
    }

    fn has_source(&self) -> bool {
        self.src.is_some()
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.src.is_none() {
            return Err(MediaError::NoSource);
        }
        if self.fail_play {
            return Err(MediaError::Output("fake output failure".into()));
        }
        if self.ended {
            self.time = 0.0;
            self.ended = false;
        }
        self.plays += 1;
        if self.paused {
            self.paused = false;
            self.events.push_back(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push_back(MediaEvent::Pause);
        }
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, secs: f64) {
        let secs = secs.max(0.0);
        self.time = match self.duration {
            Some(d) => secs.min(d),
            None => secs,
        };
        self.ended = false;
        self.seeks.push(secs);
        self.events.push_back(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn next_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }
}
