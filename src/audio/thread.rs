use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::config::AudioSettings;
use crate::library::MediaSource;

use super::sink::{LoadedMedia, create_sink_at, open_media};
use super::types::{
    AudioCmd, MediaError, MediaEvent, PlaybackHandle, PlaybackInfo, TransportState,
};

/// Everything the audio thread knows about the current source.
struct Deck {
    media: Option<LoadedMedia>,
    sink: Option<Sink>,
    paused: bool,
    ended: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
    events: Sender<MediaEvent>,
    info: PlaybackHandle,
}

impl Deck {
    fn new(events: Sender<MediaEvent>, info: PlaybackHandle) -> Self {
        let volume = info.lock().map(|i| i.volume).unwrap_or(1.0);
        Self {
            media: None,
            sink: None,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
            volume,
            events,
            info,
        }
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn update_info(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.info.lock() {
            f(&mut info);
        }
    }

    fn elapsed(&self) -> Duration {
        let elapsed = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.media.as_ref().and_then(|m| m.duration) {
            Some(d) => elapsed.min(d),
            None => elapsed,
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn load(&mut self, src: MediaSource, stream: &OutputStream, http: &reqwest::blocking::Client) {
        self.stop_sink();
        self.media = None;
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        let loaded = open_media(&src, http)
            .and_then(|media| create_sink_at(stream, &media, Duration::ZERO, self.volume).map(|sink| (media, sink)));

        match loaded {
            Ok((media, sink)) => {
                info!(%src, duration = ?media.duration, "loaded");
                let duration = media.duration;
                self.media = Some(media);
                self.sink = Some(sink);
                self.update_info(|i| {
                    if i.src.as_ref() == Some(&src) {
                        i.state = TransportState::Paused;
                        i.duration = duration;
                    }
                });
            }
            Err(e) => {
                warn!(%src, "failed to load: {e}");
                self.update_info(|i| {
                    if i.src.as_ref() == Some(&src) {
                        i.state = TransportState::Idle;
                        i.paused = true;
                    }
                });
                self.emit(MediaEvent::Error(e.to_string()));
            }
        }
    }

    /// Replace the sink with one positioned at `at`, keeping paused/playing.
    fn rebuild_at(&mut self, at: Duration, stream: &OutputStream) -> bool {
        let Some(media) = self.media.as_ref() else {
            return false;
        };
        let at = match media.duration {
            Some(d) => at.min(d),
            None => at,
        };

        match create_sink_at(stream, media, at, self.volume) {
            Ok(new_sink) => {
                self.stop_sink();
                if self.paused {
                    self.started_at = None;
                } else {
                    new_sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(new_sink);
                self.accumulated = at;
                self.ended = false;
                true
            }
            Err(e) => {
                warn!("failed to rebuild sink: {e}");
                self.emit(MediaEvent::Error(e.to_string()));
                false
            }
        }
    }

    fn play(&mut self, stream: &OutputStream) {
        if self.media.is_none() {
            debug!("play requested without a loaded source");
            return;
        }
        if self.ended && !self.rebuild_at(Duration::ZERO, stream) {
            return;
        }
        if !self.paused {
            return;
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.paused = false;
        self.started_at = Some(Instant::now());
        self.update_info(|i| {
            i.state = TransportState::Playing;
            i.paused = false;
        });
        self.emit(MediaEvent::Play);
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
        let position = self.elapsed();
        self.update_info(|i| {
            i.state = TransportState::Paused;
            i.paused = true;
            i.position = position;
        });
        self.emit(MediaEvent::Pause);
    }

    fn seek(&mut self, to: Duration, stream: &OutputStream) {
        if !self.rebuild_at(to, stream) {
            return;
        }
        let position = self.accumulated;
        let paused = self.paused;
        self.update_info(|i| {
            i.position = position;
            i.state = if paused {
                TransportState::Paused
            } else {
                TransportState::Playing
            };
        });
        self.emit(MediaEvent::TimeUpdate);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
        self.update_info(|i| i.volume = volume);
    }

    /// Periodic progress check: publish the position and detect the end.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            let end = self
                .media
                .as_ref()
                .and_then(|m| m.duration)
                .unwrap_or_else(|| self.elapsed());
            self.started_at = None;
            self.accumulated = end;
            self.paused = true;
            self.ended = true;
            self.update_info(|i| {
                i.position = end;
                i.paused = true;
                i.state = TransportState::Ended;
            });
            self.emit(MediaEvent::TimeUpdate);
            self.emit(MediaEvent::Pause);
            self.emit(MediaEvent::Ended);
            return;
        }

        let position = self.elapsed();
        self.update_info(|i| i.position = position);
        self.emit(MediaEvent::TimeUpdate);
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || self.paused {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!("no audio output device: {e}");
                let err = MediaError::Output(e.to_string());
                let _ = events.send(MediaEvent::Error(err.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let http = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(audio_settings.fetch_timeout_secs))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                error!("failed to build HTTP client for audio: {e}");
                let _ = events.send(MediaEvent::Error(e.to_string()));
                return;
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut deck = Deck::new(events, playback_info);

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(src) => deck.load(src, &stream, &http),
                    AudioCmd::Play => deck.play(&stream),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Seek(to) => deck.seek(to, &stream),
                    AudioCmd::SetVolume(v) => deck.set_volume(v),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.fade_out(fade_out_ms);
                        deck.stop_sink();
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        deck.update_info(|i| i.paused = true);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread exiting");
    })
}
