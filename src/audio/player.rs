use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::library::MediaSource;

use super::element::MediaElement;
use super::thread::spawn_audio_thread;
use super::types::{
    AudioCmd, MediaError, MediaEvent, PlaybackHandle, PlaybackInfo, TransportState,
};

/// The rodio-backed media element.
///
/// Commands go to the audio thread over a channel. Reads come from the shared
/// `PlaybackInfo`, which is updated optimistically here and authoritatively by
/// the thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings, volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume: volume.clamp(0.0, 1.0),
            ..PlaybackInfo::default()
        }));

        let audio_handle = spawn_audio_thread(rx, event_tx, playback_info.clone(), audio_settings);

        Self {
            tx,
            events: event_rx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// Build a player wired to caller-owned channel ends, with no audio thread.
    #[cfg(test)]
    pub(super) fn detached(
        tx: Sender<AudioCmd>,
        events: Receiver<MediaEvent>,
        playback: PlaybackHandle,
    ) -> Self {
        Self {
            tx,
            events,
            playback,
            join: Mutex::new(None),
        }
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }

    fn info(&self) -> Option<MutexGuard<'_, PlaybackInfo>> {
        self.playback.lock().ok()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaElement for AudioPlayer {
    fn load(&mut self, src: &MediaSource) {
        if let Some(mut info) = self.info() {
            info.src = Some(src.clone());
            info.state = TransportState::Loading;
            info.paused = true;
            info.position = Duration::ZERO;
            info.duration = None;
        }
        let _ = self.send(AudioCmd::Load(src.clone()));
    }

    fn has_source(&self) -> bool {
        self.info().is_some_and(|i| i.src.is_some())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if !self.has_source() {
            return Err(MediaError::NoSource);
        }
        self.send(AudioCmd::Play)?;
        if let Some(mut info) = self.info() {
            info.paused = false;
            if info.state == TransportState::Ended {
                info.position = Duration::ZERO;
            }
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(mut info) = self.info() {
            info.paused = true;
        }
        let _ = self.send(AudioCmd::Pause);
    }

    fn paused(&self) -> bool {
        self.info().is_none_or(|i| i.paused)
    }

    fn current_time(&self) -> f64 {
        self.info().map_or(0.0, |i| i.position.as_secs_f64())
    }

    fn set_current_time(&mut self, secs: f64) {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        let to = Duration::from_secs_f64(secs);
        if let Some(mut info) = self.info().filter(|i| i.src.is_some()) {
            info.position = match info.duration {
                Some(d) => to.min(d),
                None => to,
            };
        }
        let _ = self.send(AudioCmd::Seek(to));
    }

    fn duration(&self) -> Option<f64> {
        self.info()
            .and_then(|i| i.duration)
            .map(|d| d.as_secs_f64())
    }

    fn volume(&self) -> f32 {
        self.info().map_or(1.0, |i| i.volume)
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if let Some(mut info) = self.info() {
            info.volume = volume;
        }
        let _ = self.send(AudioCmd::SetVolume(volume));
    }

    fn next_event(&mut self) -> Option<MediaEvent> {
        self.events.try_recv().ok()
    }
}
