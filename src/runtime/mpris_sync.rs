use crate::app::App;
use crate::audio::MediaElement;
use crate::mpris::MprisHandle;

pub fn update_mpris<M: MediaElement>(mpris: &MprisHandle, app: &App<M>) {
    let c = &app.controller;
    mpris.set_track_metadata(c.current(), c.now_playing());
    mpris.set_playback(c.playback_state());
}
