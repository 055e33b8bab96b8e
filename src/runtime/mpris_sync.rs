use crate::app::App;
use crate::audio::RepeatMode;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_track_metadata(Some(&app.track));
    mpris.set_length(app.duration);
    mpris.set_playback(app.playback);
    mpris.set_volume(f64::from(app.volume) / 100.0);
    mpris.set_modes(app.shuffle, app.repeat == RepeatMode::One);
    mpris.set_position(app.position);
}
