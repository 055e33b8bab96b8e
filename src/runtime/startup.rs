use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, EventSubscription, RepeatMode};
use crate::config;

pub fn apply_playback_defaults(
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
) -> EventSubscription {
    // Playback defaults
    app.repeat = match settings.playback.repeat {
        config::RepeatSetting::Off => RepeatMode::Off,
        config::RepeatSetting::One => RepeatMode::One,
    };

    // Initialize the engine before handing it the track, so the first
    // decoded samples already come out at the configured volume.
    let _ = audio_player.send(AudioCmd::SetRepeat(app.repeat));
    let _ = audio_player.send(app.set_volume(settings.playback.volume));

    audio_player.load(app.track.clone())
}
