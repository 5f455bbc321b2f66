use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, RepeatMode};
use crate::config;

pub fn apply_playback_defaults(
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
) {
    app.shuffle = settings.playback.shuffle;
    app.repeat = match settings.playback.repeat {
        config::RepeatSetting::Off => RepeatMode::Off,
        config::RepeatSetting::All => RepeatMode::All,
        config::RepeatSetting::One => RepeatMode::One,
    };

    // Initialize playback defaults in the audio thread.
    let _ = audio_player.send(AudioCmd::SetShuffle(app.shuffle));
    let _ = audio_player.send(AudioCmd::SetRepeat(app.repeat));

    // Preload the first track paused so the first play starts instantly.
    if app.has_tracks() {
        let _ = audio_player.send(AudioCmd::Load(0));
    }
}
