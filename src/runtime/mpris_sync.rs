use crate::app::App;
use crate::catalog::Variant;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let (now_playing_idx, variant) = if let Some(ref handle) = app.playback_handle {
        handle
            .lock()
            .ok()
            .map(|info| (info.index, info.variant))
            .unwrap_or((None, Variant::default()))
    } else {
        (None, Variant::default())
    };

    let track = now_playing_idx.and_then(|i| app.tracks().get(i));
    mpris.set_track_metadata(now_playing_idx, track, variant);
    mpris.set_playback(app.playback);
}
