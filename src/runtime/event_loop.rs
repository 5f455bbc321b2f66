use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, PlayState};
use crate::catalog::Variant;
use crate::config;
use crate::lyrics::LyricsLoader;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
    /// Last-known playing index as emitted to MPRIS.
    last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    last_mpris_playback: PlayState,
    /// Last-known rendition as emitted to MPRIS (it shows in the url).
    last_mpris_variant: Variant,
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread, the lyrics loader and MPRIS. Returns `Ok(())` on shutdown.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    loader: &LyricsLoader,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState {
        pending_gg: false,
        last_mpris_index: None,
        last_mpris_playback: app.playback,
        last_mpris_variant: app.variant,
    };

    loop {
        // Sync playback state from the audio thread; optionally follow
        // now-playing. Clone the Arc handle to avoid borrowing `app`
        // immutably across mutations.
        let mut playback_index_snapshot: Option<usize> = None;
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                let idx_opt = info.index;
                app.playback = info.state;
                app.variant = info.variant;
                app.error = info.error.clone();
                drop(info);

                playback_index_snapshot = idx_opt;
                if let Some(idx) = idx_opt {
                    if app.follow_playback {
                        if let Some(pending) = app.pending_follow_index {
                            if pending == idx {
                                app.clear_pending_follow_index();
                                if app.selected != idx {
                                    app.set_selected(idx);
                                }
                            }
                        } else if app.selected != idx {
                            app.set_selected(idx);
                        }
                    }
                }
            }
        }

        // Point the lyrics state at the playing track. The state dedupes by
        // track id, so calling this every iteration queues at most one load
        // per track change.
        {
            let playing = playback_index_snapshot.and_then(|i| app.tracks().get(i));
            let track_id = playing.map(|t| t.id.clone());
            let lyrics_path = playing.and_then(|t| t.lyrics.clone());
            if app
                .lyrics
                .on_track_changed(track_id.as_deref(), lyrics_path.is_some())
            {
                if let (Some(id), Some(path)) = (track_id, lyrics_path) {
                    loader.request(id, path);
                }
            }
        }
        while let Some(reply) = loader.try_recv() {
            app.lyrics.on_reply(reply);
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if playback_index_snapshot != state.last_mpris_index
            || app.playback != state.last_mpris_playback
            || app.variant != state.last_mpris_variant
        {
            update_mpris(mpris, app);
            state.last_mpris_index = playback_index_snapshot;
            state.last_mpris_playback = app.playback;
            state.last_mpris_variant = app.variant;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        let mut quit = false;
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, audio_player) {
                quit = true;
            }
        }
        if quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, control_tx, state_path, &mut state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handle one MPRIS control command. Returns `true` on quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, audio_player: &AudioPlayer) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match app.playback {
            PlayState::Paused => {
                app.follow_playback_on();
                let _ = audio_player.send(AudioCmd::Resume);
            }
            PlayState::Stopped => {
                if app.has_tracks() {
                    app.follow_playback_on();
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
            PlayState::Loading | PlayState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlayState::Playing {
                let _ = audio_player.send(AudioCmd::Pause);
            }
        }
        ControlCmd::PlayPause => match app.playback {
            PlayState::Stopped => {
                if app.has_tracks() {
                    app.follow_playback_on();
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
            _ => {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
        },
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
        }
        ControlCmd::Next => {
            if app.has_tracks() {
                app.follow_playback_on();
                let _ = audio_player.send(AudioCmd::Next);
            }
        }
        ControlCmd::Prev => {
            if app.has_tracks() {
                app.follow_playback_on();
                let _ = audio_player.send(AudioCmd::Prev);
            }
        }
        ControlCmd::Seek(offset_micros) => {
            if let Some(secs) = seek_step_secs(offset_micros) {
                let _ = audio_player.send(AudioCmd::SeekBy(secs));
            }
        }
        ControlCmd::SetPosition(position_micros) => {
            let target = Duration::from_micros(position_micros.max(0) as u64);
            let _ = audio_player.send(AudioCmd::SeekTo(target));
        }
    }

    false
}

/// Convert an MPRIS seek offset (microseconds) to whole scrub seconds.
/// Rounds to the nearest second; a non-zero offset under half a second
/// still nudges one second in its direction rather than being dropped.
fn seek_step_secs(offset_micros: i64) -> Option<i64> {
    if offset_micros == 0 {
        return None;
    }
    let secs = (offset_micros as f64 / 1_000_000.0).round() as i64;
    Some(if secs == 0 { offset_micros.signum() } else { secs })
}

fn save_ui_state(app: &App, state_path: Option<&Path>) {
    if let Some(path) = state_path {
        if let Err(e) = app.ui_state.save(path) {
            eprintln!("encore: failed to save display state: {e}");
        }
    }
}

/// Handle one key press. Returns `true` on quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    state_path: Option<&Path>,
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                if app.has_tracks() {
                    app.follow_playback_off();
                    app.set_selected(0);
                }
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            let len = app.tracks().len();
            if len > 0 {
                app.follow_playback_off();
                app.set_selected(len - 1);
            }
        }
        KeyCode::Char('j') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.select_next();
        }
        KeyCode::Char('k') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.select_prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if app.has_tracks() {
                let is_playing_selected = app.playback == PlayState::Playing
                    && app
                        .playback_handle
                        .as_ref()
                        .and_then(|h| h.lock().ok().and_then(|info| info.index))
                        .map(|idx| idx == app.selected)
                        .unwrap_or(false);
                if !is_playing_selected {
                    app.follow_playback_on();
                    app.set_pending_follow_index(app.selected);
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char('v') => {
            state.pending_gg = false;
            let _ = audio_player.send(AudioCmd::ToggleVariant);
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.toggle_shuffle();
            let _ = audio_player.send(AudioCmd::SetShuffle(app.shuffle));
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            app.cycle_repeat();
            let _ = audio_player.send(AudioCmd::SetRepeat(app.repeat));
        }
        KeyCode::Char('y') => {
            state.pending_gg = false;
            app.cycle_lyrics_mode();
            save_ui_state(app, state_path);
        }
        KeyCode::Char('e') => {
            state.pending_gg = false;
            app.toggle_progress();
            save_ui_state(app, state_path);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}
