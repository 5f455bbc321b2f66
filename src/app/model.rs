//! Application model: the `App` struct.
//!
//! `App` holds the album catalog, the cursor, mirrored playback state and
//! the lyrics/display preferences used by the UI and runtime. The audio
//! thread remains the source of truth for playback; `App` only keeps the
//! latest snapshot of it.

use crate::audio::{PlayState, PlaybackHandle, RepeatMode};
use crate::catalog::{Album, Track, Variant};
use crate::config::UiState;
use crate::lyrics::LyricsState;

pub struct App {
    pub album: Album,
    pub selected: usize,
    pub playback: PlayState,
    pub playback_handle: Option<PlaybackHandle>,

    pub follow_playback: bool,
    pub pending_follow_index: Option<usize>,

    pub repeat: RepeatMode,
    pub shuffle: bool,
    /// Rendition preference as last reported by the audio thread.
    pub variant: Variant,
    /// Last playback error as reported by the audio thread.
    pub error: Option<String>,

    pub lyrics: LyricsState,
    pub ui_state: UiState,
}

impl App {
    pub fn new(album: Album) -> Self {
        Self {
            album,
            selected: 0,
            playback: PlayState::Stopped,
            playback_handle: None,

            follow_playback: true,
            pending_follow_index: None,

            repeat: RepeatMode::default(),
            shuffle: false,
            variant: Variant::default(),
            error: None,

            lyrics: LyricsState::new(),
            ui_state: UiState::default(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.album.tracks
    }

    pub fn has_tracks(&self) -> bool {
        !self.album.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.album.tracks.get(self.selected)
    }

    /// Move the cursor to the next track, wrapping to the first.
    pub fn select_next(&mut self) {
        let len = self.album.tracks.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor to the previous track, wrapping to the last.
    pub fn select_prev(&mut self) {
        let len = self.album.tracks.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.album.tracks.len() {
            self.selected = idx;
        }
    }

    /// Cycle the repeat mode.
    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    /// Cycle the lyrics pane mode. The caller persists `ui_state`.
    pub fn cycle_lyrics_mode(&mut self) {
        self.ui_state.lyrics_mode = self.ui_state.lyrics_mode.cycled();
    }

    /// Toggle the progress gauge. The caller persists `ui_state`.
    pub fn toggle_progress(&mut self) {
        self.ui_state.show_progress = !self.ui_state.show_progress;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback and clear any pending follow index.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
        self.pending_follow_index = None;
    }

    /// Set an index to follow once playback information becomes available.
    pub fn set_pending_follow_index(&mut self, idx: usize) {
        self.pending_follow_index = Some(idx);
    }

    pub fn clear_pending_follow_index(&mut self) {
        self.pending_follow_index = None;
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }
}
