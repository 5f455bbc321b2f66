//! UI-side lyrics state with a stale-reply guard.
//!
//! Loads are keyed by track id. A reply is applied only while its id still
//! matches the track the state was last pointed at, so a slow load can
//! never overwrite the lyrics of a newer track.

use super::loader::LyricsReply;
use super::parse::ParsedLyrics;
use super::sync;

#[derive(Debug, Default)]
pub struct LyricsState {
    /// Track id the state currently follows, if any.
    track_id: Option<String>,
    lyrics: Option<ParsedLyrics>,
    loading: bool,
}

impl LyricsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the state at a new track. Returns `true` when the caller
    /// should queue a load (the track is new and has a lyrics file).
    pub fn on_track_changed(&mut self, track_id: Option<&str>, has_lyrics: bool) -> bool {
        if self.track_id.as_deref() == track_id {
            return false;
        }
        self.track_id = track_id.map(str::to_string);
        self.lyrics = None;
        self.loading = track_id.is_some() && has_lyrics;
        self.loading
    }

    /// Apply a finished load; stale replies are dropped.
    pub fn on_reply(&mut self, reply: LyricsReply) {
        if self.track_id.as_deref() != Some(reply.track_id.as_str()) {
            return;
        }
        self.loading = false;
        self.lyrics = Some(reply.lyrics);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loaded lyrics with at least one timed line.
    pub fn lyrics(&self) -> Option<&ParsedLyrics> {
        self.lyrics.as_ref().filter(|l| !l.is_empty())
    }

    /// Index of the current line at playback time `at` seconds.
    pub fn current_line(&self, at: f64) -> Option<usize> {
        self.lyrics().and_then(|l| sync::current_line(&l.lines, at))
    }

    /// Index of the next upcoming line at playback time `at` seconds.
    pub fn next_line(&self, at: f64) -> Option<usize> {
        self.lyrics().and_then(|l| sync::next_line(&l.lines, at))
    }
}
