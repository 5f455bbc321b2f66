//! Audio-related small types and handles.
//!
//! This module defines the command enum, playback snapshot and shared
//! handle used by the audio subsystem.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Variant;

/// How long into a track the `Prev` command restarts it instead of moving
/// to the prior track.
pub const PREV_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop after the last track of the sequence.
    Off,
    /// Wrap around indefinitely.
    All,
    /// Replay the current track when it ends.
    One,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

impl RepeatMode {
    /// Cycle `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }
}

/// The playback state machine's externally visible states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    /// A source is being opened and decoded; settles in `Paused`.
    Loading,
    Paused,
    Playing,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Decode the track at the given index and settle paused at 0:00.
    Load(usize),
    /// Decode the track at the given index and start playing.
    Play(usize),
    /// Resume the current track; retries a failed load when stopped.
    Resume,
    /// Pause playback. Always succeeds synchronously.
    Pause,
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback and release the current source.
    Stop,
    /// Seek to an absolute position, clamped to the track duration.
    SeekTo(Duration),
    /// Scrub by the given number of seconds (positive or negative).
    SeekBy(i64),
    /// Skip to the next track (wraps; draws from the shuffle queue when on).
    Next,
    /// Restart the current track, or go to the prior one near its start.
    Prev,
    /// Swap vocal/instrumental rendition, keeping position and play flag.
    ToggleVariant,
    SetRepeat(RepeatMode),
    SetShuffle(bool),
    /// Quit the audio thread.
    Quit,
}

/// Runtime playback snapshot shared with the UI and MPRIS.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Currently loaded track index in the catalog (if any).
    pub index: Option<usize>,
    pub state: PlayState,
    /// Rendition preference currently in effect.
    pub variant: Variant,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Duration as reported by the decoder once the source is loaded,
    /// falling back to the catalog placeholder.
    pub duration: Option<Duration>,
    /// Last recoverable playback error, cleared on the next success.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
