//! Album catalog types: `Album`, `Track` and the audio `Variant`.
//!
//! A catalog is built once at startup (from `album.toml` or a directory
//! scan) and never mutated afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which audio rendition of a track to play.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Variant {
    /// The full mix with vocals.
    Vocal,
    /// The instrumental-only rendition.
    Instrumental,
}

impl Default for Variant {
    fn default() -> Self {
        Self::Vocal
    }
}

impl Variant {
    /// The other rendition.
    pub fn toggled(self) -> Self {
        match self {
            Self::Vocal => Self::Instrumental,
            Self::Instrumental => Self::Vocal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vocal => "vocal",
            Self::Instrumental => "instrumental",
        }
    }
}

/// One album track with its audio rendition files and optional lyrics.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub display: String,
    /// Instrumental rendition; every track has one.
    pub instrumental: PathBuf,
    /// Vocal rendition, when the track has vocals at all.
    pub vocal: Option<PathBuf>,
    /// Synced lyrics file (LRC), when one exists.
    pub lyrics: Option<PathBuf>,
    /// Duration as read from file metadata. A placeholder only: the
    /// decoder's reported duration wins once the track is loaded.
    pub duration: Option<Duration>,
}

impl Track {
    pub fn has_vocals(&self) -> bool {
        self.vocal.is_some()
    }

    /// Resolve the audio file for `variant`. Asking for vocals on a track
    /// that has none falls back to the instrumental file.
    pub fn source_for(&self, variant: Variant) -> &Path {
        match variant {
            Variant::Vocal => self.vocal.as_deref().unwrap_or(&self.instrumental),
            Variant::Instrumental => &self.instrumental,
        }
    }
}

/// The immutable album catalog.
#[derive(Debug, Clone)]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub tracks: Vec<Track>,
}

impl Album {
    /// Header line for the UI: "Artist - Title" when both are known.
    pub fn header(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.artist.trim(), self.title)
        }
    }
}

/// Derive a stable track id from a title ("Neon Skyline" -> "neon-skyline").
pub(super) fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
