//! Persisted display preferences.
//!
//! Unlike `Settings` (read-only configuration), `UiState` is written back
//! on every change: loaded once at startup, saved whenever the user
//! toggles a display preference. Load failures fall back to defaults;
//! save failures are ignored — losing a display preference is not worth
//! interrupting playback for.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};

/// How the lyrics pane renders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LyricsMode {
    /// No lyrics pane.
    Off,
    /// Current line plus the upcoming one.
    Current,
    /// The whole document with the current line highlighted.
    Full,
}

impl Default for LyricsMode {
    fn default() -> Self {
        Self::Current
    }
}

impl LyricsMode {
    /// Cycle `Off -> Current -> Full -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::Current,
            Self::Current => Self::Full,
            Self::Full => Self::Off,
        }
    }
}

/// Display preferences that survive restarts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub lyrics_mode: LyricsMode,
    /// Whether the playback progress gauge is shown.
    pub show_progress: bool,
}

impl UiState {
    /// Load persisted state from `path`; any failure means defaults.
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| toml::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Write the state to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string(self).map_err(std::io::Error::other)?;
        fs::write(path, raw)
    }
}

/// Resolve the state path from `ENCORE_STATE_PATH` or XDG defaults
/// (`$XDG_DATA_HOME/encore/state.toml` or `~/.local/share/encore/state.toml`).
pub fn resolve_state_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_STATE_PATH") {
        return Some(PathBuf::from(p));
    }
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };
    data_home.map(|d| d.join("encore").join("state.toml"))
}
