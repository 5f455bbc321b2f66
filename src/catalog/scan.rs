//! Directory-scan fallback for albums without an `album.toml`.
//!
//! Rendition pairing is by filename convention: a file whose stem ends in
//! ` (instrumental)` or `_instrumental` is the instrumental rendition of
//! the base stem; the base file is the vocal mix. A stem with no such
//! counterpart is treated as instrumental-only. Lyrics are attached from a
//! `.lrc` file sharing the base stem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use walkdir::WalkDir;

use super::model::{Album, Track, slug};

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "mp3" | "flac" | "wav" | "ogg"
            )
        })
        .unwrap_or(false)
}

/// If `stem` names an instrumental rendition, return the base stem it
/// belongs to.
fn instrumental_base(stem: &str) -> Option<String> {
    let lower = stem.to_ascii_lowercase();
    for suffix in ["(instrumental)", "_instrumental", "- instrumental"] {
        if let Some(pos) = lower.rfind(suffix) {
            if pos + suffix.len() == lower.len() {
                return Some(stem[..pos].trim_end().trim_end_matches('-').trim_end().to_string());
            }
        }
    }
    None
}

/// Read the duration from file metadata, if the file is readable at all.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

#[derive(Default)]
struct Pair {
    vocal: Option<PathBuf>,
    instrumental: Option<PathBuf>,
}

/// Scan `dir` and build an album catalog from the audio files found.
/// Returns an empty track list when the directory holds no audio; the
/// caller decides whether that is an error.
pub(super) fn scan_album(dir: &Path) -> Album {
    // Pairs are keyed by the base stem's path relative to the album root,
    // so equal stems in different subdirectories stay separate tracks.
    // BTreeMap keeps the track order stable (sorted by that path).
    let mut pairs: BTreeMap<PathBuf, Pair> = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let rel_dir = path
            .parent()
            .and_then(|p| p.strip_prefix(dir).ok())
            .unwrap_or(Path::new(""));

        match instrumental_base(stem) {
            Some(base) => {
                pairs.entry(rel_dir.join(base)).or_default().instrumental =
                    Some(path.to_path_buf());
            }
            None => {
                pairs.entry(rel_dir.join(stem)).or_default().vocal = Some(path.to_path_buf());
            }
        }
    }

    let tracks = pairs
        .into_iter()
        .filter_map(|(key, pair)| {
            // A lone base file is an instrumental-only track; a lone
            // instrumental keeps its role.
            let (instrumental, vocal) = match (pair.instrumental, pair.vocal) {
                (Some(i), v) => (i, v),
                (None, Some(v)) => (v, None),
                (None, None) => return None,
            };

            let title = key
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            // The sidecar lyric file lives next to the audio it belongs to.
            let lyrics = {
                let candidate = match &vocal {
                    Some(v) => v.with_extension("lrc"),
                    None => instrumental.with_file_name(format!("{title}.lrc")),
                };
                candidate.is_file().then_some(candidate)
            };
            let duration = vocal
                .as_deref()
                .and_then(probe_duration)
                .or_else(|| probe_duration(&instrumental));

            Some(Track {
                id: slug(&key.to_string_lossy()),
                display: title.clone(),
                title,
                instrumental,
                vocal,
                lyrics,
                duration,
            })
        })
        .collect();

    let title = dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("Album")
        .to_string();

    Album {
        title,
        artist: String::new(),
        tracks,
    }
}
