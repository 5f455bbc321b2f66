//! `album.toml` manifest loading.
//!
//! The manifest is the static catalog: it fixes track order, titles and
//! the rendition/lyric files for each track. Paths are relative to the
//! album directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::{Album, Track, slug};
use super::scan::probe_duration;
use super::CatalogError;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
struct ManifestTrack {
    id: Option<String>,
    title: String,
    instrumental: String,
    vocal: Option<String>,
    lyrics: Option<String>,
}

/// Load an album catalog from `path`. Missing audio files are kept in the
/// catalog; playback surfaces the error for that track without blocking
/// navigation to the others.
pub(super) fn load_manifest(path: &Path) -> Result<Album, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: ManifestFile =
        toml::from_str(&raw).map_err(|source| CatalogError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let resolve = |rel: &str| -> PathBuf { dir.join(rel) };

    let tracks = manifest
        .tracks
        .into_iter()
        .map(|t| {
            let instrumental = resolve(&t.instrumental);
            let vocal = t.vocal.as_deref().map(resolve);
            let duration = vocal
                .as_deref()
                .and_then(probe_duration)
                .or_else(|| probe_duration(&instrumental));
            Track {
                id: t.id.unwrap_or_else(|| slug(&t.title)),
                display: t.title.clone(),
                title: t.title,
                instrumental,
                vocal,
                lyrics: t.lyrics.as_deref().map(resolve),
                duration,
            }
        })
        .collect::<Vec<_>>();

    if tracks.is_empty() {
        return Err(CatalogError::EmptyAlbum(dir.to_path_buf()));
    }

    Ok(Album {
        title: manifest.title,
        artist: manifest.artist,
        tracks,
    })
}
