//! Album catalog: static track table with rendition and lyric files.
//!
//! The catalog comes from an `album.toml` manifest when one exists in the
//! album directory, otherwise from a filename-convention directory scan.

use std::path::{Path, PathBuf};

use thiserror::Error;

mod manifest;
mod model;
mod scan;

pub use model::*;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read album manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse album manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no album tracks found in {}", .0.display())]
    EmptyAlbum(PathBuf),
}

/// Name of the manifest file looked up inside the album directory.
pub const MANIFEST_NAME: &str = "album.toml";

/// Build the album catalog for `dir`.
pub fn load(dir: &Path) -> Result<Album, CatalogError> {
    let manifest_path = dir.join(MANIFEST_NAME);
    if manifest_path.is_file() {
        return manifest::load_manifest(&manifest_path);
    }

    let album = scan::scan_album(dir);
    if album.tracks.is_empty() {
        return Err(CatalogError::EmptyAlbum(dir.to_path_buf()));
    }
    Ok(album)
}
