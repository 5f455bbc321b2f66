use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::*;

fn t(title: &str, vocal: bool) -> Track {
    Track {
        id: model::slug(title),
        title: title.into(),
        display: title.into(),
        instrumental: PathBuf::from(format!("/tmp/{title} (instrumental).mp3")),
        vocal: vocal.then(|| PathBuf::from(format!("/tmp/{title}.mp3"))),
        lyrics: None,
        duration: None,
    }
}

#[test]
fn slug_is_lowercase_dashed_alphanumeric() {
    assert_eq!(model::slug("Neon Skyline"), "neon-skyline");
    assert_eq!(model::slug("  Já! (reprise)  "), "já-reprise");
    assert_eq!(model::slug("A--B"), "a-b");
}

#[test]
fn source_for_vocal_falls_back_to_instrumental() {
    let with = t("With", true);
    assert_eq!(with.source_for(Variant::Vocal), with.vocal.as_deref().unwrap());
    assert_eq!(with.source_for(Variant::Instrumental), with.instrumental);

    let without = t("Without", false);
    assert_eq!(without.source_for(Variant::Vocal), without.instrumental);
    assert!(!without.has_vocals());
}

#[test]
fn variant_toggles_between_renditions() {
    assert_eq!(Variant::Vocal.toggled(), Variant::Instrumental);
    assert_eq!(Variant::Instrumental.toggled(), Variant::Vocal);
    assert_eq!(Variant::default(), Variant::Vocal);
}

#[test]
fn album_header_prefers_artist_dash_title() {
    let mut album = Album {
        title: "Afterglow".into(),
        artist: "Vera Lint".into(),
        tracks: vec![],
    };
    assert_eq!(album.header(), "Vera Lint - Afterglow");

    album.artist = "  ".into();
    assert_eq!(album.header(), "Afterglow");
}

#[test]
fn load_reads_manifest_and_resolves_paths() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(MANIFEST_NAME),
        r#"
title = "Afterglow"
artist = "Vera Lint"

[[tracks]]
title = "Neon Skyline"
instrumental = "01 (instrumental).mp3"
vocal = "01.mp3"
lyrics = "01.lrc"

[[tracks]]
id = "coda"
title = "Coda"
instrumental = "02.mp3"
"#,
    )
    .unwrap();

    let album = load(dir.path()).unwrap();
    assert_eq!(album.title, "Afterglow");
    assert_eq!(album.artist, "Vera Lint");
    assert_eq!(album.tracks.len(), 2);

    let first = &album.tracks[0];
    assert_eq!(first.id, "neon-skyline");
    assert!(first.has_vocals());
    assert_eq!(first.instrumental, dir.path().join("01 (instrumental).mp3"));
    assert_eq!(first.lyrics.as_deref(), Some(dir.path().join("01.lrc")).as_deref());
    // Files do not exist, so metadata probing yields no duration.
    assert!(first.duration.is_none());

    let second = &album.tracks[1];
    assert_eq!(second.id, "coda");
    assert!(!second.has_vocals());
    assert!(second.lyrics.is_none());
}

#[test]
fn load_rejects_manifest_without_tracks() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(MANIFEST_NAME), "title = \"Empty\"\n").unwrap();
    assert!(matches!(
        load(dir.path()),
        Err(CatalogError::EmptyAlbum(_))
    ));
}

#[test]
fn load_rejects_malformed_manifest() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(MANIFEST_NAME), "title = [not toml").unwrap();
    assert!(matches!(
        load(dir.path()),
        Err(CatalogError::ManifestParse { .. })
    ));
}

#[test]
fn load_without_manifest_falls_back_to_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Solo.mp3"), b"x").unwrap();

    let album = load(dir.path()).unwrap();
    assert_eq!(album.tracks.len(), 1);
    assert_eq!(album.tracks[0].title, "Solo");
}

#[test]
fn load_empty_directory_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(load(dir.path()), Err(CatalogError::EmptyAlbum(_))));
}
