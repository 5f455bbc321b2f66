//! Utilities for creating `rodio` sinks from audio files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position. Failures are the
//! recoverable kind: they become a message in the playback snapshot, not
//! a crash.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}

pub(super) struct LoadedSink {
    pub sink: Sink,
    /// Duration as reported by the decoder, when the format knows it.
    pub duration: Option<Duration>,
}

/// Create a paused `Sink` for the file at `path` that starts playback at
/// `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<LoadedSink, PlayError> {
    let file = File::open(path).map_err(|source| PlayError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|source| PlayError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = source.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = source.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(LoadedSink { sink, duration })
}
