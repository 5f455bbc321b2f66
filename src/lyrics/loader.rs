//! Background lyrics loading.
//!
//! Reading and parsing an LRC file happens off the UI thread. Every reply
//! carries the track id of its request so that `LyricsState` can discard
//! replies that arrive after the user has already switched tracks.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::parse::{ParsedLyrics, parse_lrc};

#[derive(Debug)]
pub struct LyricsRequest {
    pub track_id: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct LyricsReply {
    pub track_id: String,
    pub lyrics: ParsedLyrics,
}

pub struct LyricsLoader {
    tx: Sender<LyricsRequest>,
    rx: Receiver<LyricsReply>,
}

impl LyricsLoader {
    /// Queue a load. A dropped worker means shutdown; the request is
    /// silently discarded then.
    pub fn request(&self, track_id: String, path: PathBuf) {
        let _ = self.tx.send(LyricsRequest { track_id, path });
    }

    /// Non-blocking poll for the next finished load.
    pub fn try_recv(&self) -> Option<LyricsReply> {
        self.rx.try_recv().ok()
    }
}

/// Spawn the loader worker thread and return its handle.
///
/// An unreadable file parses as empty lyrics: lyric problems never become
/// playback problems.
pub fn spawn_loader() -> LyricsLoader {
    let (req_tx, req_rx) = mpsc::channel::<LyricsRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<LyricsReply>();

    thread::spawn(move || {
        for req in req_rx {
            let lyrics = match std::fs::read_to_string(&req.path) {
                Ok(raw) => parse_lrc(&raw),
                Err(_) => ParsedLyrics::default(),
            };
            if reply_tx
                .send(LyricsReply {
                    track_id: req.track_id,
                    lyrics,
                })
                .is_err()
            {
                break;
            }
        }
    });

    LyricsLoader {
        tx: req_tx,
        rx: reply_rx,
    }
}
