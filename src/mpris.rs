//! MPRIS (`org.mpris.MediaPlayer2`) integration over the session bus.
//!
//! The interface is fire-and-forget: property changes are pushed when the
//! runtime notifies us, no delivery is guaranteed, and every bus failure
//! degrades to a stderr note. The player runs fine without a session bus.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

use async_io::block_on;
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::audio::PlayState;
use crate::catalog::{Track, Variant};

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek in microseconds, as MPRIS specifies it.
    Seek(i64),
    /// Absolute position in microseconds for the current track.
    SetPosition(i64),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlayState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Album-level metadata, set once at startup.
    pub fn set_album_info(&self, artist: &str, album: &str) {
        if let Ok(mut s) = self.state.lock() {
            s.artist = if artist.trim().is_empty() {
                Vec::new()
            } else {
                vec![artist.trim().to_string()]
            };
            s.album = (!album.trim().is_empty()).then(|| album.trim().to_string());
        }
        let _ = self.notify.send(());
    }

    /// Per-track metadata for the rendition in effect; `None` clears it.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>, variant: Variant) {
        if let Ok(mut s) = self.state.lock() {
            match (index, track) {
                (Some(i), Some(t)) => {
                    s.title = Some(t.title.clone());
                    s.url = Some(format!("file://{}", t.source_for(variant).display()));
                    s.length_micros = t.duration.map(|d| d.as_micros() as i64);
                    s.track_id = format!("/org/mpris/MediaPlayer2/track/{i}")
                        .try_into()
                        .ok();
                }
                _ => {
                    s.title = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::Seek(offset));
    }

    fn set_position(&self, track_id: zvariant::ObjectPath<'_>, position: i64) {
        // Positions for a track other than the current one are stale.
        let matches = self
            .state
            .lock()
            .map(|s| {
                s.track_id.as_ref().map(|p| p.as_str()) == Some(track_id.as_str())
            })
            .unwrap_or(false);
        if matches && position >= 0 {
            let _ = self.tx.send(ControlCmd::SetPosition(position));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlayState::Stopped => "Stopped",
            // Loading settles in Paused; MPRIS has no richer word for it.
            PlayState::Loading | PlayState::Paused => "Paused",
            PlayState::Playing => "Playing",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        fn put(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        }

        if let Some(id) = &s.track_id {
            put(&mut map, "mpris:trackid", Value::from((**id).clone()));
        }
        if let Some(len) = s.length_micros {
            put(&mut map, "mpris:length", Value::from(len));
        }
        if let Some(title) = &s.title {
            put(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put(&mut map, "xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            put(&mut map, "xesam:url", Value::from(url.clone()));
        }
        map
    }
}

/// Register the MPRIS service and return the handle used to push state.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.encore")
                .await
            {
                eprintln!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                eprintln!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                eprintln!("MPRIS: failed to register player iface: {e}");
                return;
            }

            let player_ref = match object_server.interface::<_, PlayerIface>(path).await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("MPRIS: failed to resolve player iface: {e}");
                    return;
                }
            };

            // Push PropertiesChanged whenever the runtime nudges us. The
            // channel closing means shutdown.
            while notify_rx.recv().is_ok() {
                let iface = player_ref.get().await;
                let emitter = player_ref.signal_emitter();
                let _ = iface.playback_status_changed(emitter).await;
                let _ = iface.metadata_changed(emitter).await;
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
