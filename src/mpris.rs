//! MPRIS bridge (`org.mpris.MediaPlayer2.encore`).
//!
//! A dedicated thread serves the D-Bus interfaces. Remote method calls
//! are forwarded into the runtime event loop as `ControlCmd` values; the
//! event loop mirrors widget state back through `MprisHandle`, and a
//! notify channel wakes this thread to emit property-change signals so
//! desktop widgets update without polling.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use async_io::block_on;
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;
use crate::track::Track;

/// The card exposes exactly one track object on the bus.
const TRACK_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2/track/0";

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    /// Relative seek in microseconds (may be negative).
    Seek(i64),
    /// Absolute position in microseconds.
    SetPosition(i64),
    /// Volume as `0.0..=1.0`.
    SetVolume(f64),
    SetShuffle(bool),
    /// `true` selects repeat-one, `false` no repeat.
    SetLoopOne(bool),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    volume: f64,
    shuffle: bool,
    loop_one: bool,
    track_id: Option<ObjectPath<'static>>,
}

/// Event-loop side handle that mirrors widget state onto the bus.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    /// Publish the track descriptor, or clear it with `None`.
    pub fn set_track_metadata(&self, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.title.clone());
                    s.artist = t.artist.clone().into_iter().collect();
                    s.album = t.album.clone();
                    s.url = Some(format!("file://{}", t.path.display()));
                    s.length_micros = t.duration.map(|d| d.as_micros() as i64);
                    s.track_id = ObjectPath::try_from(TRACK_OBJECT_PATH).ok();
                }
                None => {
                    s.title = None;
                    s.artist = Vec::new();
                    s.album = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }

    /// Mirror the playback phase.
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Refresh the length once the engine reports the real duration.
    pub fn set_length(&self, length: Option<Duration>) {
        if let Ok(mut s) = self.state.lock() {
            s.length_micros = length.map(|d| d.as_micros() as i64);
        }
        let _ = self.notify.send(());
    }

    /// Mirror the position. Positions change continuously; this does not
    /// wake the signal emitter.
    pub fn set_position(&self, position: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = position.as_micros() as i64;
        }
    }

    /// Mirror the volume as `0.0..=1.0`.
    pub fn set_volume(&self, volume: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.volume = volume;
        }
        let _ = self.notify.send(());
    }

    /// Mirror the shuffle and repeat toggles.
    pub fn set_modes(&self, shuffle: bool, loop_one: bool) {
        if let Ok(mut s) = self.state.lock() {
            s.shuffle = shuffle;
            s.loop_one = loop_one;
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
        // Single track: nothing to advance to.
    }

    fn previous(&self) {}

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

    fn set_position(&self, track_id: ObjectPath<'_>, position: i64) {
        // Requests for a track id we never announced are stale; drop them.
        let matches = self
            .state
            .lock()
            .ok()
            .and_then(|s| s.track_id.as_ref().map(|t| t.as_str() == track_id.as_str()))
            .unwrap_or(false);
        if matches {
            let _ = self.tx.send(ControlCmd::SetPosition(position));
        }
    }

    fn open_uri(&self, _uri: String) {
        // The card plays one fixed resource.
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused | PlaybackState::Loading => "Paused",
            PlaybackState::Idle | PlaybackState::Ended => "Stopped",
        }
    }

    #[zbus(property)]
    fn loop_status(&self) -> &str {
        let loop_one = self.state.lock().map(|s| s.loop_one).unwrap_or(false);
        if loop_one { "Track" } else { "None" }
    }

    #[zbus(property)]
    fn set_loop_status(&self, status: &str) {
        let _ = self.tx.send(ControlCmd::SetLoopOne(status == "Track"));
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn set_rate(&self, _rate: f64) {}

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        self.state.lock().map(|s| s.shuffle).unwrap_or(false)
    }

    #[zbus(property)]
    fn set_shuffle(&self, shuffle: bool) {
        let _ = self.tx.send(ControlCmd::SetShuffle(shuffle));
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    #[zbus(property)]
    fn set_volume(&self, volume: f64) {
        let _ = self.tx.send(ControlCmd::SetVolume(volume.clamp(0.0, 1.0)));
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
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
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(tid) = &s.track_id {
            insert_value(&mut map, "mpris:trackid", Value::from(tid.clone()));
        }
        if let Some(title) = &s.title {
            insert_value(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert_value(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            insert_value(&mut map, "xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            insert_value(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(length) = s.length_micros {
            insert_value(&mut map, "mpris:length", Value::from(length));
        }
        map
    }
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(serve(tx, state_for_thread, notify_rx));
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify_rx: Receiver<()>) {
    let path = "/org/mpris/MediaPlayer2";

    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!("MPRIS: failed to connect to session bus: {e}");
            return;
        }
    };

    if let Err(e) = connection
        .request_name("org.mpris.MediaPlayer2.encore")
        .await
    {
        warn!("MPRIS: failed to acquire name: {e}");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
        warn!("MPRIS: failed to register root iface: {e}");
        return;
    }

    if let Err(e) = object_server.at(path, PlayerIface { tx, state }).await {
        warn!("MPRIS: failed to register player iface: {e}");
        return;
    }

    let player_ref = match object_server.interface::<_, PlayerIface>(path).await {
        Ok(r) => r,
        Err(e) => {
            warn!("MPRIS: failed to look up player iface: {e}");
            return;
        }
    };

    // Emit changed signals whenever the event loop pokes the notify
    // channel; the loop doubles as the keep-alive for this thread.
    loop {
        match notify_rx.recv_timeout(Duration::from_millis(250)) {
            Ok(()) => {
                // Coalesce bursts into a single round of signals.
                while notify_rx.try_recv().is_ok() {}

                let iface = player_ref.get().await;
                let emitter = player_ref.signal_emitter();
                let _ = iface.playback_status_changed(emitter).await;
                let _ = iface.metadata_changed(emitter).await;
                let _ = iface.volume_changed(emitter).await;
                let _ = iface.shuffle_changed(emitter).await;
                let _ = iface.loop_status_changed(emitter).await;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests;
