use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::track::Track;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlayerEvent};

/// Scope-bound subscription to playback events.
///
/// Only one subscription is live at a time: creating a new one detaches
/// the previous receiver before any further event is delivered. Dropping
/// the subscription simply stops listening.
pub struct EventSubscription {
    rx: Receiver<PlayerEvent>,
}

impl EventSubscription {
    /// Drain everything the engine emitted since the last call.
    pub fn drain(&self) -> impl Iterator<Item = PlayerEvent> + '_ {
        self.rx.try_iter()
    }
}

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx);

        Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// Attach a fresh event subscription, detaching the previous one.
    pub fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = mpsc::channel::<PlayerEvent>();
        let _ = self.send(AudioCmd::Subscribe(tx));
        EventSubscription { rx }
    }

    /// Swap in `track`: subscribe first, then load, so the returned
    /// subscription sees the load from its first event on.
    pub fn load(&self, track: Track) -> EventSubscription {
        let subscription = self.subscribe();
        let _ = self.send(AudioCmd::Load(track));
        subscription
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
