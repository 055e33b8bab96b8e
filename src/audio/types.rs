//! Audio-related small types.
//!
//! This module defines the command and event enums exchanged with the
//! playback engine thread, plus the single-subscriber event outlet.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use crate::track::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Report the natural end and stay there.
    Off,
    /// Replay the track from the start when it ends.
    One,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Swap in a new audio resource, prepared paused at position zero.
    Load(Track),
    /// Start or resume playback; restarts from zero after a natural end.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Jump to the given position (clamped to the known duration).
    SeekTo(Duration),
    /// Set sink volume in `0.0..=1.0`.
    SetVolume(f32),
    /// Set the repeat behavior at end of track.
    SetRepeat(RepeatMode),
    /// Replace the event subscriber; the previous one is detached first.
    Subscribe(Sender<PlayerEvent>),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Playback events reported back to the current subscriber.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A resource swap started; position and duration reset.
    LoadStarted,
    /// The resource decoded; `duration` is present when the source reports one.
    CanPlay { duration: Option<Duration> },
    /// Position report, emitted periodically while playing and after
    /// pause or seek.
    TimeUpdate { position: Duration },
    /// The track reached its natural end.
    Ended,
}

/// Failure to prepare a playable sink from an audio file.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}

/// Single-subscriber outlet for playback events.
///
/// Replacing the sender drops the previous one, so a stale subscription
/// disconnects before the replacement can see a single event.
pub(crate) struct EventOutlet {
    tx: Option<Sender<PlayerEvent>>,
}

impl EventOutlet {
    pub(crate) fn new() -> Self {
        Self { tx: None }
    }

    pub(crate) fn replace(&mut self, tx: Sender<PlayerEvent>) {
        self.tx = Some(tx);
    }

    /// Send to the current subscriber; a missing or hung-up one is fine.
    pub(crate) fn emit(&self, event: PlayerEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
