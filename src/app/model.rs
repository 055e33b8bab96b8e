//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the track, the playback phase and the control
//! toggles shown on the card. All mutation goes through the update
//! methods here; the ones with an engine side effect return the
//! `AudioCmd` the caller should send, which keeps the model itself pure
//! and testable without an audio device.

use std::time::Duration;

use crate::art::CoverArt;
use crate::audio::{AudioCmd, PlayerEvent, RepeatMode};
use crate::track::Track;

/// Lifecycle phase of the card's audio resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded yet.
    Idle,
    /// A resource swap is in flight; the play/pause toggle is suppressed.
    Loading,
    Paused,
    Playing,
    /// The track ran to its natural end.
    Ended,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle
    }
}

/// The main application model.
pub struct App {
    pub track: Track,
    pub playback: PlaybackState,
    /// Position as last reported by the engine or locally predicted.
    pub position: Duration,
    /// Total duration; unknown until the engine reports the resource ready.
    pub duration: Option<Duration>,
    /// Volume in `0..=100`.
    pub volume: u8,
    pub liked: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    /// Decoded cover art, when the track carried a readable picture.
    pub art: Option<CoverArt>,
}

impl App {
    /// Create a new `App` for `track` with default control state.
    pub fn new(track: Track) -> Self {
        Self {
            track,
            playback: PlaybackState::Idle,
            position: Duration::ZERO,
            duration: None,
            volume: 80,
            liked: false,
            shuffle: false,
            repeat: RepeatMode::default(),
            art: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.playback == PlaybackState::Loading
    }

    /// Flip play/pause. Returns the engine command to send, or `None`
    /// while idle or loading (the toggle is suppressed there).
    pub fn toggle_play_pause(&mut self) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Idle | PlaybackState::Loading => None,
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                Some(AudioCmd::Pause)
            }
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::Play)
            }
            PlaybackState::Ended => {
                // Restart from the top.
                self.position = Duration::ZERO;
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::Play)
            }
        }
    }

    /// Jump to `target`, clamped to the known duration. A no-op until a
    /// resource is ready.
    pub fn seek_to(&mut self, target: Duration) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Idle | PlaybackState::Loading => return None,
            PlaybackState::Ended => {
                // Seeking away from the end lands in pause.
                self.playback = PlaybackState::Paused;
            }
            _ => {}
        }
        let target = match self.duration {
            Some(d) => target.min(d),
            None => target,
        };
        self.position = target;
        Some(AudioCmd::SeekTo(target))
    }

    /// Seek to `fraction` of the duration (a press on the progress bar).
    /// A no-op while the duration is unknown or zero.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<AudioCmd> {
        let duration = self.duration.filter(|d| !d.is_zero())?;
        self.seek_to(duration.mul_f64(fraction.clamp(0.0, 1.0)))
    }

    /// Skip forward by `step`, clamped to the duration. A no-op while the
    /// duration is unknown (nothing to clamp against).
    pub fn skip_forward(&mut self, step: Duration) -> Option<AudioCmd> {
        let duration = self.duration?;
        self.seek_to((self.position + step).min(duration))
    }

    /// Skip back by `step`, clamping at zero.
    pub fn skip_back(&mut self, step: Duration) -> Option<AudioCmd> {
        self.seek_to(self.position.saturating_sub(step))
    }

    /// Set volume to `level` (clamped to 100). Returns the engine command
    /// carrying the value scaled into `0.0..=1.0`.
    pub fn set_volume(&mut self, level: u8) -> AudioCmd {
        self.volume = level.min(100);
        AudioCmd::SetVolume(self.volume as f32 / 100.0)
    }

    /// Raise volume by `step`, saturating at 100.
    pub fn volume_up(&mut self, step: u8) -> AudioCmd {
        self.set_volume(self.volume.saturating_add(step))
    }

    /// Lower volume by `step`, saturating at zero.
    pub fn volume_down(&mut self, step: u8) -> AudioCmd {
        self.set_volume(self.volume.saturating_sub(step))
    }

    /// Flip the like marker. Purely local state.
    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
    }

    /// Flip shuffle. With a single track this only changes the badge.
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    /// Cycle repeat off -> one -> off and return the engine command.
    pub fn cycle_repeat(&mut self) -> AudioCmd {
        self.repeat = match self.repeat {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        };
        AudioCmd::SetRepeat(self.repeat)
    }

    /// Attach decoded cover art.
    pub fn set_art(&mut self, art: CoverArt) {
        self.art = Some(art);
    }

    /// Apply a playback event reported by the engine.
    pub fn apply_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::LoadStarted => {
                self.playback = PlaybackState::Loading;
                self.position = Duration::ZERO;
                self.duration = None;
            }
            PlayerEvent::CanPlay { duration } => {
                self.duration = duration;
                if self.playback == PlaybackState::Loading {
                    self.playback = PlaybackState::Paused;
                }
            }
            PlayerEvent::TimeUpdate { position } => {
                self.position = match self.duration {
                    Some(d) => position.min(d),
                    None => position,
                };
            }
            PlayerEvent::Ended => {
                // Ended clears the playing flag no matter what came before.
                self.playback = PlaybackState::Ended;
                if let Some(d) = self.duration {
                    self.position = d;
                }
            }
        }
    }

    /// Progress through the track as `0.0..=1.0`; zero while the duration
    /// is unknown or zero.
    pub fn progress_ratio(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
