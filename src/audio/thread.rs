use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::track::Track;

use super::sink::create_sink_at;
use super::types::{AudioCmd, EventOutlet, PlayerEvent, RepeatMode};

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                // No output device: the thread exits, later sends fail
                // quietly, the card just never leaves loading.
                error!("no audio output device: {e}");
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut outlet = EventOutlet::new();

        let mut track: Option<Track> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = true;
        // Set when the track ran to its natural end; the sink is gone then.
        let mut at_end = false;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let mut duration: Option<Duration> = None;
        let mut volume: f32 = 1.0;
        let mut repeat = RepeatMode::default();

        fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(from * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Subscribe(tx) => {
                        outlet.replace(tx);
                    }

                    AudioCmd::Load(new_track) => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        paused = true;
                        at_end = false;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        duration = None;
                        outlet.emit(PlayerEvent::LoadStarted);

                        match create_sink_at(&stream, &new_track, Duration::ZERO, volume) {
                            Ok((new_sink, decoded)) => {
                                // Prefer the decoder's figure, fall back to the tag.
                                duration = decoded.or(new_track.duration);
                                sink = Some(new_sink);
                                debug!("loaded {:?}", new_track.path);
                                outlet.emit(PlayerEvent::CanPlay { duration });
                            }
                            Err(e) => {
                                warn!("load failed: {e}");
                            }
                        }
                        track = Some(new_track);
                    }

                    AudioCmd::Play => {
                        if at_end || sink.is_none() {
                            // Past the end (or a load that never produced a
                            // sink): rebuild from position zero.
                            let Some(t) = track.as_ref() else {
                                continue;
                            };
                            match create_sink_at(&stream, t, Duration::ZERO, volume) {
                                Ok((new_sink, decoded)) => {
                                    let was_ready = at_end;
                                    duration = decoded.or(duration);
                                    if !was_ready {
                                        outlet.emit(PlayerEvent::CanPlay { duration });
                                    }
                                    new_sink.play();
                                    sink = Some(new_sink);
                                    paused = false;
                                    at_end = false;
                                    accumulated = Duration::ZERO;
                                    started_at = Some(Instant::now());
                                    outlet.emit(PlayerEvent::TimeUpdate {
                                        position: Duration::ZERO,
                                    });
                                }
                                Err(e) => {
                                    // The play attempt is rejected quietly; the
                                    // card keeps whatever state it showed.
                                    warn!("play rejected: {e}");
                                }
                            }
                        } else if let Some(s) = sink.as_ref() {
                            if paused {
                                s.play();
                                paused = false;
                                started_at = Some(Instant::now());
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(s) = sink.as_ref() {
                            if !paused {
                                s.pause();
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                paused = true;
                                outlet.emit(PlayerEvent::TimeUpdate {
                                    position: capped(accumulated, duration),
                                });
                            }
                        }
                    }

                    AudioCmd::SeekTo(target) => {
                        // Scrubbing: rebuild the sink and skip into the file.
                        // This uses `Source::skip_duration` (works for common formats).
                        let Some(t) = track.as_ref() else {
                            continue;
                        };
                        let target = match duration {
                            Some(d) => target.min(d),
                            None => target,
                        };
                        if at_end {
                            // Seeking away from the end lands in pause.
                            at_end = false;
                            paused = true;
                        }
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        match create_sink_at(&stream, t, target, volume) {
                            Ok((new_sink, decoded)) => {
                                duration = decoded.or(duration);
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = target;
                                outlet.emit(PlayerEvent::TimeUpdate { position: target });
                            }
                            Err(e) => {
                                warn!("seek failed: {e}");
                                paused = true;
                                started_at = None;
                            }
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::SetRepeat(mode) => {
                        repeat = mode;
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(s) = sink.as_ref() {
                            if !paused {
                                // Fade out gently before stopping.
                                fade_out_sink(s, volume, fade_out_ms);
                            }
                            s.stop();
                        }
                        debug!("audio thread stopped");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check: position report and end-of-track.
                    let ended = match sink.as_ref() {
                        Some(s) if !paused => s.empty(),
                        _ => continue,
                    };

                    if !ended {
                        let position = accumulated
                            + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        outlet.emit(PlayerEvent::TimeUpdate {
                            position: capped(position, duration),
                        });
                        continue;
                    }

                    match repeat {
                        RepeatMode::One => {
                            let Some(t) = track.as_ref() else {
                                continue;
                            };
                            match create_sink_at(&stream, t, Duration::ZERO, volume) {
                                Ok((new_sink, _)) => {
                                    new_sink.play();
                                    sink = Some(new_sink);
                                    accumulated = Duration::ZERO;
                                    started_at = Some(Instant::now());
                                    outlet.emit(PlayerEvent::TimeUpdate {
                                        position: Duration::ZERO,
                                    });
                                }
                                Err(e) => {
                                    warn!("repeat restart failed: {e}");
                                    sink = None;
                                    paused = true;
                                    at_end = true;
                                    started_at = None;
                                    outlet.emit(PlayerEvent::Ended);
                                }
                            }
                        }
                        RepeatMode::Off => {
                            sink = None;
                            paused = true;
                            at_end = true;
                            started_at = None;
                            if let Some(d) = duration {
                                accumulated = d;
                            }
                            debug!("track ended");
                            outlet.emit(PlayerEvent::Ended);
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn capped(position: Duration, duration: Option<Duration>) -> Duration {
    match duration {
        Some(d) => position.min(d),
        None => position,
    }
}
