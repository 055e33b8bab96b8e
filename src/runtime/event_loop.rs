use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioPlayer, EventSubscription, PlayerEvent, RepeatMode};
use crate::config;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Set while a configured autoplay is still waiting for the track to
    /// become ready.
    pub autoplay_pending: bool,
    /// Layout of the last drawn frame; mouse presses resolve against it.
    pub layout: ui::CardLayout,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
    pub last_mpris_volume: u8,
    pub last_mpris_position_secs: u64,
    last_mpris_modes: (bool, bool),
    last_mpris_duration: Option<Duration>,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App, autoplay: bool) -> Self {
        Self {
            autoplay_pending: autoplay,
            layout: ui::CardLayout::default(),
            last_mpris_playback: app.playback,
            last_mpris_volume: app.volume,
            last_mpris_position_secs: app.position.as_secs(),
            last_mpris_modes: (app.shuffle, app.repeat == RepeatMode::One),
            last_mpris_duration: app.duration,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    subscription: &EventSubscription,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply whatever the engine reported since the last frame.
        let events: Vec<PlayerEvent> = subscription.drain().collect();
        for event in events {
            app.apply_event(event);
            if state.autoplay_pending && matches!(event, PlayerEvent::CanPlay { .. }) {
                state.autoplay_pending = false;
                // Autoplay acts exactly like the user pressing play.
                if let Some(cmd) = app.toggle_play_pause() {
                    let _ = audio_player.send(cmd);
                }
            }
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or from the track running out on its own.
        sync_mpris(state, app, mpris);

        terminal.draw(|f| {
            let layout = ui::CardLayout::compute(f.area(), settings.ui.art && app.art.is_some());
            ui::draw(f, app, &layout, &settings.ui, &settings.controls);
            state.layout = layout;
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, audio_player, control_tx)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, settings, app, audio_player, control_tx, state);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Push widget state to MPRIS when it changed since the last frame.
/// Position-only movement is mirrored silently; clients poll `Position`
/// rather than listen for it.
fn sync_mpris(state: &mut EventLoopState, app: &App, mpris: &MprisHandle) {
    let modes = (app.shuffle, app.repeat == RepeatMode::One);
    let position_secs = app.position.as_secs();
    let signal_worthy = app.playback != state.last_mpris_playback
        || app.volume != state.last_mpris_volume
        || app.duration != state.last_mpris_duration
        || modes != state.last_mpris_modes;

    if signal_worthy {
        update_mpris(mpris, app);
    } else if position_secs != state.last_mpris_position_secs {
        mpris.set_position(app.position);
    }

    state.last_mpris_playback = app.playback;
    state.last_mpris_volume = app.volume;
    state.last_mpris_duration = app.duration;
    state.last_mpris_modes = modes;
    state.last_mpris_position_secs = position_secs;
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => {
            if !app.is_playing() {
                if let Some(cmd) = app.toggle_play_pause() {
                    let _ = audio_player.send(cmd);
                }
            }
        }
        ControlCmd::Pause => {
            if app.is_playing() {
                if let Some(cmd) = app.toggle_play_pause() {
                    let _ = audio_player.send(cmd);
                }
            }
        }
        ControlCmd::PlayPause => {
            if let Some(cmd) = app.toggle_play_pause() {
                let _ = audio_player.send(cmd);
            }
        }
        ControlCmd::Stop => {
            // MPRIS Stop maps to "paused at the top" for a single track.
            if app.is_playing() {
                if let Some(cmd) = app.toggle_play_pause() {
                    let _ = audio_player.send(cmd);
                }
            }
            if let Some(cmd) = app.seek_to(Duration::ZERO) {
                let _ = audio_player.send(cmd);
            }
        }
        ControlCmd::Seek(offset_micros) => {
            let target = (app.position.as_micros() as i64)
                .saturating_add(offset_micros)
                .max(0);
            if let Some(cmd) = app.seek_to(Duration::from_micros(target as u64)) {
                let _ = audio_player.send(cmd);
            }
        }
        ControlCmd::SetPosition(micros) => {
            if micros >= 0 {
                if let Some(cmd) = app.seek_to(Duration::from_micros(micros as u64)) {
                    let _ = audio_player.send(cmd);
                }
            }
        }
        ControlCmd::SetVolume(volume) => {
            let level = (volume.clamp(0.0, 1.0) * 100.0).round() as u8;
            let _ = audio_player.send(app.set_volume(level));
        }
        ControlCmd::SetShuffle(on) => {
            if app.shuffle != on {
                app.toggle_shuffle();
            }
        }
        ControlCmd::SetLoopOne(on) => {
            if (app.repeat == RepeatMode::One) != on {
                let _ = audio_player.send(app.cycle_repeat());
            }
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave exactly like an MPRIS PlayPause call.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            if let Some(cmd) = app.skip_back(Duration::from_secs(settings.controls.skip_seconds)) {
                let _ = audio_player.send(cmd);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if let Some(cmd) =
                app.skip_forward(Duration::from_secs(settings.controls.skip_seconds))
            {
                let _ = audio_player.send(cmd);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let _ = audio_player.send(app.volume_up(settings.controls.volume_step));
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let _ = audio_player.send(app.volume_down(settings.controls.volume_step));
        }
        KeyCode::Char('f') => {
            app.toggle_like();
        }
        KeyCode::Char('s') => {
            app.toggle_shuffle();
        }
        KeyCode::Char('r') => {
            let _ = audio_player.send(app.cycle_repeat());
        }
        _ => {}
    }

    Ok(false)
}

fn handle_mouse_event(
    mouse: MouseEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &EventLoopState,
) {
    let pressed = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));
    let dragged = matches!(mouse.kind, MouseEventKind::Drag(MouseButton::Left));
    if !pressed && !dragged {
        return;
    }

    match state.layout.hit(mouse.column, mouse.row) {
        Some(ui::Hit::PlayPause) if pressed => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        Some(ui::Hit::SkipBack) if pressed => {
            if let Some(cmd) = app.skip_back(Duration::from_secs(settings.controls.skip_seconds)) {
                let _ = audio_player.send(cmd);
            }
        }
        Some(ui::Hit::SkipForward) if pressed => {
            if let Some(cmd) =
                app.skip_forward(Duration::from_secs(settings.controls.skip_seconds))
            {
                let _ = audio_player.send(cmd);
            }
        }
        Some(ui::Hit::Shuffle) if pressed => {
            app.toggle_shuffle();
        }
        Some(ui::Hit::Repeat) if pressed => {
            let _ = audio_player.send(app.cycle_repeat());
        }
        Some(ui::Hit::Like) if pressed => {
            app.toggle_like();
        }
        // The progress knob and the volume bar also track drags.
        Some(ui::Hit::Progress(fraction)) => {
            if let Some(cmd) = app.seek_fraction(fraction) {
                let _ = audio_player.send(cmd);
            }
        }
        Some(ui::Hit::Volume(level)) => {
            let _ = audio_player.send(app.set_volume(level));
        }
        _ => {}
    }
}
