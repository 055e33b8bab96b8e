use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::art::CoverArt;
use crate::audio::AudioPlayer;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::track::Track;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let _log_guard = logging::init(&settings.log);

    let mut args = env::args().skip(1);
    let Some(audio_path) = args.next() else {
        return Err("usage: encore <audio-file> [cover-image]".into());
    };
    let cover_path = args.next().map(PathBuf::from);

    let audio_path = PathBuf::from(audio_path);
    if !audio_path.is_file() {
        return Err(format!("not a file: {}", audio_path.display()).into());
    }

    let mut track = Track::probe(&audio_path);
    if let Some(cover) = cover_path {
        // An explicit cover wins over whatever the tags embed.
        match std::fs::read(&cover) {
            Ok(bytes) => track.art = Some(bytes),
            Err(e) => eprintln!("encore: cannot read cover image {}: {e}", cover.display()),
        }
    }
    info!("playing {:?}", track);

    // Decode before the move into `App`; the raw bytes live inside the track.
    let art = if settings.ui.art {
        track.art.as_deref().and_then(CoverArt::decode)
    } else {
        None
    };

    let audio_player = AudioPlayer::new();
    let mut app = App::new(track);
    if let Some(art) = art {
        app.set_art(art);
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    mpris_sync::update_mpris(&mpris, &app);

    let subscription = startup::apply_playback_defaults(&mut app, &audio_player, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app, settings.playback.autoplay);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &subscription,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}
