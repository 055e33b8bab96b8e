//! Diagnostic logging setup.
//!
//! Log lines go to a daily-rotated file under the user state directory,
//! never to the terminal: the alternate screen has to stay clean while
//! the card is up.

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// Initialize the global tracing subscriber.
///
/// Returns the appender guard; dropping it flushes buffered lines, so
/// the caller holds it for the process lifetime. `None` means file
/// logging is unavailable and diagnostics are discarded.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let dir = state_dir()?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("encore: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, "encore.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("ENCORE_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    if initialized.is_err() {
        // Another subscriber already claimed the global default.
        return None;
    }
    Some(guard)
}

/// `$XDG_STATE_HOME/encore` or `~/.local/state/encore`.
fn state_dir() -> Option<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("encore"));
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state").join("encore"))
}
