//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current track,
//! playback phase and control toggles.

mod model;

pub use model::*;
