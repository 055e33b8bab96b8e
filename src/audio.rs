//! Audio playback engine.
//!
//! A dedicated thread owns the `rodio` output stream and the current
//! sink. The rest of the app talks to it through `AudioCmd` messages and
//! listens on an `EventSubscription` for position, readiness and
//! end-of-track reports.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
