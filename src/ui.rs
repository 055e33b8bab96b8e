//! UI rendering for the terminal user interface.
//!
//! The card geometry lives in `ui::layout` and is shared between the
//! renderer and mouse hit-testing, so a press always lands on exactly
//! what was drawn.

mod card;
mod layout;

pub use card::draw;
pub use layout::{CardLayout, Hit};

#[cfg(test)]
mod tests;
