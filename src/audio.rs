//! Audio playback engine.
//!
//! A dedicated thread owns the rodio output stream and the current sink;
//! the rest of the application talks to it through `AudioCmd` messages
//! and observes it through the shared `PlaybackInfo` snapshot.

mod player;
mod queue;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use sink::PlayError;
pub use types::*;

#[cfg(test)]
mod tests;
