//! Synced lyrics: LRC parsing, time lookup and background loading.

mod loader;
mod parse;
mod state;
mod sync;

pub use loader::{LyricsLoader, LyricsReply, spawn_loader};
pub use parse::{LyricLine, ParsedLyrics, parse_lrc};
pub use state::LyricsState;
pub use sync::{current_line, next_line};

#[cfg(test)]
mod tests;
