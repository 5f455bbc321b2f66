//! Configuration loader, schema types and persisted display state.
//!
//! `Settings` is read-only configuration (file + env); `UiState` is the
//! small set of display preferences written back on every change.

mod load;
mod schema;
mod state;

pub use schema::*;
pub use state::{LyricsMode, UiState, resolve_state_path};
