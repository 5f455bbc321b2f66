//! Application module: exposes the app model used by the TUI and runtime.

mod model;

pub use model::*;
