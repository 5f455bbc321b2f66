//! Time-to-line lookup over a sorted lyric line list.
//!
//! Both lookups are pure and cheap enough to run on every UI tick; line
//! counts are tens to low hundreds, so a linear scan is deliberate.

use super::parse::LyricLine;

/// Index of the current line at playback time `at`: the last line whose
/// cue time is `<= at`. `None` when the list is empty or `at` precedes
/// the first cue.
pub fn current_line(lines: &[LyricLine], at: f64) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .rev()
        .find(|(_, line)| line.time <= at)
        .map(|(idx, _)| idx)
}

/// Index of the next upcoming line: the first line with a cue time
/// strictly greater than `at`.
pub fn next_line(lines: &[LyricLine], at: f64) -> Option<usize> {
    lines.iter().position(|line| line.time > at)
}
