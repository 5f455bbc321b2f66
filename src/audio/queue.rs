//! Track ordering: sequential wraparound and the shuffle queue.
//!
//! Manual next/prev always wrap around the album; the repeat mode only
//! governs what happens on natural end-of-track (see `auto_next_index`).

use rand::Rng;
use rand::RngExt;
use rand::seq::SliceRandom;

use super::types::RepeatMode;

/// Next index for a manual skip: wraps last -> first.
pub(super) fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) => (i + 1) % len,
        None => 0,
    })
}

/// Prior index for a manual skip: wraps first -> last.
pub(super) fn prev_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(0) | None => len - 1,
        Some(i) => i - 1,
    })
}

/// Next index at natural end-of-track for sequential (non-shuffle) play.
/// `None` means playback stops.
pub(super) fn auto_next_index(
    current: Option<usize>,
    len: usize,
    repeat: RepeatMode,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => match repeat {
            RepeatMode::All => Some(0),
            // RepeatMode::One is handled before ordering is consulted.
            RepeatMode::Off | RepeatMode::One => None,
        },
        None => None,
    }
}

/// A randomly permuted play order, regenerated once exhausted.
///
/// A reshuffle never starts with the track that just played (when the
/// album has more than one track), so back-to-back repeats cannot occur
/// across a cycle boundary.
#[derive(Debug, Clone)]
pub(crate) struct ShuffleQueue {
    order: Vec<usize>,
    pos: usize,
}

impl ShuffleQueue {
    pub fn new(len: usize, current: Option<usize>, rng: &mut impl Rng) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        let pos = current
            .and_then(|c| order.iter().position(|&x| x == c))
            .unwrap_or(0);
        Self { order, pos }
    }

    pub fn current(&self) -> Option<usize> {
        self.order.get(self.pos).copied()
    }

    /// True when the permutation has no further entries; advancing from
    /// here regenerates it.
    pub fn at_end(&self) -> bool {
        self.pos + 1 >= self.order.len()
    }

    /// Move to the next queue entry, reshuffling when exhausted.
    pub fn advance(&mut self, rng: &mut impl Rng) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        if self.at_end() {
            self.reshuffle(rng);
        } else {
            self.pos += 1;
        }
        self.current()
    }

    /// Step back within the current permutation, wrapping to its end.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        self.pos = if self.pos == 0 {
            self.order.len() - 1
        } else {
            self.pos - 1
        };
        self.current()
    }

    /// Point the queue at `idx` when the user picked a track directly, so
    /// that next/prev continue from there.
    pub fn align_to(&mut self, idx: usize) {
        if let Some(p) = self.order.iter().position(|&x| x == idx) {
            self.pos = p;
        }
    }

    fn reshuffle(&mut self, rng: &mut impl Rng) {
        let last = self.current();
        self.order.shuffle(rng);
        if self.order.len() > 1 && self.order.first().copied() == last {
            let j = rng.random_range(1..self.order.len());
            self.order.swap(0, j);
        }
        self.pos = 0;
    }
}
