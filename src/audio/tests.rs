use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::{Track, Variant};

use super::queue::{ShuffleQueue, auto_next_index, next_index, prev_index};
use super::thread::{plan_variant_toggle, prev_restarts_current};
use super::types::{PREV_RESTART_THRESHOLD, RepeatMode};

fn track(title: &str, with_vocals: bool) -> Track {
    Track {
        id: title.to_lowercase(),
        title: title.to_string(),
        display: title.to_string(),
        instrumental: PathBuf::from(format!("/tmp/{title} (instrumental).mp3")),
        vocal: with_vocals.then(|| PathBuf::from(format!("/tmp/{title}.mp3"))),
        lyrics: None,
        duration: None,
    }
}

#[test]
fn manual_skip_wraps_in_both_directions() {
    assert_eq!(next_index(Some(0), 3), Some(1));
    assert_eq!(next_index(Some(2), 3), Some(0));
    assert_eq!(next_index(None, 3), Some(0));
    assert_eq!(next_index(Some(0), 0), None);

    assert_eq!(prev_index(Some(2), 3), Some(1));
    assert_eq!(prev_index(Some(0), 3), Some(2));
    assert_eq!(prev_index(None, 3), Some(2));
    assert_eq!(prev_index(Some(0), 0), None);
}

#[test]
fn auto_advance_honors_repeat_mode_at_the_end() {
    // Mid-album: advance regardless of mode.
    assert_eq!(auto_next_index(Some(0), 3, RepeatMode::Off), Some(1));
    assert_eq!(auto_next_index(Some(0), 3, RepeatMode::All), Some(1));

    // Last track: Off stops, All wraps.
    assert_eq!(auto_next_index(Some(2), 3, RepeatMode::Off), None);
    assert_eq!(auto_next_index(Some(2), 3, RepeatMode::All), Some(0));

    assert_eq!(auto_next_index(None, 3, RepeatMode::Off), None);
    assert_eq!(auto_next_index(Some(0), 0, RepeatMode::All), None);
}

#[test]
fn prev_restarts_only_strictly_past_the_threshold() {
    assert_eq!(PREV_RESTART_THRESHOLD, Duration::from_secs(3));

    // At or below the threshold: skip to the prior track.
    assert!(!prev_restarts_current(Duration::from_millis(500), true));
    assert!(!prev_restarts_current(Duration::from_secs(3), true));
    // Strictly past it: restart the current one.
    assert!(prev_restarts_current(Duration::from_millis(3001), true));
    assert!(prev_restarts_current(Duration::from_secs(120), true));
    // With nothing loaded there is nothing to restart.
    assert!(!prev_restarts_current(Duration::from_secs(120), false));
}

#[test]
fn variant_toggle_rebuilds_only_when_the_files_differ() {
    let both = track("Neon Skyline", true);

    // Both renditions present and a source loaded: swap files.
    let plan = plan_variant_toggle(Some(&both), Variant::Vocal, true);
    assert_eq!(plan.variant, Variant::Instrumental);
    assert!(plan.rebuild);

    // Toggling back returns to the vocal mix.
    let back = plan_variant_toggle(Some(&both), Variant::Instrumental, true);
    assert_eq!(back.variant, Variant::Vocal);
    assert!(back.rebuild);

    // No loaded source: the preference flips without touching a sink.
    let idle = plan_variant_toggle(Some(&both), Variant::Vocal, false);
    assert_eq!(idle.variant, Variant::Instrumental);
    assert!(!idle.rebuild);

    // Instrumental-only track: both variants resolve to the same file.
    let solo = track("Interlude", false);
    let plan = plan_variant_toggle(Some(&solo), Variant::Vocal, true);
    assert_eq!(plan.variant, Variant::Instrumental);
    assert!(!plan.rebuild);

    // No track at all.
    assert!(!plan_variant_toggle(None, Variant::Vocal, true).rebuild);
}

#[test]
fn shuffle_queue_visits_every_track_once_per_cycle() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut queue = ShuffleQueue::new(5, None, &mut rng);

    let mut seen = BTreeSet::new();
    seen.insert(queue.current().unwrap());
    while !queue.at_end() {
        seen.insert(queue.advance(&mut rng).unwrap());
    }
    // The first cycle may start mid-permutation; a full fresh cycle after
    // the first reshuffle must visit all five tracks exactly once.
    queue.advance(&mut rng);
    let mut cycle = vec![queue.current().unwrap()];
    while !queue.at_end() {
        cycle.push(queue.advance(&mut rng).unwrap());
    }
    assert_eq!(cycle.len(), 5);
    assert_eq!(cycle.iter().copied().collect::<BTreeSet<_>>().len(), 5);
}

#[test]
fn reshuffle_never_immediately_repeats_the_last_track() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut queue = ShuffleQueue::new(4, None, &mut rng);

    for _ in 0..200 {
        let before = queue.current().unwrap();
        let next = queue.advance(&mut rng).unwrap();
        if queue.at_end() {
            continue;
        }
        // Whether or not a reshuffle happened, consecutive draws differ.
        assert_ne!(before, next);
    }
}

#[test]
fn shuffle_queue_single_track_album_repeats_without_panic() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut queue = ShuffleQueue::new(1, Some(0), &mut rng);
    for _ in 0..5 {
        assert_eq!(queue.advance(&mut rng), Some(0));
    }
}

#[test]
fn shuffle_queue_empty_album_yields_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut queue = ShuffleQueue::new(0, None, &mut rng);
    assert_eq!(queue.current(), None);
    assert_eq!(queue.advance(&mut rng), None);
    assert_eq!(queue.retreat(), None);
}

#[test]
fn shuffle_queue_aligns_to_directly_played_track() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut queue = ShuffleQueue::new(6, None, &mut rng);

    queue.align_to(3);
    assert_eq!(queue.current(), Some(3));
    let after = queue.advance(&mut rng).unwrap();
    assert_ne!(after, 3);
}

#[test]
fn shuffle_queue_retreat_wraps_within_the_permutation() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut queue = ShuffleQueue::new(4, None, &mut rng);

    // Walk to a known spot, then back past the start.
    queue.align_to(queue.current().unwrap());
    let first = queue.current().unwrap();
    let mut order = vec![first];
    while !queue.at_end() {
        order.push(queue.advance(&mut rng).unwrap());
    }
    // Retreating from the start of the permutation wraps to its end.
    queue.align_to(order[0]);
    assert_eq!(queue.retreat(), Some(*order.last().unwrap()));
}

#[test]
fn repeat_mode_cycles_three_states() {
    assert_eq!(RepeatMode::Off.cycled(), RepeatMode::All);
    assert_eq!(RepeatMode::All.cycled(), RepeatMode::One);
    assert_eq!(RepeatMode::One.cycled(), RepeatMode::Off);
}
