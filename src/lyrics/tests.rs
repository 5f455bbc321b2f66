use super::loader::LyricsReply;
use super::*;

fn times(parsed: &ParsedLyrics) -> Vec<f64> {
    parsed.lines.iter().map(|l| l.time).collect()
}

#[test]
fn parses_the_basic_example() {
    let parsed = parse_lrc("[00:00.50]First\n[00:03.00]Second\n[00:05.50]Third");
    assert_eq!(parsed.lines.len(), 3);
    assert_eq!(parsed.lines[0], LyricLine { time: 0.5, text: "First".into() });
    assert_eq!(parsed.lines[1], LyricLine { time: 3.0, text: "Second".into() });
    assert_eq!(parsed.lines[2], LyricLine { time: 5.5, text: "Third".into() });

    assert_eq!(current_line(&parsed.lines, 2.0), Some(0));
    assert_eq!(current_line(&parsed.lines, 4.0), Some(1));
    assert_eq!(current_line(&parsed.lines, 6.0), Some(2));
}

#[test]
fn fraction_digits_are_right_padded_to_milliseconds() {
    // "5" means 500 ms, "75" means 750 ms, "050" means 50 ms.
    let parsed = parse_lrc("[00:10.5]a\n[00:20.75]b\n[00:30.050]c");
    assert_eq!(times(&parsed), vec![10.5, 20.75, 30.05]);
}

#[test]
fn missing_fraction_is_zero() {
    let parsed = parse_lrc("[01:02]plain");
    assert_eq!(times(&parsed), vec![62.0]);
}

#[test]
fn out_of_order_input_is_sorted_not_rejected() {
    let parsed = parse_lrc("[00:09.0]late\n[00:01.0]early\n[00:05.0]middle\n[00:05.0]middle2");
    assert_eq!(times(&parsed), vec![1.0, 5.0, 5.0, 9.0]);
    // Stable sort keeps the duplicate pair in source order.
    assert_eq!(parsed.lines[1].text, "middle");
    assert_eq!(parsed.lines[2].text, "middle2");
}

#[test]
fn offset_metadata_shifts_every_line() {
    let parsed = parse_lrc("[offset:+1000]\n[00:05.00]line");
    assert_eq!(times(&parsed), vec![6.0]);

    let negative = parse_lrc("[offset:-2000]\n[00:05.00]line\n[00:01.00]early");
    // Shifted times never go below zero.
    assert_eq!(times(&negative), vec![0.0, 3.0]);
}

#[test]
fn line_endings_do_not_change_the_result() {
    let lf = parse_lrc("[ti:Song]\n[00:01.0]one\n[00:02.0]two");
    let crlf = parse_lrc("[ti:Song]\r\n[00:01.0]one\r\n[00:02.0]two");
    let cr = parse_lrc("[ti:Song]\r[00:01.0]one\r[00:02.0]two");
    assert_eq!(lf, crlf);
    assert_eq!(lf, cr);
}

#[test]
fn multiple_timestamps_share_one_text() {
    let parsed = parse_lrc("[00:10.0][00:30.0]chorus");
    assert_eq!(parsed.lines.len(), 2);
    assert_eq!(times(&parsed), vec![10.0, 30.0]);
    assert!(parsed.lines.iter().all(|l| l.text == "chorus"));
}

#[test]
fn metadata_tags_are_collected_and_not_treated_as_lines() {
    let parsed = parse_lrc("[ar:Vera Lint]\n[ti:Neon Skyline]\n[al:Afterglow]\n[00:01.0]hi");
    assert_eq!(parsed.metadata.get("ar").map(String::as_str), Some("Vera Lint"));
    assert_eq!(parsed.metadata.get("ti").map(String::as_str), Some("Neon Skyline"));
    assert_eq!(parsed.metadata.get("al").map(String::as_str), Some("Afterglow"));
    assert_eq!(parsed.lines.len(), 1);
}

#[test]
fn malformed_lines_are_skipped_silently() {
    let parsed = parse_lrc(
        "[00:01.0]good\n\
         [00:02.0]\n\
         [0x:99.0]bad stamp\n\
         no tag at all\n\
         [00:3.0]short seconds ok\n\
         [00:02.1234]too many digits",
    );
    let texts: Vec<&str> = parsed.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["good", "short seconds ok"]);
}

#[test]
fn empty_input_yields_no_lines_not_an_error() {
    assert!(parse_lrc("").is_empty());
    assert!(parse_lrc("\r\n\r\n").is_empty());
    assert!(parse_lrc("[ar:Only Metadata]").is_empty());
}

#[test]
fn lookup_reflexivity_at_each_lines_own_timestamp() {
    let parsed = parse_lrc("[00:00.50]a\n[00:03.00]b\n[00:05.50]c\n[01:10.250]d");
    for (idx, line) in parsed.lines.iter().enumerate() {
        assert_eq!(current_line(&parsed.lines, line.time), Some(idx));
    }
}

#[test]
fn lookup_sentinels() {
    assert_eq!(current_line(&[], 12.0), None);

    let parsed = parse_lrc("[00:10.0]first");
    assert_eq!(current_line(&parsed.lines, 9.99), None);
    assert_eq!(current_line(&parsed.lines, 10.0), Some(0));
}

#[test]
fn next_line_is_strictly_greater() {
    let parsed = parse_lrc("[00:01.0]a\n[00:03.0]b");
    assert_eq!(next_line(&parsed.lines, 0.0), Some(0));
    assert_eq!(next_line(&parsed.lines, 1.0), Some(1));
    assert_eq!(next_line(&parsed.lines, 2.9), Some(1));
    assert_eq!(next_line(&parsed.lines, 3.0), None);
}

#[test]
fn state_requests_only_for_new_tracks_with_lyrics() {
    let mut state = LyricsState::new();
    assert!(state.on_track_changed(Some("a"), true));
    // Same track again: no new request.
    assert!(!state.on_track_changed(Some("a"), true));
    // Track without a lyrics file: no request, lyrics cleared.
    assert!(!state.on_track_changed(Some("b"), false));
    assert!(state.lyrics().is_none());
    // No track at all.
    assert!(!state.on_track_changed(None, false));
}

#[test]
fn state_drops_stale_replies() {
    let mut state = LyricsState::new();
    state.on_track_changed(Some("old"), true);
    state.on_track_changed(Some("new"), true);

    state.on_reply(LyricsReply {
        track_id: "old".into(),
        lyrics: parse_lrc("[00:01.0]stale"),
    });
    assert!(state.lyrics().is_none());
    assert!(state.is_loading());

    state.on_reply(LyricsReply {
        track_id: "new".into(),
        lyrics: parse_lrc("[00:01.0]fresh"),
    });
    assert_eq!(state.lyrics().unwrap().lines[0].text, "fresh");
    assert!(!state.is_loading());
}

#[test]
fn state_treats_empty_parse_as_no_lyrics() {
    let mut state = LyricsState::new();
    state.on_track_changed(Some("a"), true);
    state.on_reply(LyricsReply {
        track_id: "a".into(),
        lyrics: ParsedLyrics::default(),
    });
    assert!(state.lyrics().is_none());
    assert_eq!(state.current_line(100.0), None);
}

#[test]
fn loader_round_trip_and_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.lrc");
    std::fs::write(&path, "[00:01.0]hello").unwrap();

    let loader = spawn_loader();
    loader.request("song".into(), path);
    loader.request("gone".into(), dir.path().join("missing.lrc"));

    let mut got_song = false;
    let mut got_gone = false;
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while (!got_song || !got_gone) && std::time::Instant::now() < deadline {
        if let Some(reply) = loader.try_recv() {
            match reply.track_id.as_str() {
                "song" => {
                    assert_eq!(reply.lyrics.lines[0].text, "hello");
                    got_song = true;
                }
                "gone" => {
                    assert!(reply.lyrics.is_empty());
                    got_gone = true;
                }
                other => panic!("unexpected reply for {other}"),
            }
        } else {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
    assert!(got_song && got_gone);
}
