//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::audio::{PlayState, PlaybackInfo};
use crate::catalog::Variant;
use crate::config::{ControlsSettings, LyricsMode, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected track".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L is filled dynamically from config.
    map.insert("v".to_string(), "vocal/instrumental".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat mode".to_string());
    map.insert("y".to_string(), "lyrics pane".to_string());
    map.insert("e".to_string(), "progress bar".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "v", "s", "r", "y", "e", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn state_label(state: PlayState) -> &'static str {
    match state {
        PlayState::Stopped => "Stopped",
        PlayState::Loading => "Loading",
        PlayState::Paused => "Paused",
        PlayState::Playing => "Playing",
    }
}

/// Build the status box text from the latest playback snapshot.
fn status_text(app: &App, info: Option<&PlaybackInfo>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    parts.push(format!("REPEAT: {}", app.repeat.label()));

    if app.shuffle {
        parts.push("Shuffle: ON".to_string());
    } else {
        parts.push("Shuffle: OFF".to_string());
    }

    match info {
        Some(info) if info.index.is_some() => {
            let idx = info.index.unwrap_or(0);
            if let Some(track) = app.tracks().get(idx) {
                let time = match info.duration {
                    Some(total) => {
                        format!("{}/{}", format_mmss(info.elapsed), format_mmss(total))
                    }
                    None => format_mmss(info.elapsed),
                };
                parts.push(format!("Track: {} [{}]", track.display, time));
            }
            parts.push(state_label(info.state).to_string());
            parts.push(format!("Take: {}", info.variant.label()));
        }
        _ => parts.push("Stopped".to_string()),
    }

    if let Some(err) = info.and_then(|i| i.error.as_deref()).or(app.error.as_deref()) {
        parts.push(format!("ERROR: {err}"));
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()));

    let show_progress = app.ui_state.show_progress;
    let lyrics_mode = app.ui_state.lyrics_mode;

    let mut constraints = vec![
        Constraint::Length(3), // header
        Constraint::Length(4), // status
        Constraint::Min(1),    // tracks (and full lyrics)
    ];
    if lyrics_mode == LyricsMode::Current {
        constraints.push(Constraint::Length(4));
    }
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(4)); // controls

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    // Header
    let header_text = {
        let h = app.album.header();
        if h.trim().is_empty() {
            ui_settings.header_fallback.clone()
        } else {
            h
        }
    };
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, info.as_ref()))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main area: track list, plus the full lyrics pane when enabled.
    let main_area = chunks[2];
    let (tracks_area, full_lyrics_area) = if lyrics_mode == LyricsMode::Full {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_area);
        (halves[0], Some(halves[1]))
    } else {
        (main_area, None)
    };

    render_track_list(frame, app, info.as_ref(), tracks_area);

    if let Some(area) = full_lyrics_area {
        render_full_lyrics(frame, app, info.as_ref(), area);
    }

    let mut next_chunk = 3;
    if lyrics_mode == LyricsMode::Current {
        render_current_lyrics(frame, app, info.as_ref(), chunks[next_chunk]);
        next_chunk += 1;
    }

    if show_progress {
        render_progress(frame, info.as_ref(), chunks[next_chunk]);
        next_chunk += 1;
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[next_chunk]);
}

fn render_track_list(frame: &mut Frame, app: &App, info: Option<&PlaybackInfo>, area: Rect) {
    let playing_index = info.and_then(|i| i.index);
    let playing_variant = info.map(|i| i.variant).unwrap_or_default();

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = app.tracks().len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = if sel_pos > half { sel_pos - half } else { 0 };
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let visible_items: Vec<ListItem> = app.tracks()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let i = start + offset;
            if playing_index == Some(i) {
                let mut line = format!("♪ {}", track.display);
                if playing_variant == Variant::Instrumental && track.has_vocals() {
                    line.push_str(" (instrumental)");
                }
                ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {}", track.display))
            }
        })
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Compact lyrics pane: the current line, with the upcoming one dimmed.
fn render_current_lyrics(frame: &mut Frame, app: &App, info: Option<&PlaybackInfo>, area: Rect) {
    let at = info.map(|i| i.elapsed.as_secs_f64()).unwrap_or(0.0);

    let text: Vec<ratatui::text::Line> = if app.lyrics.is_loading() {
        vec![ratatui::text::Line::from("…")]
    } else if let Some(lyrics) = app.lyrics.lyrics() {
        let mut out = Vec::new();
        match app.lyrics.current_line(at) {
            Some(idx) => {
                out.push(ratatui::text::Line::styled(
                    lyrics.lines[idx].text.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            None => out.push(ratatui::text::Line::from("♪")),
        }
        if let Some(next) = app.lyrics.next_line(at) {
            out.push(ratatui::text::Line::styled(
                lyrics.lines[next].text.as_str(),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        out
    } else {
        vec![ratatui::text::Line::from("(no synced lyrics)")]
    };

    let par = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" lyrics "));
    frame.render_widget(par, area);
}

/// Full lyrics pane: every line, with the current one highlighted and kept
/// in view by the list state.
fn render_full_lyrics(frame: &mut Frame, app: &App, info: Option<&PlaybackInfo>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" lyrics ");

    let Some(lyrics) = app.lyrics.lyrics() else {
        let msg = if app.lyrics.is_loading() {
            "…"
        } else {
            "(no synced lyrics)"
        };
        frame.render_widget(Paragraph::new(msg).block(block), area);
        return;
    };

    let at = info.map(|i| i.elapsed.as_secs_f64()).unwrap_or(0.0);
    let current = app.lyrics.current_line(at);

    let items: Vec<ListItem> = lyrics
        .lines
        .iter()
        .map(|l| ListItem::new(l.text.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ratatui::widgets::ListState::default();
    state.select(current);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_progress(frame: &mut Frame, info: Option<&PlaybackInfo>, area: Rect) {
    let (ratio, label) = match info {
        Some(info) => {
            let elapsed = info.elapsed;
            match info.duration {
                Some(total) if !total.is_zero() => (
                    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0),
                    format!("{} / {}", format_mmss(elapsed), format_mmss(total)),
                ),
                _ => (0.0, format_mmss(elapsed)),
            }
        }
        None => (0.0, "--:--".to_string()),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}
