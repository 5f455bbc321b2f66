//! LRC text parsing.
//!
//! The parser is pure text-to-value: no I/O, no failure. Malformed lines
//! are dropped, unknown tags are kept as metadata and an empty input
//! yields an empty line list, which callers treat as "no lyrics".

use std::collections::HashMap;

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Cue time in seconds.
    pub time: f64,
    pub text: String,
}

/// The result of parsing one LRC document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLyrics {
    /// Metadata tags such as `ar`, `ti`, `al`, `offset`.
    pub metadata: HashMap<String, String>,
    /// Lines sorted ascending by time, offset already applied.
    pub lines: Vec<LyricLine>,
}

impl ParsedLyrics {
    /// True when the document carries no timed lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse a raw LRC document.
///
/// Tolerates `\r\n`, `\n` and bare `\r` line endings. A line may carry
/// several timestamp tags; each produces one `LyricLine` with the shared
/// text. Lines whose text is empty after the tags are dropped.
pub fn parse_lrc(raw: &str) -> ParsedLyrics {
    let mut metadata: HashMap<String, String> = HashMap::new();
    let mut lines: Vec<LyricLine> = Vec::new();

    // Splitting on both terminators handles CRLF (the empty fragment in
    // between is blank and skipped), LF and bare CR alike.
    for line in raw.split(['\n', '\r']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut times: Vec<f64> = Vec::new();
        let mut rest = line;

        loop {
            let Some(stripped) = rest.strip_prefix('[') else {
                break;
            };
            let Some(close) = stripped.find(']') else {
                break;
            };
            let inner = &stripped[..close];

            match parse_timestamp(inner) {
                Some(t) => {
                    times.push(t);
                    rest = &stripped[close + 1..];
                }
                None => {
                    // Not a timestamp. A tag on a line of its own is
                    // metadata; a stray bracket inside lyric text is not.
                    if times.is_empty() {
                        if let Some((key, value)) = inner.split_once(':') {
                            metadata
                                .insert(key.trim().to_string(), value.trim().to_string());
                        }
                        rest = "";
                    }
                    break;
                }
            }
        }

        let text = rest.trim();
        if times.is_empty() || text.is_empty() {
            // Untagged text or a bare cue point: nothing to show.
            continue;
        }
        for t in times {
            lines.push(LyricLine {
                time: t,
                text: text.to_string(),
            });
        }
    }

    if let Some(offset_ms) = metadata.get("offset").and_then(|v| parse_offset_ms(v)) {
        let offset = offset_ms as f64 / 1000.0;
        for line in &mut lines {
            line.time = (line.time + offset).max(0.0);
        }
    }

    lines.sort_by(|a, b| a.time.total_cmp(&b.time));

    ParsedLyrics { metadata, lines }
}

/// Parse `MM:SS` or `MM:SS.fff` into seconds.
///
/// The fractional token is 1 to 3 digits and is zero-padded on the RIGHT
/// to milliseconds: `"5"` is 500 ms and `"75"` is 750 ms, not 5 ms / 75 ms.
fn parse_timestamp(s: &str) -> Option<f64> {
    let (minutes, rest) = s.split_once(':')?;
    if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (seconds, frac) = match rest.split_once('.') {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (rest, None),
    };
    if seconds.is_empty()
        || seconds.len() > 2
        || !seconds.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let millis = match frac {
        None => 0u32,
        Some(f) => {
            if f.is_empty() || f.len() > 3 || !f.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: u32 = f.parse().ok()?;
            value * 10u32.pow(3 - f.len() as u32)
        }
    };

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    Some(minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

/// Parse the `offset` metadata value: signed milliseconds, optional `+`.
fn parse_offset_ms(raw: &str) -> Option<i64> {
    raw.trim().trim_start_matches('+').parse::<i64>().ok()
}
