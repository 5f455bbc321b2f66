//! The audio thread: owns the output stream and the current sink.
//!
//! Commands arrive over an mpsc channel with a 200 ms receive timeout;
//! the timeout branch refreshes the elapsed-time snapshot and performs
//! auto-advance when the current source has drained. The engine is the
//! sole owner of the rodio stream; everything else observes it through
//! the shared `PlaybackInfo`.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::{Track, Variant};

use super::queue::{ShuffleQueue, auto_next_index, next_index, prev_index};
use super::sink::{LoadedSink, create_sink_at};
use super::types::{
    AudioCmd, PREV_RESTART_THRESHOLD, PlayState, PlaybackHandle, RepeatMode,
};

pub(super) fn spawn_audio_thread(
    tracks: Vec<Track>,
    rx: Receiver<AudioCmd>,
    info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                // No output device: the UI keeps working for browsing, but
                // every play attempt would fail anyway.
                if let Ok(mut snapshot) = info.lock() {
                    snapshot.error = Some(format!("no audio output device: {e}"));
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut engine = Engine::new(stream, tracks, info);

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Quit) => {
                    engine.stop();
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Whether `Prev` restarts the current track instead of moving to the
/// prior one: only with a loaded source, and only strictly past the
/// threshold.
pub(super) fn prev_restarts_current(elapsed: Duration, loaded: bool) -> bool {
    loaded && elapsed > PREV_RESTART_THRESHOLD
}

/// What a rendition toggle does, decided before touching the sink.
pub(super) struct VariantSwap {
    pub variant: Variant,
    /// Rebuild the sink from the other file at the captured position.
    /// False when no source is loaded or the track has no other rendition;
    /// the preference still flips then.
    pub rebuild: bool,
}

pub(super) fn plan_variant_toggle(
    track: Option<&Track>,
    current: Variant,
    loaded: bool,
) -> VariantSwap {
    let next = current.toggled();
    let differs = track
        .map(|t| t.source_for(next) != t.source_for(current))
        .unwrap_or(false);
    VariantSwap {
        variant: next,
        rebuild: loaded && differs,
    }
}

struct Engine {
    stream: OutputStream,
    tracks: Vec<Track>,
    info: PlaybackHandle,

    sink: Option<Sink>,
    index: Option<usize>,
    variant: Variant,
    paused: bool,

    // Position accounting: accumulated elapsed plus time since last resume.
    started_at: Option<Instant>,
    accumulated: Duration,
    duration: Option<Duration>,

    repeat: RepeatMode,
    shuffle: Option<ShuffleQueue>,
    error: Option<String>,
}

impl Engine {
    fn new(stream: OutputStream, tracks: Vec<Track>, info: PlaybackHandle) -> Self {
        Self {
            stream,
            tracks,
            info,
            sink: None,
            index: None,
            variant: Variant::default(),
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            duration: None,
            repeat: RepeatMode::default(),
            shuffle: None,
            error: None,
        }
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load(i) => self.load(i, false),
            AudioCmd::Play(i) => self.load(i, true),
            AudioCmd::Resume => self.resume(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::TogglePause => {
                if self.sink.is_some() {
                    if self.paused {
                        self.resume();
                    } else {
                        self.pause();
                    }
                } else if let Some(i) = self.index {
                    // Stopped (possibly after an error): retry from the top.
                    self.load(i, true);
                }
            }
            AudioCmd::Stop => self.stop(),
            AudioCmd::SeekTo(t) => self.seek_to(t),
            AudioCmd::SeekBy(secs) => self.seek_by(secs),
            AudioCmd::Next => self.next(),
            AudioCmd::Prev => self.prev(),
            AudioCmd::ToggleVariant => self.toggle_variant(),
            AudioCmd::SetRepeat(m) => self.repeat = m,
            AudioCmd::SetShuffle(on) => {
                self.shuffle = on.then(|| {
                    ShuffleQueue::new(self.tracks.len(), self.index, &mut rand::rng())
                });
            }
            AudioCmd::Quit => unreachable!("handled by the command loop"),
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn state(&self) -> PlayState {
        if self.sink.is_none() {
            PlayState::Stopped
        } else if self.paused {
            PlayState::Paused
        } else {
            PlayState::Playing
        }
    }

    fn publish_with(&self, state: PlayState) {
        if let Ok(mut snapshot) = self.info.lock() {
            snapshot.index = self.index;
            snapshot.state = state;
            snapshot.variant = self.variant;
            snapshot.elapsed = self.elapsed();
            snapshot.duration = self.duration;
            snapshot.error = self.error.clone();
        }
    }

    fn publish(&self) {
        self.publish_with(self.state());
    }

    /// Decode track `i` from the start. Loading does not auto-start unless
    /// `autoplay` is set; `Load` settles in `Paused` once the source is
    /// ready and the duration known.
    fn load(&mut self, i: usize, autoplay: bool) {
        if self.tracks.is_empty() {
            return;
        }
        let i = i.min(self.tracks.len() - 1);

        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.index = Some(i);
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.duration = self.tracks[i].duration;
        self.publish_with(PlayState::Loading);

        let path = self.tracks[i].source_for(self.variant).to_path_buf();
        match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok(LoadedSink { sink, duration }) => {
                if let Some(d) = duration {
                    self.duration = Some(d);
                }
                self.error = None;
                if autoplay {
                    sink.play();
                    self.paused = false;
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                if let Some(q) = self.shuffle.as_mut() {
                    q.align_to(i);
                }
            }
            Err(e) => {
                // Recoverable: the track stays selected, navigation works,
                // and TogglePause/Resume retries the load.
                self.sink = None;
                self.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn resume(&mut self) {
        match &self.sink {
            Some(s) => {
                s.play();
                self.paused = false;
                self.started_at = Some(Instant::now());
                self.error = None;
                self.publish();
            }
            None => {
                if let Some(i) = self.index {
                    self.load(i, true);
                }
            }
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
            self.publish();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    /// Rebuild the sink for the current index/rendition at `target`,
    /// preserving the paused/playing flag. Used for seeking and the
    /// rendition swap; the swap is complete exactly when the new source
    /// has decoded, so no delay-based readiness guessing is involved.
    fn rebuild_at(&mut self, target: Duration) {
        let Some(i) = self.index else {
            return;
        };
        let target = self.duration.map_or(target, |d| target.min(d));
        let was_paused = self.paused;

        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.publish_with(PlayState::Loading);

        let path = self.tracks[i].source_for(self.variant).to_path_buf();
        match create_sink_at(&self.stream, &path, target) {
            Ok(LoadedSink { sink, duration }) => {
                if let Some(d) = duration {
                    self.duration = Some(d);
                }
                self.accumulated = target;
                if was_paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.paused = was_paused;
                self.error = None;
                self.sink = Some(sink);
            }
            Err(e) => {
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    /// Seek to an absolute position. Only meaningful while a source is
    /// loaded (playing or paused); clamped to `[0, duration]` by
    /// `rebuild_at` and the unsigned `Duration` type.
    fn seek_to(&mut self, target: Duration) {
        if self.sink.is_some() {
            self.rebuild_at(target);
        }
    }

    fn seek_by(&mut self, secs: i64) {
        if self.sink.is_none() {
            return;
        }
        let cur = self.elapsed().as_secs() as i64;
        let new = (cur + secs).max(0) as u64;
        self.seek_to(Duration::from_secs(new));
    }

    fn next(&mut self) {
        let target = match self.shuffle.as_mut() {
            Some(q) => q.advance(&mut rand::rng()),
            None => next_index(self.index, self.tracks.len()),
        };
        if let Some(i) = target {
            self.load(i, true);
        }
    }

    fn prev(&mut self) {
        // Past the restart threshold, "previous" means "from the top".
        if prev_restarts_current(self.elapsed(), self.sink.is_some()) {
            self.seek_to(Duration::ZERO);
            return;
        }
        let target = match self.shuffle.as_mut() {
            Some(q) => q.retreat(),
            None => prev_index(self.index, self.tracks.len()),
        };
        if let Some(i) = target {
            self.load(i, true);
        }
    }

    /// Swap vocal/instrumental. Captures the elapsed position and the
    /// play flag, rebuilds from the other file and restores both. On a
    /// track without a vocal rendition only the preference flips.
    fn toggle_variant(&mut self) {
        let plan = plan_variant_toggle(
            self.index.map(|i| &self.tracks[i]),
            self.variant,
            self.sink.is_some(),
        );

        let at = self.elapsed();
        self.variant = plan.variant;
        if plan.rebuild {
            self.rebuild_at(at);
        } else {
            self.publish();
        }
    }

    /// Timeout branch: refresh the elapsed snapshot and auto-advance when
    /// the current source has drained.
    fn tick(&mut self) {
        let finished = self
            .sink
            .as_ref()
            .map(|s| !self.paused && s.empty())
            .unwrap_or(false);
        if finished {
            self.auto_advance();
        } else {
            self.publish();
        }
    }

    fn auto_advance(&mut self) {
        if self.repeat == RepeatMode::One {
            if let Some(i) = self.index {
                self.load(i, true);
            }
            return;
        }

        let target = match self.shuffle.as_mut() {
            Some(q) => {
                if self.repeat == RepeatMode::Off && q.at_end() {
                    None
                } else {
                    q.advance(&mut rand::rng())
                }
            }
            None => auto_next_index(self.index, self.tracks.len(), self.repeat),
        };

        match target {
            Some(i) => self.load(i, true),
            None => self.stop(),
        }
    }
}
