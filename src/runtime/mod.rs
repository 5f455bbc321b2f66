use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog;
use crate::config::{UiState, resolve_state_path};
use crate::lyrics;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    let album = catalog::load(Path::new(&dir))?;
    let audio_player = AudioPlayer::new(album.tracks.clone());
    let mut app = App::new(album);

    app.follow_playback = settings.ui.follow_playback;
    app.set_playback_handle(audio_player.playback_handle());

    let state_path = resolve_state_path();
    if let Some(p) = &state_path {
        app.ui_state = UiState::load(p);
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris.set_album_info(&app.album.artist, &app.album.title);
    mpris_sync::update_mpris(&mpris, &app);

    startup::apply_playback_defaults(&mut app, &audio_player, &settings);

    let loader = lyrics::spawn_loader();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &audio_player,
        &loader,
        &mpris,
        &control_tx,
        &control_rx,
        state_path.as_deref(),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    audio_player.quit();

    run_result
}
