//! BLASTRS - block-blast in the terminal
//!
//! Drag blocks from the tray with the mouse; fill rows and columns to blast them.

mod input;
mod ui;

use blastrs::audio::AudioManager;
use blastrs::game::{Callout, DragOutcome, Game, PlacementReport};
use blastrs::rng::SeededRng;
use blastrs::settings::{Settings, record_score};
use blastrs::Layout;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::Command;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Delay between the last placement and the game over overlay
const GAME_OVER_OVERLAY_DELAY: Duration = Duration::from_millis(800);

/// How long a line clear callout stays on screen
const CALLOUT_DURATION: Duration = Duration::from_millis(1200);

type AppGame = Game<Option<AudioManager>>;

/// Get the blastrs temp directory, creating it if needed
fn blastrs_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blastrs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = blastrs_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blastrs=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLASTRS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Load settings
    let mut settings = Settings::load();

    // Initialize audio (optional - game works without audio)
    let mut audio = AudioManager::new();
    if let Some(a) = &mut audio {
        a.set_music_volume(settings.audio.music_volume as f32 / 100.0);
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }

    let layout = Layout::terminal();
    let mut game: AppGame = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(seed, layout, audio),
        None => Game::with_rng(Box::new(SeededRng::from_entropy()), layout, audio),
    };

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &mut settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    // Save settings (including any new high score)
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if result.is_ok() {
        println!("\nThanks for playing BLASTRS!");
        println!("Final Score: {}", game.score());
        println!("Best: {}", settings.high_score);
    }

    result
}

/// Presentation state the core game doesn't own
#[derive(Default)]
struct App {
    game_over_at: Option<Instant>,
    callout: Option<(Callout, Instant)>,
}

impl App {
    fn hud(&self, settings: &Settings) -> ui::Hud {
        ui::Hud {
            best: settings.high_score,
            callout: self
                .callout
                .filter(|(_, at)| at.elapsed() < CALLOUT_DURATION)
                .map(|(callout, _)| callout),
            show_game_over: self
                .game_over_at
                .is_some_and(|at| at.elapsed() >= GAME_OVER_OVERLAY_DELAY),
            music: settings.audio.music,
        }
    }

    fn placed(&mut self, report: &PlacementReport, game: &AppGame, settings: &mut Settings) {
        if let Some(callout) = report.callout {
            self.callout = Some((callout, Instant::now()));
        }
        if record_score(settings, game.score()) {
            tracing::debug!("New best {}", game.score());
        }
        if report.game_over {
            self.game_over_at = Some(Instant::now());
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut AppGame,
    settings: &mut Settings,
) -> io::Result<()> {
    let mut app = App::default();
    let mut last_tick = Instant::now();

    if let Some(audio) = game.sink_mut() {
        audio.set_music(settings.audio.music);
    }

    loop {
        // Render
        let hud = app.hud(settings);
        terminal.draw(|frame| ui::render_game(frame, game, &hud))?;

        // Handle input
        if event::poll(FRAME_DURATION.saturating_sub(last_tick.elapsed()))? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::key_command(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let field = ui::field_area(Rect::new(0, 0, size.width, size.height));
                    input::mouse_command(mouse, field)
                }
                _ => None,
            };

            match command {
                Some(Command::DragStart(pointer)) => {
                    game.drag_start(pointer);
                }
                Some(Command::DragMove(pointer)) => game.drag_move(pointer),
                Some(Command::DragEnd) => {
                    if let Some(DragOutcome::Placed(report)) = game.drag_end() {
                        app.placed(&report, game, settings);
                    }
                }
                Some(Command::Undo) => {
                    game.undo();
                }
                Some(Command::Restart) => {
                    game.reset();
                    app = App::default();
                    if let Some(audio) = game.sink_mut() {
                        audio.set_music(settings.audio.music);
                    }
                }
                Some(Command::ToggleMusic) => {
                    settings.audio.music = !settings.audio.music;
                    let playing = settings.audio.music && !game.is_over();
                    if let Some(audio) = game.sink_mut() {
                        audio.set_music(playing);
                    }
                }
                Some(Command::Quit) => return Ok(()),
                None => {}
            }
        }

        // Advance animations at a fixed rate regardless of input volume
        while last_tick.elapsed() >= FRAME_DURATION {
            game.tick();
            last_tick += FRAME_DURATION;
        }
    }
}
