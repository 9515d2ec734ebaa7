use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use space_shooter::audio::Mixer;
use space_shooter::compute::{init_state, new_game, tick, toggle_pause, Game};
use space_shooter::config::{GameConfig, DEFAULT_CONFIG_PATH};
use space_shooter::display;
use space_shooter::input::KeyTracker;

#[derive(Parser)]
#[command(name = "space_shooter")]
#[command(about = "Wave-based arcade shooter for the terminal")]
struct Cli {
    /// TOML file with gameplay overrides
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where log output goes (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Frames per second; overrides `frame_ms` from the config
    #[arg(long)]
    fps: Option<u32>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// A missing default file is fine; anything else wrong with the config is
/// logged and the defaults are used.
fn load_config(cli: &Cli) -> GameConfig {
    let mut config = if cli.config.exists() || cli.config != Path::new(DEFAULT_CONFIG_PATH) {
        match GameConfig::load(&cli.config) {
            Ok(config) => {
                tracing::info!(path = %cli.config.display(), "Loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "Using default config");
                GameConfig::default()
            }
        }
    } else {
        GameConfig::default()
    };

    if let Some(fps) = cli.fps.filter(|&fps| fps > 0) {
        config.frame_ms = (1000 / fps as u64).max(1);
    }
    config
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session_best: u32,
) -> std::io::Result<MenuResult> {
    display::render_menu(out, session_best, terminal::size()?)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            },
            Ok(Event::Resize(..)) => {
                display::render_menu(out, session_best, terminal::size()?)?;
            }
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  `R` after game over starts a fresh game in
/// place.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    mixer: &mut Mixer,
    rng: &mut ThreadRng,
    session_best: &mut u32,
) -> std::io::Result<()> {
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        let frame_length = Duration::from_millis(game.config.frame_ms);
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            keys.record(code, kind, frame);
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Char('p') | KeyCode::Char('P') => toggle_pause(game, mixer),
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    let muted = mixer.music.toggle_mute();
                    tracing::info!(muted, "Music mute toggled");
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    let muted = mixer.effects.toggle_mute();
                    tracing::info!(muted, "Effects mute toggled");
                }
                KeyCode::Char('r') | KeyCode::Char('R') if game.state.is_game_over() => {
                    new_game(game, rng, mixer);
                    keys.clear();
                }
                _ => {}
            }
        }

        let input = keys.snapshot(frame);
        let dt_ms = game.config.frame_ms;
        tick(game, &input, dt_ms, rng, mixer);
        *session_best = (*session_best).max(game.state.score);

        display::render(out, game, *session_best, terminal::size()?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_length {
            thread::sleep(frame_length - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("space_shooter.log"));
    init_logging(&log_file)?;
    let config = load_config(&cli);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut mixer = Mixer::new();
    let mut session_best = 0;

    if let MenuResult::Quit = show_menu(out, rx, session_best)? {
        return Ok(());
    }
    let mut game = init_state(config, &mut rng);
    new_game(&mut game, &mut rng, &mut mixer);
    game_loop(out, &mut game, rx, &mut mixer, &mut rng, &mut session_best)?;

    tracing::info!(session_best, "Session ended");
    Ok(())
}
