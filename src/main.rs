mod audio;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{error, info};

use meadow_run::compute::Direction;
use meadow_run::config::{Config, SessionConfig};
use meadow_run::entities::Mode;
use meadow_run::session::{GameSession, SessionEvent};

use crate::audio::Audio;
use crate::display::Hud;

/// How often the front-end wakes to feed time and input to the session.
/// Finer than the fastest loop interval is pointless; the session catches
/// up on every timer that fell due in between.
const FRAME: Duration = Duration::from_millis(16);

enum Command {
    Start(Mode),
    Stop,
    Move(Direction),
    Quit,
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    // Arrow keys act on press and on auto-repeat; controls on press only.
    let press = key.kind == KeyEventKind::Press;
    let held = press || key.kind == KeyEventKind::Repeat;
    match key.code {
        KeyCode::Up if held => Some(Command::Move(Direction::Up)),
        KeyCode::Down if held => Some(Command::Move(Direction::Down)),
        KeyCode::Left if held => Some(Command::Move(Direction::Left)),
        KeyCode::Right if held => Some(Command::Move(Direction::Right)),
        KeyCode::Char('1') if press => Some(Command::Start(Mode::Default)),
        KeyCode::Char('2') if press => Some(Command::Start(Mode::Timed)),
        KeyCode::Char('3') if press => Some(Command::Start(Mode::Hardcore)),
        KeyCode::Char('s') | KeyCode::Char('S') if press => Some(Command::Stop),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc if press => Some(Command::Quit),
        KeyCode::Char('c') if press && key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        _ => None,
    }
}

/// Logs go to `--log-file`; the alternate screen owns stdout and stderr.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(cfg.log_filter()?)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session_cfg: SessionConfig,
    mut audio: Audio,
) -> Result<()> {
    let mut session = GameSession::new(session_cfg);
    let mut hud = Hud::default();
    let origin = Instant::now();

    display::render(out, session.state(), &hud)?;

    loop {
        let frame_start = Instant::now();
        let mut redraw = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => match command_for(&key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Start(mode)) => session.start(mode),
                    Some(Command::Stop) => session.stop(),
                    Some(Command::Move(dir)) => session.handle_input(dir),
                    None => {}
                },
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }

        // ── Catch the session clock up with wall time ─────────────────────────
        let wall_ms = origin.elapsed().as_millis() as u64;
        session.advance(wall_ms.saturating_sub(session.now_ms()));

        for event in session.drain_events() {
            hud.apply(&event);
            match event {
                SessionEvent::Render => redraw = true,
                SessionEvent::Cue(cue) => audio.play(out, cue)?,
                SessionEvent::GameOver { score } => {
                    audio.stop_background();
                    info!("final score {}", score);
                }
                _ => {}
            }
        }

        // Many Render requests can land in one frame; draw once.
        if redraw {
            display::render(out, session.state(), &hud)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cfg = Config::parse();
    init_logging(&cfg)?;
    let session_cfg = cfg.session()?;
    info!("starting with {:?}", session_cfg);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("cannot enter raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
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

    let result = run(&mut out, &rx, session_cfg, Audio::new(cfg.mute));
    if let Err(e) = &result {
        error!("{:#}", e);
    }

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
