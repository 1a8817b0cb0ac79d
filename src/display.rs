//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.  Play-field units are scaled onto the
//! terminal cells inside the border.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use meadow_run::entities::{Entity, Facing, GameState, GameStatus, Mode, MAX_HEALTH};
use meadow_run::session::SessionEvent;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGreen;
const C_GRASS: Color = Color::Green;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_TIMER: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_ANIMAL: Color = Color::Yellow;
const C_TRASH: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const CONTROLS: &str = "1 Play  2 Timed  3 Hardcore  S Stop  ← ↑ → ↓ Move  Q Quit";

// ── HUD values ────────────────────────────────────────────────────────────────

/// Values the session pushes for the heads-up display.  Kept apart from
/// `GameState` so the panel only shows what the session has announced.
#[derive(Debug, Default)]
pub struct Hud {
    pub score: u32,
    pub health: i32,
    pub level: u32,
    pub countdown: Option<u32>,
    pub final_score: Option<u32>,
}

impl Hud {
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ScoreChanged(score) => self.score = *score,
            SessionEvent::HealthChanged(health) => self.health = *health,
            SessionEvent::LevelChanged(level) => self.level = *level,
            SessionEvent::CountdownChanged(secs) => self.countdown = Some(*secs),
            SessionEvent::CountdownHidden => self.countdown = None,
            SessionEvent::GameOver { score } => self.final_score = Some(*score),
            SessionEvent::Render | SessionEvent::Cue(_) => {}
        }
    }
}

/// Maps play-field coordinates onto terminal cells.
struct Viewport {
    left: f64,
    top: f64,
    sx: f64,
    sy: f64,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        // Border occupies col 0 / width-1 and rows 1 / height-2.
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(4).max(1);
        Viewport {
            left: 1.0,
            top: 2.0,
            sx: cols as f64 / state.field.width,
            sy: rows as f64 / state.field.height,
            cols,
            rows,
        }
    }

    /// Cell rectangle covered by `e`, clipped to the play area.
    fn cells(&self, e: &Entity) -> Option<(u16, u16, u16, u16)> {
        let x0 = (e.left() * self.sx).floor().max(0.0);
        let x1 = (e.right() * self.sx).ceil().min(self.cols as f64);
        let y0 = (e.top() * self.sy).floor().max(0.0);
        let y1 = (e.bottom() * self.sy).ceil().min(self.rows as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((
            (self.left + x0) as u16,
            (self.top + y0) as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, hud: &Hud) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;

    match state.status {
        GameStatus::Idle => draw_menu(out, width, height)?,
        GameStatus::Running => {
            let view = Viewport::new(state, width, height);
            draw_background(out, state, &view)?;
            for obstacle in &state.obstacles {
                draw_obstacle(out, obstacle, &view)?;
            }
            draw_player(out, state, &view)?;
            draw_hud(out, state, hud, width)?;
        }
        GameStatus::GameOver => {
            draw_hud(out, state, hud, width)?;
            draw_game_over(out, hud, width, height)?;
        }
    }

    draw_controls_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

/// Grass tufts along the bottom row, scrolled by the background offset.
fn draw_background<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let shift = (state.background_x * view.sx) as u16;
    let row = view.top as u16 + view.rows.saturating_sub(1);
    out.queue(style::SetForegroundColor(C_GRASS))?;
    for col in 0..view.cols {
        if (col + shift) % 7 == 0 {
            out.queue(cursor::MoveTo(view.left as u16 + col, row))?;
            out.queue(Print("ʷ"))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>4}", hud.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("  Level: {}", hud.level)))?;

    let mode = match state.player.mode {
        Mode::Default => "",
        Mode::Timed => "  [ TIMED ]",
        Mode::Hardcore => "  [ HARDCORE ]",
    };
    out.queue(style::SetForegroundColor(Color::Magenta))?;
    out.queue(Print(mode))?;

    if let Some(secs) = hud.countdown {
        out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
        out.queue(Print(format!("  ⏱ {:>2}", secs)))?;
    }

    // Health bar, one block per 10 points, right-aligned
    let filled = (hud.health.clamp(0, MAX_HEALTH) / 10) as usize;
    let bar = format!(
        "Health: {}{}",
        "█".repeat(filled),
        "░".repeat((MAX_HEALTH / 10) as usize - filled)
    );
    let rx = width.saturating_sub(bar.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&bar))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill<W: Write>(out: &mut W, rect: (u16, u16, u16, u16), glyph: &str) -> std::io::Result<()> {
    let (x, y, w, h) = rect;
    let line = glyph.repeat(w as usize);
    for row in y..y + h {
        out.queue(cursor::MoveTo(x, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let Some(rect) = view.cells(&state.player.body) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    fill(out, rect, "▒")?;

    let face = match state.player.facing {
        Facing::Left => "◀☺",
        Facing::Right => "☺▶",
    };
    out.queue(cursor::MoveTo(rect.0, rect.1))?;
    out.queue(Print(face))?;
    Ok(())
}

fn draw_obstacle<W: Write>(out: &mut W, obstacle: &Entity, view: &Viewport) -> std::io::Result<()> {
    let Some(rect) = view.cells(obstacle) else {
        return Ok(());
    };
    let (color, glyph) = if obstacle.strength < 0 {
        (C_TRASH, "▓")
    } else {
        (C_ANIMAL, "░")
    };
    out.queue(style::SetForegroundColor(color))?;
    fill(out, rect, glyph)?;

    // Label with the sprite name, e.g. "dog" from "dog.png"
    let name = obstacle.image.trim_end_matches(".png");
    let label: String = name.chars().take(rect.2 as usize).collect();
    out.queue(cursor::MoveTo(rect.0, rect.1))?;
    out.queue(Print(label))?;
    Ok(())
}

// ── Landing menu ──────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let cx = width / 2;
    let cy = height / 2;

    let title = "✿  MEADOW  RUN  ✿";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Play    ", Color::Green, "Endless, catch animals to score"),
        ("2", "Timed   ", Color::Yellow, "Sixty seconds on the clock"),
        ("3", "Hardcore", Color::Red, "One piece of trash and it's over"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(20), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<9}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, hud: &Hud, width: u16, height: u16) -> std::io::Result<()> {
    let score_line = format!("YOUR TOTAL SCORE: {}", hud.final_score.unwrap_or(hud.score));
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("1 / 2 / 3 - Play Again  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
